pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct Config {
    pub timeout_secs: u64,
    pub proxy: Option<String>,
    pub verify_tls: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proxy: None,
            verify_tls: true,
        }
    }
}

impl Config {
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_proxy(mut self, url: &str) -> Self {
        self.proxy = Some(url.to_string());
        self
    }

    pub fn without_tls_verification(mut self) -> Self {
        self.verify_tls = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_proxy_and_verifies_tls() {
        let config = Config::default();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.proxy.is_none());
        assert!(config.verify_tls);
    }

    #[test]
    fn test_builders_override_fields() {
        let config = Config::default()
            .with_timeout(5)
            .with_proxy("socks5h://127.0.0.1:9050")
            .without_tls_verification();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.proxy.as_deref(), Some("socks5h://127.0.0.1:9050"));
        assert!(!config.verify_tls);
    }
}
