#[derive(Clone)]
pub struct CliConfig {
    pub backend_url: String,
    pub oracle_url: String,
    pub rate_pair: String,
    pub wallet_rpc_url: String,
    pub wallet_address: String,
    pub partner_id: Option<String>,
    pub email: Option<String>,
    pub required_chain: String,
    pub http_timeout_secs: u64,
    pub proxy: Option<String>,
}

impl CliConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_url =
            std::env::var("BACKEND_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

        // The oracle defaults to the backend host; deployments with an
        // external price feed point this elsewhere
        let oracle_url = std::env::var("ORACLE_URL").unwrap_or_else(|_| backend_url.clone());
        let rate_pair = std::env::var("RATE_PAIR").unwrap_or_else(|_| "COIN-USD".to_string());

        let wallet_rpc_url =
            std::env::var("WALLET_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".to_string());
        let wallet_address = std::env::var("WALLET_ADDRESS")
            .map_err(|_| anyhow::anyhow!("WALLET_ADDRESS must be set to the buyer's account"))?;

        let partner_id = std::env::var("PARTNER_ID").ok();
        let email = std::env::var("USER_EMAIL").ok();

        let required_chain =
            std::env::var("REQUIRED_CHAIN").unwrap_or_else(|_| "0x1".to_string());

        let http_timeout_secs = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(nodesale_gateway::DEFAULT_TIMEOUT_SECS);

        let proxy = std::env::var("HTTP_PROXY_URL").ok();

        Ok(Self {
            backend_url,
            oracle_url,
            rate_pair,
            wallet_rpc_url,
            wallet_address,
            partner_id,
            email,
            required_chain,
            http_timeout_secs,
            proxy,
        })
    }
}
