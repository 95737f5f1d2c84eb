use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Key under which the signed-in user's email is stored.
pub const EMAIL_KEY: &str = "user.email";

/// Read side of the host's session storage. The workflow only ever reads;
/// whoever signs the user in writes.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// In-process store for hosts without a browser session, and for tests.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get() {
        let store = MemorySessionStore::new();
        store.put(EMAIL_KEY, "buyer@example.com");
        assert_eq!(store.get(EMAIL_KEY).as_deref(), Some("buyer@example.com"));
        assert!(store.get("user.phone").is_none());
    }
}
