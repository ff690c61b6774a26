//! Persistence seam for the session bearer token.
//!
//! Runtime shells provide the backing store (a file, the OS keyring, browser
//! storage). The session layer only ever reads, writes and clears a single
//! value under [`ACCESS_TOKEN_KEY`](crate::constants::ACCESS_TOKEN_KEY).

use std::collections::HashMap;
use std::sync::Mutex;

use crate::errors::{Error, Result};

/// Durable key-value storage for credentials.
pub trait TokenStore: Send + Sync {
    fn set_token(&self, key: &str, token: &str) -> Result<()>;

    fn get_token(&self, key: &str) -> Result<Option<String>>;

    /// Removes the value. Removing a missing key succeeds.
    fn clear_token(&self, key: &str) -> Result<()>;
}

/// Process-local store, for tests and shells without durable storage.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token, as if persisted by an earlier run.
    pub fn with_token(key: &str, token: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.to_string(), token.to_string());
        }
        store
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| Error::TokenStore("Token store lock poisoned".into()))
    }
}

impl TokenStore for InMemoryTokenStore {
    fn set_token(&self, key: &str, token: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), token.to_string());
        Ok(())
    }

    fn get_token(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn clear_token(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_round_trip() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.get_token("access_token").unwrap(), None);

        store.set_token("access_token", "abc").unwrap();
        assert_eq!(
            store.get_token("access_token").unwrap().as_deref(),
            Some("abc")
        );

        store.clear_token("access_token").unwrap();
        store.clear_token("access_token").unwrap();
        assert_eq!(store.get_token("access_token").unwrap(), None);
    }

    #[test]
    fn test_with_token_seeds_value() {
        let store = InMemoryTokenStore::with_token("access_token", "seed");
        assert_eq!(
            store.get_token("access_token").unwrap().as_deref(),
            Some("seed")
        );
    }
}
