//! Persisted bearer token

use crate::config::AuthConfig;
use crate::storage::TokenStorage;
use std::fmt;
use std::sync::Arc;
use waypoint_http::TokenSource;

/// Reads and writes the bearer token under [`AuthConfig::AUTH_TOKEN_KEY`].
///
/// An empty stored value counts as no token.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn TokenStorage>,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl TokenStore {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> Option<String> {
        self.storage
            .get_item(AuthConfig::AUTH_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }

    pub fn set(&self, token: &str) {
        self.storage.set_item(AuthConfig::AUTH_TOKEN_KEY, token);
    }

    pub fn remove(&self) {
        self.storage.remove_item(AuthConfig::AUTH_TOKEN_KEY);
    }
}

impl TokenSource for TokenStore {
    fn token(&self) -> Option<String> {
        self.get()
    }
}
