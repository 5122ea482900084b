// Token store
// Typed facade over the key-value storage for credentials and cached profile

use std::sync::Arc;

use serde_json::Value;

use crate::storage::Storage;

use super::types::TokenPair;

const ACCESS_TOKEN_KEY: &str = "access_token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const USER_INFO_KEY: &str = "user_info";

/// Owns the credential pair and the cached user profile.
///
/// Cheap to clone; all clones share the same underlying storage.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Persist the pair as a unit
    pub fn set_tokens(&self, pair: &TokenPair) {
        self.storage.set_many(&[
            (ACCESS_TOKEN_KEY, pair.access.as_str()),
            (REFRESH_TOKEN_KEY, pair.refresh.as_str()),
        ]);
    }

    pub fn access_token(&self) -> Option<String> {
        self.storage.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.storage.get(REFRESH_TOKEN_KEY)
    }

    /// Remove both credentials
    pub fn clear_tokens(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn set_user_info(&self, info: &Value) {
        match serde_json::to_string(info) {
            Ok(json) => self.storage.set(USER_INFO_KEY, &json),
            Err(e) => tracing::error!("Failed to serialize user info: {}", e),
        }
    }

    pub fn user_info(&self) -> Option<Value> {
        let json = self.storage.get(USER_INFO_KEY)?;
        serde_json::from_str(&json).ok()
    }

    pub fn clear_user_info(&self) {
        self.storage.remove(USER_INFO_KEY);
    }
}
