// Session state
// Login/logout lifecycle and the cached user profile

use std::sync::Arc;

use serde_json::Value;

use crate::api::user;
use crate::auth::{TokenPair, TokenStore};
use crate::error::{ApiError, Result};
use crate::http_client::ApiClient;
use crate::ui::UiHandler;

const SIGNED_OUT_LABEL: &str = "Not signed in";

/// The signed-in user's state: credentials plus the cached profile.
///
/// Everything durable lives in the token store; `Session` is just the
/// lifecycle driver around it.
pub struct Session {
    client: Arc<ApiClient>,
    tokens: TokenStore,
    ui: Arc<dyn UiHandler>,
}

impl Session {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let tokens = client.tokens().clone();
        let ui = client.ui().clone();
        Self { client, tokens, ui }
    }

    /// Sign in: persist the returned token pair, then fetch the profile
    pub async fn login(&self, username: &str, password: &str) -> Result<Value> {
        let response = user::login(&self.client, username, password).await?;

        let data = &response["data"];
        match (data["access"].as_str(), data["refresh"].as_str()) {
            (Some(access), Some(refresh)) => {
                self.tokens.set_tokens(&TokenPair {
                    access: access.to_string(),
                    refresh: refresh.to_string(),
                });
            }
            _ => {
                return Err(ApiError::Internal(anyhow::anyhow!(
                    "Login response did not contain a token pair"
                )));
            }
        }

        self.fetch_profile().await?;
        Ok(response)
    }

    /// Create an account, then sign in with the same credentials
    pub async fn register(&self, username: &str, password: &str, email: Option<&str>) -> Result<Value> {
        let mut data = serde_json::json!({
            "username": username,
            "password": password,
        });
        if let Some(email) = email {
            data["email"] = Value::String(email.to_string());
        }

        let response = user::register(&self.client, data).await?;

        if response["code"].as_u64() == Some(200) {
            self.login(username, password).await?;
        }

        Ok(response)
    }

    /// Fetch the profile and cache it locally
    pub async fn fetch_profile(&self) -> Result<Value> {
        let response = user::profile(&self.client).await?;

        if response["code"].as_u64() == Some(200) && !response["data"].is_null() {
            self.tokens.set_user_info(&response["data"]);
        }

        Ok(response)
    }

    /// Push profile changes and merge them into the cached copy
    pub async fn update_profile(&self, data: Value) -> Result<Value> {
        let response = user::update_profile(&self.client, data.clone()).await?;

        let mut info = self.tokens.user_info().unwrap_or_else(|| Value::Object(Default::default()));
        if let (Some(info_map), Some(patch)) = (info.as_object_mut(), data.as_object()) {
            for (key, value) in patch {
                info_map.insert(key.clone(), value.clone());
            }
        }
        self.tokens.set_user_info(&info);

        Ok(response)
    }

    /// Sign out: drop credentials and cached profile, go to the sign-in screen
    pub fn logout(&self) {
        self.tokens.clear_tokens();
        self.tokens.clear_user_info();
        self.ui.redirect_to_login();
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.is_logged_in()
    }

    pub fn nickname(&self) -> String {
        self.tokens
            .user_info()
            .and_then(|info| info["nickname"].as_str().map(str::to_string))
            .unwrap_or_else(|| SIGNED_OUT_LABEL.to_string())
    }

    pub fn user_id(&self) -> Option<u64> {
        self.tokens.user_info().and_then(|info| info["id"].as_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::ui::LoggingUi;

    fn session_with_store() -> (Session, TokenStore) {
        let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
        let client = Arc::new(
            ApiClient::with_base_url("http://127.0.0.1:9/api", tokens.clone(), Arc::new(LoggingUi))
                .unwrap(),
        );
        (Session::new(client), tokens)
    }

    #[test]
    fn test_accessors_with_empty_store() {
        let (session, _tokens) = session_with_store();
        assert!(!session.is_logged_in());
        assert_eq!(session.nickname(), SIGNED_OUT_LABEL);
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_accessors_read_cached_profile() {
        let (session, tokens) = session_with_store();
        tokens.set_tokens(&TokenPair {
            access: "a".to_string(),
            refresh: "r".to_string(),
        });
        tokens.set_user_info(&serde_json::json!({"id": 12, "nickname": "chef"}));

        assert!(session.is_logged_in());
        assert_eq!(session.nickname(), "chef");
        assert_eq!(session.user_id(), Some(12));
    }

    #[test]
    fn test_logout_clears_everything() {
        let (session, tokens) = session_with_store();
        tokens.set_tokens(&TokenPair {
            access: "a".to_string(),
            refresh: "r".to_string(),
        });
        tokens.set_user_info(&serde_json::json!({"id": 1}));

        session.logout();

        assert!(!session.is_logged_in());
        assert_eq!(tokens.refresh_token(), None);
        assert_eq!(tokens.user_info(), None);
    }
}
