// Token refresh coordination
// Ensures a burst of concurrent 401s produces exactly one refresh call

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::sync::oneshot;

use crate::ui::UiHandler;

use super::tokens::TokenStore;
use super::types::{RefreshRequest, RefreshResponse, TokenPair};

/// Terminal outcome of a refresh episode, fanned out to every waiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new access token was minted and persisted
    Refreshed(String),
    /// The session cannot be renewed; credentials are cleared
    Expired,
}

/// One flight at a time; waiters queue in arrival order while it is airborne
enum FlightState {
    Idle,
    Refreshing(Vec<oneshot::Sender<RefreshOutcome>>),
}

/// Serializes access-token renewal across all in-flight requests.
///
/// The first caller that observes a 401 becomes the leader: it performs the
/// refresh call, persists the new pair, and resolves everyone who queued up
/// behind it. Callers that observe a 401 while a flight is outstanding are
/// suspended on a oneshot until the leader reaches a terminal outcome. On
/// failure the stored credentials are cleared and the sign-in redirect fires
/// once, regardless of how many requests were waiting.
pub struct RefreshCoordinator {
    state: Mutex<FlightState>,
    client: Client,
    refresh_url: String,
    tokens: TokenStore,
    ui: Arc<dyn UiHandler>,
}

impl RefreshCoordinator {
    pub fn new(
        client: Client,
        refresh_url: String,
        tokens: TokenStore,
        ui: Arc<dyn UiHandler>,
    ) -> Self {
        Self {
            state: Mutex::new(FlightState::Idle),
            client,
            refresh_url,
            tokens,
            ui,
        }
    }

    /// Entry point for a request that just got a 401.
    ///
    /// Resolves once the refresh episode this call belongs to is over. The
    /// lock is only held for the state transition, never across an await.
    pub async fn handle_unauthorized(&self) -> RefreshOutcome {
        let waiter = {
            let mut state = self.state.lock().expect("refresh state lock poisoned");
            match &mut *state {
                FlightState::Refreshing(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Some(rx)
                }
                FlightState::Idle => {
                    *state = FlightState::Refreshing(Vec::new());
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            tracing::debug!("401 while refresh in flight, queueing request");
            // A dropped sender means the leader panicked; treat as expired
            // rather than hanging the caller.
            return rx.await.unwrap_or(RefreshOutcome::Expired);
        }

        let outcome = self.run_refresh().await;

        let waiters = {
            let mut state = self.state.lock().expect("refresh state lock poisoned");
            match std::mem::replace(&mut *state, FlightState::Idle) {
                FlightState::Refreshing(waiters) => waiters,
                FlightState::Idle => Vec::new(),
            }
        };

        tracing::debug!(
            waiters = waiters.len(),
            outcome = ?outcome,
            "Refresh flight finished, dispatching queue"
        );
        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }

        outcome
    }

    /// The leader's flight: mint a new access token or end the session
    async fn run_refresh(&self) -> RefreshOutcome {
        let Some(refresh) = self.tokens.refresh_token() else {
            tracing::warn!("Got 401 with no refresh token stored, forcing sign-in");
            self.force_logout();
            return RefreshOutcome::Expired;
        };

        match self.request_new_access(&refresh).await {
            Ok(access) => {
                // Persist the pair as a unit; the refresh token is reused
                self.tokens.set_tokens(&TokenPair {
                    access: access.clone(),
                    refresh,
                });
                tracing::info!("Access token refreshed");
                RefreshOutcome::Refreshed(access)
            }
            Err(e) => {
                tracing::error!("Token refresh failed: {:#}", e);
                self.force_logout();
                RefreshOutcome::Expired
            }
        }
    }

    async fn request_new_access(&self, refresh: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.refresh_url)
            .header("Content-Type", "application/json")
            .json(&RefreshRequest {
                refresh: refresh.to_string(),
            })
            .send()
            .await
            .context("Failed to send token refresh request")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Token refresh rejected: {} - {}", status, error_text);
        }

        let data: RefreshResponse = response
            .json()
            .await
            .context("Failed to parse token refresh response")?;

        if data.access.is_empty() {
            anyhow::bail!("Token refresh response does not contain an access token");
        }

        Ok(data.access)
    }

    /// Clear credentials and send the user to sign-in. Runs once per failed
    /// episode; single-flight guarantees it is never re-entered mid-episode.
    fn force_logout(&self) {
        self.tokens.clear_tokens();
        self.ui.redirect_to_login();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingUi {
        redirects: AtomicUsize,
    }

    impl CountingUi {
        fn new() -> Self {
            Self {
                redirects: AtomicUsize::new(0),
            }
        }
    }

    impl UiHandler for CountingUi {
        fn toast(&self, _message: &str) {}

        fn redirect_to_login(&self) {
            self.redirects.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn make_coordinator(refresh_url: &str, ui: Arc<CountingUi>) -> (RefreshCoordinator, TokenStore) {
        let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
        let coordinator = RefreshCoordinator::new(
            Client::new(),
            refresh_url.to_string(),
            tokens.clone(),
            ui,
        );
        (coordinator, tokens)
    }

    #[tokio::test]
    async fn test_missing_refresh_token_expires_and_logs_out() {
        let ui = Arc::new(CountingUi::new());
        let (coordinator, tokens) = make_coordinator("http://127.0.0.1:9/token/refresh/", ui.clone());

        let outcome = coordinator.handle_unauthorized().await;

        assert_eq!(outcome, RefreshOutcome::Expired);
        assert_eq!(tokens.access_token(), None);
        assert_eq!(ui.redirects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_successful_refresh_persists_pair() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/token/refresh/")
            .match_body(mockito::Matcher::Json(serde_json::json!({"refresh": "ref1"})))
            .with_status(200)
            .with_body(r#"{"access": "tok2"}"#)
            .create_async()
            .await;

        let ui = Arc::new(CountingUi::new());
        let url = format!("{}/token/refresh/", server.url());
        let (coordinator, tokens) = make_coordinator(&url, ui.clone());
        tokens.set_tokens(&TokenPair {
            access: "tok1".to_string(),
            refresh: "ref1".to_string(),
        });

        let outcome = coordinator.handle_unauthorized().await;

        assert_eq!(outcome, RefreshOutcome::Refreshed("tok2".to_string()));
        assert_eq!(tokens.access_token(), Some("tok2".to_string()));
        assert_eq!(tokens.refresh_token(), Some("ref1".to_string()));
        assert_eq!(ui.redirects.load(Ordering::SeqCst), 0);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_store_and_logs_out_once() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token/refresh/")
            .with_status(400)
            .with_body(r#"{"detail": "refresh token invalid"}"#)
            .create_async()
            .await;

        let ui = Arc::new(CountingUi::new());
        let url = format!("{}/token/refresh/", server.url());
        let (coordinator, tokens) = make_coordinator(&url, ui.clone());
        tokens.set_tokens(&TokenPair {
            access: "tok1".to_string(),
            refresh: "ref1".to_string(),
        });

        let outcome = coordinator.handle_unauthorized().await;

        assert_eq!(outcome, RefreshOutcome::Expired);
        assert_eq!(tokens.access_token(), None);
        assert_eq!(tokens.refresh_token(), None);
        assert_eq!(ui.redirects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_access_field_is_a_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/token/refresh/")
            .with_status(200)
            .with_body(r#"{"detail": "ok but no token"}"#)
            .create_async()
            .await;

        let ui = Arc::new(CountingUi::new());
        let url = format!("{}/token/refresh/", server.url());
        let (coordinator, tokens) = make_coordinator(&url, ui.clone());
        tokens.set_tokens(&TokenPair {
            access: "tok1".to_string(),
            refresh: "ref1".to_string(),
        });

        let outcome = coordinator.handle_unauthorized().await;

        assert_eq!(outcome, RefreshOutcome::Expired);
        assert_eq!(ui.redirects.load(Ordering::SeqCst), 1);
    }
}
