// HTTP client for the Pantry API
// Builds requests, attaches the bearer token, and drives refresh-and-retry

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result as AnyResult};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;

use crate::auth::{RefreshCoordinator, RefreshOutcome, TokenStore};
use crate::config::Config;
use crate::error::ApiError;
use crate::storage::Storage;
use crate::ui::UiHandler;

const GENERIC_FAILURE_MESSAGE: &str = "Request failed";
const NETWORK_FAILURE_MESSAGE: &str = "Network error, please check your connection";

/// One logical API call. Immutable once handed to [`ApiClient::send`];
/// a retried call is a fresh wire request with a fresh Authorization header.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub path: String,
    pub method: Method,
    pub data: Option<Value>,
    /// Query parameters, encoded in insertion order
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub needs_auth: bool,
}

impl RequestSpec {
    fn new(method: Method, path: &str) -> Self {
        Self {
            path: path.to_string(),
            method,
            data: None,
            params: Vec::new(),
            headers: Vec::new(),
            needs_auth: true,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: &str) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Append a query parameter; insertion order is preserved on the wire
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Skip the Authorization header and the refresh protocol entirely
    pub fn no_auth(mut self) -> Self {
        self.needs_auth = false;
        self
    }
}

/// Authenticated client for the Pantry API.
///
/// Every call goes through [`send`](Self::send): URL composition, bearer
/// attachment, response classification, and the transparent 401
/// refresh-and-retry protocol.
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
    refresh: RefreshCoordinator,
    ui: Arc<dyn UiHandler>,
}

impl ApiClient {
    /// Create a client from loaded configuration
    pub fn new(
        config: &Config,
        storage: Arc<dyn Storage>,
        ui: Arc<dyn UiHandler>,
    ) -> AnyResult<Self> {
        Self::build(
            config.base_url.clone(),
            config.token_refresh_path.clone(),
            TokenStore::new(storage),
            ui,
            config.http_connect_timeout,
            config.http_request_timeout,
        )
    }

    /// Create a client against an explicit base URL with default timeouts
    pub fn with_base_url(
        base_url: impl Into<String>,
        tokens: TokenStore,
        ui: Arc<dyn UiHandler>,
    ) -> AnyResult<Self> {
        Self::build(
            base_url.into(),
            "/token/refresh/".to_string(),
            tokens,
            ui,
            30,
            60,
        )
    }

    fn build(
        base_url: String,
        refresh_path: String,
        tokens: TokenStore,
        ui: Arc<dyn UiHandler>,
        connect_timeout: u64,
        request_timeout: u64,
    ) -> AnyResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout))
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let refresh_url = format!("{}{}", base_url, refresh_path);
        let refresh =
            RefreshCoordinator::new(client.clone(), refresh_url, tokens.clone(), ui.clone());

        Ok(Self {
            client,
            base_url,
            tokens,
            refresh,
            ui,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn ui(&self) -> &Arc<dyn UiHandler> {
        &self.ui
    }

    /// Issue a request and resolve it to a terminal outcome.
    ///
    /// 2xx resolves with the parsed body. A 401 on an authenticated call
    /// enters the refresh protocol and, on success, replays this request once
    /// with the new token. Everything else fails with the matching
    /// [`ApiError`] and raises the user-facing notification here and only
    /// here; the refresh-and-retry path itself stays silent.
    pub async fn send(&self, spec: RequestSpec) -> Result<Value, ApiError> {
        let url = build_url(&self.base_url, &spec.path, &spec.params);
        let token = if spec.needs_auth {
            // Absent token is not an error: the request goes out
            // unauthenticated and the server's 401 takes it from there.
            self.tokens.access_token()
        } else {
            None
        };

        tracing::debug!(method = %spec.method, url = %url, "Sending API request");

        let response = match self.issue(&spec, &url, token.as_deref()).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Request transport failure");
                self.ui.toast(NETWORK_FAILURE_MESSAGE);
                return Err(ApiError::NetworkUnavailable(e.to_string()));
            }
        };

        let status = response.status();
        if status.is_success() {
            return parse_body(response).await;
        }

        if status == StatusCode::UNAUTHORIZED && spec.needs_auth {
            return self.refresh_and_replay(spec, &url).await;
        }

        let error_text = response.text().await.unwrap_or_default();
        let message = extract_server_message(&error_text);
        tracing::warn!(
            status = status.as_u16(),
            url = %url,
            response_body = %error_text,
            "Request rejected by server"
        );
        self.ui.toast(&message);
        Err(ApiError::ServerRejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn issue(
        &self,
        spec: &RequestSpec,
        url: &str,
        bearer: Option<&str>,
    ) -> reqwest::Result<Response> {
        let mut request = self
            .client
            .request(spec.method.clone(), url)
            .header("Content-Type", "application/json");

        for (key, value) in &spec.headers {
            request = request.header(key, value);
        }

        if let Some(token) = bearer {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(data) = &spec.data {
            request = request.json(data);
        }

        request.send().await
    }

    /// The 401 branch: coordinate a refresh, then replay once.
    ///
    /// The replay resolves this caller directly; it never re-enters the
    /// protocol and never raises notifications of its own.
    async fn refresh_and_replay(&self, spec: RequestSpec, url: &str) -> Result<Value, ApiError> {
        match self.refresh.handle_unauthorized().await {
            RefreshOutcome::Refreshed(token) => {
                tracing::debug!(url = %url, "Replaying request with refreshed token");
                let response = self
                    .issue(&spec, url, Some(&token))
                    .await
                    .map_err(|e| ApiError::NetworkUnavailable(e.to_string()))?;

                let status = response.status();
                if status.is_success() {
                    parse_body(response).await
                } else {
                    let error_text = response.text().await.unwrap_or_default();
                    Err(ApiError::ServerRejected {
                        status: status.as_u16(),
                        message: extract_server_message(&error_text),
                    })
                }
            }
            RefreshOutcome::Expired => Err(ApiError::SessionExpired),
        }
    }
}

/// Compose base + path + query string, params in insertion order,
/// values percent-encoded
fn build_url(base: &str, path: &str, params: &[(String, String)]) -> String {
    let mut url = format!("{}{}", base, path);
    if !params.is_empty() {
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
    }
    url
}

/// Resolve a successful response to its body: JSON when it parses,
/// the raw text otherwise, `Null` when empty
async fn parse_body(response: Response) -> Result<Value, ApiError> {
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::NetworkUnavailable(e.to_string()))?;

    if text.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// Pull a user-facing message out of an error body, if the server sent one
fn extract_server_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "detail", "error"]
                .iter()
                .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}
