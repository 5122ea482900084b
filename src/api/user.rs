// User account endpoints

use serde_json::{json, Value};

use crate::error::Result;
use crate::http_client::{ApiClient, RequestSpec};

/// Create a new account. Public endpoint.
pub async fn register(client: &ApiClient, data: Value) -> Result<Value> {
    client
        .send(RequestSpec::post("/user/register/").json(data).no_auth())
        .await
}

/// Exchange username/password for a token pair. Public endpoint.
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<Value> {
    client
        .send(
            RequestSpec::post("/user/login/")
                .json(json!({"username": username, "password": password}))
                .no_auth(),
        )
        .await
}

/// Mint a new access token from a refresh token. Public endpoint.
///
/// The transparent 401 path uses the refresh coordinator instead; this
/// wrapper exists for callers that manage tokens themselves.
pub async fn refresh_token(client: &ApiClient, refresh: &str) -> Result<Value> {
    client
        .send(
            RequestSpec::post("/user/token/refresh/")
                .json(json!({"refresh": refresh}))
                .no_auth(),
        )
        .await
}

/// Fetch the signed-in user's profile
pub async fn profile(client: &ApiClient) -> Result<Value> {
    client.send(RequestSpec::get("/user/profile/")).await
}

/// Update the signed-in user's profile
pub async fn update_profile(client: &ApiClient, data: Value) -> Result<Value> {
    client
        .send(RequestSpec::put("/user/profile/").json(data))
        .await
}
