// Authentication types

use serde::{Deserialize, Serialize};

/// Access/refresh credential pair.
///
/// The pair is written to storage as a unit: the access token is never
/// persisted without the refresh token that minted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Token refresh request body
#[derive(Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Token refresh response
///
/// Anything other than HTTP 200 with a non-empty `access` field is treated
/// as a failed refresh.
#[derive(Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}
