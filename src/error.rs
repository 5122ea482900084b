// Error handling module
// Defines the error taxonomy for every client operation

use thiserror::Error;

/// Errors that can occur while talking to the Pantry API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The transport produced no response at all
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The server answered with a non-success status
    #[error("Server rejected request: {status} - {message}")]
    ServerRejected { status: u16, message: String },

    /// The session is no longer valid and the user must sign in again
    #[error("Session expired, sign in required")]
    SessionExpired,

    /// Internal client error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// True for terminal auth failures that force a new sign-in
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;
