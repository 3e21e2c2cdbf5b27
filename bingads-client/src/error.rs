//! Client error types.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur talking to the Bing Ads services.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a fault, or accepted the request but
    /// reported per-item errors.
    #[error("{operation} failed with status {status}: {}", .messages.join("; "))]
    Api {
        operation: &'static str,
        status: u16,
        messages: Vec<String>,
    },

    #[error("authentication required: no refresh token stored")]
    AuthRequired,

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("token store error: {0}")]
    TokenStore(#[from] std::io::Error),

    /// The service returned an entity this crate cannot represent.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// Returns true if this error represents a 429 rate-limit response.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            ClientError::Api { status, .. } => *status == 429,
            ClientError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            _ => false,
        }
    }

    /// Returns true if re-authenticating could fix the error.
    pub fn is_auth(&self) -> bool {
        match self {
            ClientError::AuthRequired | ClientError::Auth(_) => true,
            ClientError::Api { status, .. } => *status == 401,
            _ => false,
        }
    }
}
