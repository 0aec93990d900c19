//! Errors of the remote trip gateway.

use thiserror::Error;

use super::types::FALLBACK_ERROR_MESSAGE;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// A call that never produced a usable envelope
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection, timeout, body read...
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Encoding the request body
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered, but not with an envelope we can read
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The server rejected the request with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn malformed(error: impl std::fmt::Display) -> Self {
        Self::Malformed(error.to_string())
    }

    /// What we show the user. Rejections carry the server's own `error`
    /// text, unreadable responses get the fallback message. Everything
    /// else falls back to the error description.
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            Self::Malformed(_) => FALLBACK_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
