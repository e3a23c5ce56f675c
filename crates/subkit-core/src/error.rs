//! Error types for Subkit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Provider errors
    #[error("Subscription not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Invalid request ({status}): {message}")]
    InvalidRequest {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    // Infrastructure errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the provider reported the addressed object as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Whether the provider refused the request itself (bad parameters,
    /// declined card, conflicting state) rather than failing to serve it.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::InvalidRequest { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
