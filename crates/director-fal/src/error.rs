//! Generation client error types.

use thiserror::Error;

pub type FalResult<T> = Result<T, FalError>;

#[derive(Debug, Error)]
pub enum FalError {
    #[error("FAL API key not found: {0}")]
    MissingCredential(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FalError {
    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Check if the client was built without an API key.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, FalError::MissingCredential(_))
    }
}
