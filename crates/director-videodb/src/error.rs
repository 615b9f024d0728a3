//! Video service error types.

use thiserror::Error;

pub type VideoDbResult<T> = Result<T, VideoDbError>;

#[derive(Debug, Error)]
pub enum VideoDbError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Server error {0}: {1}")]
    ServerError(u16, String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VideoDbError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map an HTTP error status and body to an error.
    pub fn from_http_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            404 => Self::NotFound(body),
            409 => Self::AlreadyExists(body),
            429 => Self::RateLimited(body),
            500..=599 => Self::ServerError(status, body),
            _ => Self::RequestFailed(format!("HTTP {}: {}", status, body)),
        }
    }

    /// True for failures that say nothing about the request itself
    /// (network trouble, overload), as opposed to a rejection by the service.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            VideoDbError::Network(_)
                | VideoDbError::Timeout(_)
                | VideoDbError::RateLimited(_)
                | VideoDbError::ServerError(_, _)
        )
    }

    /// Check if the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VideoDbError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_http_status() {
        assert!(matches!(
            VideoDbError::from_http_status(404, "missing"),
            VideoDbError::NotFound(_)
        ));
        assert!(matches!(
            VideoDbError::from_http_status(409, "index exists"),
            VideoDbError::AlreadyExists(_)
        ));
        assert!(matches!(
            VideoDbError::from_http_status(503, "down"),
            VideoDbError::ServerError(503, _)
        ));
        assert!(matches!(
            VideoDbError::from_http_status(400, "bad"),
            VideoDbError::RequestFailed(_)
        ));
    }

    #[test]
    fn test_transient_classification() {
        assert!(VideoDbError::from_http_status(429, "slow down").is_transient());
        assert!(VideoDbError::from_http_status(502, "bad gateway").is_transient());
        assert!(VideoDbError::Timeout(30).is_transient());
        assert!(!VideoDbError::from_http_status(409, "exists").is_transient());
        assert!(!VideoDbError::not_found("video").is_transient());
    }
}
