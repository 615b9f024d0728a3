//! Agent error types.

use thiserror::Error;

use director_fal::FalError;
use director_videodb::VideoDbError;

pub type AgentResult<T> = Result<T, AgentError>;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("Scene index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("No search results found for query {query}")]
    NoMatch { query: String },

    #[error("{0}")]
    Generation(String),

    #[error("Missing credential: {0}")]
    Credential(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl AgentError {
    pub fn index_unavailable(msg: impl Into<String>) -> Self {
        Self::IndexUnavailable(msg.into())
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    /// Check if the search found nothing for the query.
    pub fn is_no_match(&self) -> bool {
        matches!(self, AgentError::NoMatch { .. })
    }
}

impl From<VideoDbError> for AgentError {
    fn from(e: VideoDbError) -> Self {
        match e {
            VideoDbError::NotFound(what) => AgentError::NotFound(what),
            other => AgentError::Generation(other.to_string()),
        }
    }
}

impl From<FalError> for AgentError {
    fn from(e: FalError) -> Self {
        match e {
            FalError::MissingCredential(msg) => AgentError::Credential(msg),
            other => AgentError::Generation(other.to_string()),
        }
    }
}
