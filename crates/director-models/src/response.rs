//! Agent response returned to the orchestration layer.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Overall outcome of an agent run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Success,
    Error,
    InProgress,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Success => "success",
            AgentStatus::Error => "error",
            AgentStatus::InProgress => "in_progress",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of an agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AgentResponse {
    pub status: AgentStatus,
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

impl AgentResponse {
    /// Successful run with its result payload.
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: AgentStatus::Success,
            message: message.into(),
            data,
        }
    }

    /// Failed run; `data` is null until set with [`AgentResponse::with_data`].
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: AgentStatus::Error,
            message: message.into(),
            data: Value::Null,
        }
    }

    /// Attach a data payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Check if the run succeeded.
    pub fn is_success(&self) -> bool {
        self.status == AgentStatus::Success
    }
}
