//! Agent discovery interface.

use async_trait::async_trait;
use schemars::schema::RootSchema;
use serde_json::Value;

use director_models::AgentResponse;

/// An agent callable by the orchestration layer.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Stable name used for routing.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the accepted arguments.
    fn parameters(&self) -> RootSchema;

    /// Run with raw JSON arguments. Never panics on bad input; invalid
    /// arguments produce an error response.
    async fn run_json(&self, args: Value) -> AgentResponse;
}
