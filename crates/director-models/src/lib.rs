//! Shared data models for the Director video agents.
//!
//! This crate provides Serde-serializable types for:
//! - Opaque collection, video and scene index identifiers
//! - Chat content blocks with their progress state
//! - The output message streamed to progress sinks
//! - Agent responses

pub mod content;
pub mod ids;
pub mod message;
pub mod response;

// Re-export common types
pub use content::{
    ContentBlock, ContentState, MsgStatus, SearchData, SearchResultsContent, ShotData,
    TextContent, VideoContent, VideoData,
};
pub use ids::{CollectionId, SceneIndexId, VideoId};
pub use message::OutputMessage;
pub use response::{AgentResponse, AgentStatus};
