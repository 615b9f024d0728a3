//! Chat content blocks and their progress state.
//!
//! Each block moves through a small state machine:
//!
//! ```text
//! Progress ──► Success
//!     └──────► Error
//! ```
//!
//! Success and Error are terminal. A block that is still in progress when
//! its run ends is closed to Error with the failure message it was created
//! with (see [`ContentState::close`]).

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::VideoId;

// =============================================================================
// Status
// =============================================================================

/// Status of a content block or message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum MsgStatus {
    /// Work on the block has started
    #[default]
    Progress,
    /// Block completed successfully
    Success,
    /// Block failed
    Error,
}

impl MsgStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MsgStatus::Progress => "progress",
            MsgStatus::Success => "success",
            MsgStatus::Error => "error",
        }
    }

    /// Check if this is a terminal state (no more transitions allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, MsgStatus::Success | MsgStatus::Error)
    }
}

impl fmt::Display for MsgStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status plus human readable status message of one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentState {
    pub status: MsgStatus,
    pub status_message: String,
    /// Message used when the block is closed while still in progress
    #[serde(skip)]
    #[schemars(skip)]
    failure_message: String,
}

impl ContentState {
    /// New in-progress state.
    pub fn progress(status_message: impl Into<String>) -> Self {
        Self {
            status: MsgStatus::Progress,
            status_message: status_message.into(),
            failure_message: "Failed".to_string(),
        }
    }

    /// Set the message used by [`ContentState::close`].
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    /// Move to Success. Returns false if the block was already terminal.
    pub fn succeed(&mut self, status_message: impl Into<String>) -> bool {
        self.transition(MsgStatus::Success, status_message.into())
    }

    /// Move to Error. Returns false if the block was already terminal.
    pub fn fail(&mut self, status_message: impl Into<String>) -> bool {
        self.transition(MsgStatus::Error, status_message.into())
    }

    /// Close a block that is still in progress with its failure message.
    pub fn close(&mut self) -> bool {
        let message = self.failure_message.clone();
        self.transition(MsgStatus::Error, message)
    }

    /// Check if the block reached success or error.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Status message applied when the block is closed in progress.
    pub fn failure_message(&self) -> &str {
        &self.failure_message
    }

    fn transition(&mut self, to: MsgStatus, status_message: String) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = to;
        self.status_message = status_message;
        true
    }
}

/// One shot in a search result, as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShotData {
    pub search_score: f64,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Search hits grouped by video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchData {
    pub video_id: VideoId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    /// Video length in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    pub shots: Vec<ShotData>,
}

/// Playable video reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoData {
    pub stream_url: String,
}

// =============================================================================
// Content Blocks
// =============================================================================

/// Block listing search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResultsContent {
    #[serde(flatten)]
    pub state: ContentState,
    pub agent_name: String,
    #[serde(default)]
    pub search_results: Vec<SearchData>,
}

impl SearchResultsContent {
    pub fn new(agent_name: impl Into<String>, state: ContentState) -> Self {
        Self {
            state,
            agent_name: agent_name.into(),
            search_results: Vec::new(),
        }
    }
}

/// Block holding a playable video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoContent {
    #[serde(flatten)]
    pub state: ContentState,
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoData>,
}

impl VideoContent {
    pub fn new(agent_name: impl Into<String>, state: ContentState) -> Self {
        Self {
            state,
            agent_name: agent_name.into(),
            video: None,
        }
    }
}

/// Block holding plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextContent {
    #[serde(flatten)]
    pub state: ContentState,
    pub agent_name: String,
    #[serde(default)]
    pub text: String,
}

impl TextContent {
    pub fn new(agent_name: impl Into<String>, state: ContentState) -> Self {
        Self {
            state,
            agent_name: agent_name.into(),
            text: String::new(),
        }
    }
}

/// Any content block of an output message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    SearchResults(SearchResultsContent),
    Video(VideoContent),
    Text(TextContent),
}

impl ContentBlock {
    /// Progress state of the block, whatever its kind.
    pub fn state(&self) -> &ContentState {
        match self {
            ContentBlock::SearchResults(c) => &c.state,
            ContentBlock::Video(c) => &c.state,
            ContentBlock::Text(c) => &c.state,
        }
    }

    /// Mutable progress state of the block.
    pub fn state_mut(&mut self) -> &mut ContentState {
        match self {
            ContentBlock::SearchResults(c) => &mut c.state,
            ContentBlock::Video(c) => &mut c.state,
            ContentBlock::Text(c) => &mut c.state,
        }
    }

    /// Current status of the block.
    pub fn status(&self) -> MsgStatus {
        self.state().status
    }
}

impl From<SearchResultsContent> for ContentBlock {
    fn from(c: SearchResultsContent) -> Self {
        ContentBlock::SearchResults(c)
    }
}

impl From<VideoContent> for ContentBlock {
    fn from(c: VideoContent) -> Self {
        ContentBlock::Video(c)
    }
}

impl From<TextContent> for ContentBlock {
    fn from(c: TextContent) -> Self {
        ContentBlock::Text(c)
    }
}

// =============================================================================
// Tests
// =============================================================================
