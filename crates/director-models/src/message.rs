//! Output message streamed to the chat session.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{ContentBlock, MsgStatus};

/// Agent output for one turn of a chat session.
///
/// Agents mutate a message while they work and hand snapshots of it to a
/// progress sink, so partial progress can be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OutputMessage {
    pub session_id: String,
    pub msg_id: String,
    pub status: MsgStatus,
    /// Agents that contributed to this message
    #[serde(default)]
    pub agents: Vec<String>,
    /// Free-text progress log
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    pub updated_at: DateTime<Utc>,
}

impl OutputMessage {
    /// Create an empty in-progress message for a session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            msg_id: Uuid::new_v4().to_string(),
            status: MsgStatus::Progress,
            agents: Vec::new(),
            actions: Vec::new(),
            content: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Record an agent as a contributor. Adding the same name twice is a no-op.
    pub fn add_agent(&mut self, agent_name: impl Into<String>) {
        let name = agent_name.into();
        if !self.agents.contains(&name) {
            self.agents.push(name);
        }
    }

    /// Append an entry to the progress log.
    pub fn push_action(&mut self, action: impl Into<String>) {
        self.actions.push(action.into());
        self.updated_at = Utc::now();
    }

    /// Append a block and return its position.
    pub fn push_content(&mut self, block: impl Into<ContentBlock>) -> usize {
        self.content.push(block.into());
        self.updated_at = Utc::now();
        self.content.len() - 1
    }

    /// Mutable access to the block at `index`, as returned by [`push_content`].
    ///
    /// [`push_content`]: OutputMessage::push_content
    pub fn content_mut(&mut self, index: usize) -> Option<&mut ContentBlock> {
        self.updated_at = Utc::now();
        self.content.get_mut(index)
    }

    /// Close every block still in progress and derive the message status.
    ///
    /// After this call no block is in progress. The message is Success only
    /// when the run succeeded, it produced at least one block and every
    /// block succeeded. Returns the number of blocks closed.
    pub fn close_pending(&mut self, run_succeeded: bool) -> usize {
        let mut closed = 0;
        for block in &mut self.content {
            if block.state_mut().close() {
                closed += 1;
            }
        }

        let delivered = !self.content.is_empty()
            && self.content.iter().all(|b| b.status() == MsgStatus::Success);
        self.status = if run_succeeded && delivered {
            MsgStatus::Success
        } else {
            MsgStatus::Error
        };
        self.updated_at = Utc::now();
        closed
    }

    /// Check if any block is still in progress.
    pub fn has_pending(&self) -> bool {
        self.content.iter().any(|b| !b.state().is_terminal())
    }
}
