//! Progress sinks for output messages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use director_models::OutputMessage;

/// Receives snapshots of an output message while an agent works.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Intermediate state, may be followed by more updates.
    async fn push_update(&self, message: &OutputMessage);

    /// Final state of the message.
    async fn publish(&self, message: &OutputMessage);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressEventKind {
    Update,
    Publish,
}

/// Message snapshot sent through a [`ChannelSink`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub kind: ProgressEventKind,
    pub message: OutputMessage,
}

/// Forwards snapshots to an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, kind: ProgressEventKind, message: &OutputMessage) {
        let event = ProgressEvent {
            kind,
            message: message.clone(),
        };
        if self.tx.send(event).is_err() {
            warn!(msg_id = %message.msg_id, "Progress receiver dropped");
        }
    }
}

#[async_trait]
impl ProgressSink for ChannelSink {
    async fn push_update(&self, message: &OutputMessage) {
        self.send(ProgressEventKind::Update, message);
    }

    async fn publish(&self, message: &OutputMessage) {
        self.send(ProgressEventKind::Publish, message);
    }
}

/// Logs snapshots; used when nothing renders progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

#[async_trait]
impl ProgressSink for TracingSink {
    async fn push_update(&self, message: &OutputMessage) {
        debug!(
            msg_id = %message.msg_id,
            actions = message.actions.len(),
            blocks = message.content.len(),
            "Message updated: {}",
            message.actions.last().map(String::as_str).unwrap_or("")
        );
    }

    async fn publish(&self, message: &OutputMessage) {
        info!(
            msg_id = %message.msg_id,
            status = %message.status,
            blocks = message.content.len(),
            "Message published"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_forwards_in_order() {
        let (sink, mut rx) = ChannelSink::channel();
        let mut message = OutputMessage::new("s-1");

        sink.push_update(&message).await;
        message.push_action("step");
        sink.publish(&message).await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, ProgressEventKind::Update);
        assert!(first.message.actions.is_empty());

        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, ProgressEventKind::Publish);
        assert_eq!(second.message.actions, vec!["step".to_string()]);
    }

    #[tokio::test]
    async fn test_dropped_receiver_is_not_fatal() {
        let (sink, rx) = ChannelSink::channel();
        drop(rx);
        sink.push_update(&OutputMessage::new("s-1")).await;
    }
}
