//! Outbound half of the server connection.

use crate::events::{OutboundEvent, WireError, encode_frame};
use async_trait::async_trait;
use tokio::sync::mpsc;

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("Server connection closed")]
    Closed,

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] WireError),
}

/// Something the widget can emit named events into.
#[async_trait]
pub trait ServerLink: Send + Sync {
    async fn emit(&self, event: OutboundEvent) -> Result<(), LinkError>;
}

/// Hands typed events to an in-process consumer.
#[derive(Clone, Debug)]
pub struct ChannelLink {
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl ChannelLink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ServerLink for ChannelLink {
    async fn emit(&self, event: OutboundEvent) -> Result<(), LinkError> {
        self.tx.send(event).map_err(|_| LinkError::Closed)
    }
}

/// Serializes events to JSON frames for a socket writer.
#[derive(Clone, Debug)]
pub struct FrameLink {
    tx: mpsc::UnboundedSender<String>,
}

impl FrameLink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ServerLink for FrameLink {
    async fn emit(&self, event: OutboundEvent) -> Result<(), LinkError> {
        let frame = encode_frame(&event)?;
        self.tx.send(frame).map_err(|_| LinkError::Closed)
    }
}
