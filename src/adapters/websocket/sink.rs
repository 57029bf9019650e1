//! Queue-backed PeerSink for WebSocket connections.

use tokio::sync::mpsc;

use crate::ports::{PeerSendError, PeerSink};

/// Enqueues frames for a socket's writer task.
///
/// The queue is unbounded: a slow peer grows its own backlog and never
/// stalls the room.
#[derive(Debug, Clone)]
pub struct ChannelPeerSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelPeerSink {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Create a sink together with the receiving end of its queue.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl PeerSink for ChannelPeerSink {
    fn send(&self, frame: String) -> Result<(), PeerSendError> {
        self.tx.send(frame).map_err(|_| PeerSendError::Disconnected)
    }
}
