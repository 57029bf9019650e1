//! PeerSink port - Outbound delivery to one attached peer.
//!
//! The room core never touches sockets directly. Each connection in the
//! registry carries a sink, and the WebSocket adapter backs it with a queue
//! drained by the socket's writer task.

use thiserror::Error;

/// A send to a single peer failed.
///
/// Always swallowed by the broadcaster: one broken peer never aborts
/// delivery to the others.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerSendError {
    /// The peer's writer has gone away.
    #[error("Peer disconnected")]
    Disconnected,
}

/// Non-blocking outbound frame delivery for one peer.
///
/// `send` must not wait on the network; slow peers buffer in their own
/// queue so the room's event loop keeps moving.
pub trait PeerSink: Send + Sync {
    /// Enqueue a text frame for the peer.
    fn send(&self, frame: String) -> Result<(), PeerSendError>;
}
