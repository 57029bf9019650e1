//! Connection registry: the live peers attached to one room.
//!
//! Membership changes only through connect and close events. Nothing here
//! is persisted; peers re-register when they reattach.

use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::ConnectionId;
use crate::ports::{PeerSendError, PeerSink};

/// One attached peer.
#[derive(Clone)]
pub struct Connection {
    id: ConnectionId,
    sink: Arc<dyn PeerSink>,
}

impl Connection {
    pub fn new(id: ConnectionId, sink: Arc<dyn PeerSink>) -> Self {
        Self { id, sink }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Enqueue a text frame for this peer.
    pub fn send(&self, frame: impl Into<String>) -> Result<(), PeerSendError> {
        self.sink.send(frame.into())
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection").field("id", &self.id).finish()
    }
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Sends attempted, one per registered peer.
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Live connections of a room, in the order they joined.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Vec<Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a peer. Re-registering an id replaces the earlier entry.
    pub fn register(&mut self, connection: Connection) {
        self.connections.retain(|c| c.id != connection.id);
        self.connections.push(connection);
    }

    /// Removes a peer, returning it if it was present.
    pub fn remove(&mut self, id: &ConnectionId) -> Option<Connection> {
        let index = self.connections.iter().position(|c| &c.id == id)?;
        Some(self.connections.remove(index))
    }

    pub fn get(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| &c.id == id)
    }

    pub fn contains(&self, id: &ConnectionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// Sends `frame` to every registered peer.
    ///
    /// A failed send is counted and skipped; it never stops delivery to
    /// the remaining peers.
    pub fn broadcast(&self, frame: &str) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        for connection in &self.connections {
            report.attempted += 1;
            match connection.send(frame) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::debug!(
                        connection_id = %connection.id,
                        "Peer send failed: {}",
                        e
                    );
                }
            }
        }
        report
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::*;

    /// Sink that records every frame it is given.
    #[derive(Default)]
    pub struct RecordingSink {
        frames: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        pub fn frames(&self) -> Vec<String> {
            self.frames.lock().unwrap().clone()
        }
    }

    impl PeerSink for RecordingSink {
        fn send(&self, frame: String) -> Result<(), PeerSendError> {
            self.frames.lock().unwrap().push(frame);
            Ok(())
        }
    }

    /// Sink whose peer has already gone away.
    pub struct ClosedSink;

    impl PeerSink for ClosedSink {
        fn send(&self, _frame: String) -> Result<(), PeerSendError> {
            Err(PeerSendError::Disconnected)
        }
    }

    pub fn recording_connection() -> (Connection, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (Connection::new(ConnectionId::new(), sink.clone()), sink)
    }
}
