//! Room host: owns every room slot on this server.
//!
//! Each slot pairs a room's connection registry with its session (absent
//! while the room is cold). A slot is guarded by an async mutex held for
//! the whole of one event, store awaits included, so a room handles
//! exactly one event at a time while different rooms run concurrently.
//!
//! ```text
//! RoomHost
//! ├── "abc" ─ Mutex<RoomSlot { registry: [c1, c2], session: Some(Ready) }>
//! └── "xyz" ─ Mutex<RoomSlot { registry: [c3],     session: None (Cold) }>
//! ```
//!
//! The registry lives beside the session rather than inside it, so a room
//! can hibernate while peers stay attached; the next event rehydrates the
//! session and finds the same peers.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{ConnectionId, RoomId};
use crate::domain::room::{
    Connection, ConnectionRegistry, RelayMode, RoomContext, RoomError, RoomLifecycle, RoomReply,
    RoomSession,
};
use crate::ports::{DurableStore, PeerSink};

#[derive(Debug, Default)]
struct RoomSlot {
    registry: ConnectionRegistry,
    session: Option<RoomSession>,
}

impl RoomSlot {
    fn lifecycle(&self) -> RoomLifecycle {
        self.session
            .as_ref()
            .map(RoomSession::lifecycle)
            .unwrap_or(RoomLifecycle::Cold)
    }

    fn is_idle(&self) -> bool {
        self.registry.is_empty() && self.session.is_none()
    }
}

/// Dispatches transport events to room sessions.
pub struct RoomHost {
    store: Arc<dyn DurableStore>,
    mode: RelayMode,
    hibernate_when_empty: bool,
    rooms: RwLock<HashMap<RoomId, Arc<Mutex<RoomSlot>>>>,
}

impl RoomHost {
    /// Create a host whose rooms share `store` and `mode`.
    pub fn new(store: Arc<dyn DurableStore>, mode: RelayMode) -> Self {
        Self {
            store,
            mode,
            hibernate_when_empty: true,
            rooms: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a room goes cold as soon as its last peer leaves.
    pub fn with_hibernate_when_empty(mut self, enabled: bool) -> Self {
        self.hibernate_when_empty = enabled;
        self
    }

    pub fn mode(&self) -> &RelayMode {
        &self.mode
    }

    async fn slot(&self, room_id: &RoomId) -> Arc<Mutex<RoomSlot>> {
        if let Some(slot) = self.rooms.read().await.get(room_id) {
            return slot.clone();
        }
        self.rooms
            .write()
            .await
            .entry(room_id.clone())
            .or_default()
            .clone()
    }

    /// Returns the room's session, activating it first if it is cold.
    async fn ready<'a>(
        &self,
        room_id: &RoomId,
        session: &'a mut Option<RoomSession>,
    ) -> Result<&'a mut RoomSession, RoomError> {
        let active = match session.take() {
            Some(active) => active,
            None => {
                let context = RoomContext::new(room_id.clone(), self.store.clone());
                RoomSession::activate(context, self.mode.clone()).await?
            }
        };
        Ok(session.insert(active))
    }

    /// Handle one HTTP request for a room.
    ///
    /// A room with no peers goes back to sleep once the request is done,
    /// so rooms reached only over HTTP do not accumulate.
    pub async fn handle_request(
        &self,
        room_id: &RoomId,
        method: &Method,
        body: &[u8],
    ) -> Result<RoomReply, RoomError> {
        let slot = self.slot(room_id).await;
        let result = {
            let mut slot = slot.lock().await;
            let RoomSlot { registry, session } = &mut *slot;

            let result = match self.ready(room_id, session).await {
                Ok(active) => active.handle_request(registry, method, body).await,
                Err(e) => Err(e),
            };

            if self.hibernate_when_empty && registry.is_empty() {
                Self::put_to_sleep(room_id, session);
            }
            result
        };

        drop(slot);
        self.reap(room_id).await;
        result
    }

    /// Attach a new peer and greet it.
    ///
    /// The room is activated before the peer is registered, so a room that
    /// cannot rehydrate never gains members.
    pub async fn connect(
        &self,
        room_id: &RoomId,
        sink: Arc<dyn PeerSink>,
    ) -> Result<ConnectionId, RoomError> {
        let slot = self.slot(room_id).await;
        let mut slot = slot.lock().await;
        let RoomSlot { registry, session } = &mut *slot;

        let session = self.ready(room_id, session).await?;
        let connection = Connection::new(ConnectionId::new(), sink);
        registry.register(connection.clone());
        session.on_connect(&connection)?;

        Ok(connection.id())
    }

    /// Deliver a peer-originated text frame.
    pub async fn message(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        text: &str,
    ) -> Result<(), RoomError> {
        let slot = self.slot(room_id).await;
        let mut slot = slot.lock().await;

        let session = self.ready(room_id, &mut slot.session).await?;
        session.on_message(connection_id, text)
    }

    /// Report a transport error on a peer.
    pub async fn error(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
        error: &str,
    ) -> Result<(), RoomError> {
        let slot = self.slot(room_id).await;
        let mut slot = slot.lock().await;

        let session = self.ready(room_id, &mut slot.session).await?;
        session.on_error(connection_id, error)
    }

    /// Detach a peer.
    ///
    /// Registry removal always happens, even if the room cannot be woken
    /// to run its close hook.
    pub async fn disconnect(&self, room_id: &RoomId, connection_id: &ConnectionId) {
        let slot = self.slot(room_id).await;
        {
            let mut slot = slot.lock().await;
            let RoomSlot { registry, session } = &mut *slot;

            if registry.remove(connection_id).is_none() {
                tracing::debug!(
                    room_id = %room_id,
                    connection_id = %connection_id,
                    "Disconnect for unknown connection"
                );
            }

            match self.ready(room_id, session).await {
                Ok(active) => {
                    if let Err(e) = active.on_close(connection_id) {
                        tracing::warn!(room_id = %room_id, "Close hook failed: {}", e);
                    }
                }
                Err(e) => tracing::warn!(room_id = %room_id, "Close hook skipped: {}", e),
            }

            if self.hibernate_when_empty && registry.is_empty() {
                Self::put_to_sleep(room_id, session);
            }
        }
        drop(slot);
        self.reap(room_id).await;
    }

    /// Force a room back to `Cold`, keeping its peers attached.
    ///
    /// Returns false if the room was already cold.
    pub async fn hibernate(&self, room_id: &RoomId) -> bool {
        let slot = self.slot(room_id).await;
        let was_active = {
            let mut slot = slot.lock().await;
            Self::put_to_sleep(room_id, &mut slot.session)
        };
        drop(slot);
        self.reap(room_id).await;
        was_active
    }

    fn put_to_sleep(room_id: &RoomId, session: &mut Option<RoomSession>) -> bool {
        match session.take() {
            Some(active) => {
                if let Err(e) = active.hibernate() {
                    tracing::warn!(room_id = %room_id, "Hibernation failed: {}", e);
                }
                true
            }
            None => false,
        }
    }

    /// Drop the slot of a cold room with no peers.
    ///
    /// Only removes the slot when nothing else holds it, so an event that
    /// already looked the slot up never ends up on an orphan.
    async fn reap(&self, room_id: &RoomId) {
        let mut rooms = self.rooms.write().await;
        let removable = match rooms.get(room_id) {
            Some(slot) if Arc::strong_count(slot) == 1 => slot
                .try_lock()
                .map(|slot| slot.is_idle())
                .unwrap_or(false),
            _ => false,
        };
        if removable {
            rooms.remove(room_id);
            tracing::debug!(room_id = %room_id, "Released idle room");
        }
    }

    /// Lifecycle state of a room. Unknown rooms are cold.
    pub async fn lifecycle(&self, room_id: &RoomId) -> RoomLifecycle {
        let slot = self.rooms.read().await.get(room_id).cloned();
        match slot {
            Some(slot) => slot.lock().await.lifecycle(),
            None => RoomLifecycle::Cold,
        }
    }

    /// Number of peers attached to a room.
    pub async fn connection_count(&self, room_id: &RoomId) -> usize {
        let slot = self.rooms.read().await.get(room_id).cloned();
        match slot {
            Some(slot) => slot.lock().await.registry.len(),
            None => 0,
        }
    }

    /// Number of rooms currently holding a slot.
    pub async fn active_rooms(&self) -> usize {
        self.rooms.read().await.len()
    }
}
