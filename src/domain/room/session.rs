//! Room session core.
//!
//! One `RoomSession` exists per active room. It is built by
//! [`RoomSession::activate`], which rehydrates the message log before the
//! session can be used, so every handler can assume the room is `Ready`.
//!
//! The session is driven by the host one event at a time. It never owns
//! the connection registry; the host lends it per event so that peers stay
//! attached while the session itself hibernates.

use http::Method;
use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{ConnectionId, RoomId, StateMachine};

use super::context::RoomContext;
use super::envelope::{summarize, InboundMessage};
use super::errors::RoomError;
use super::frames::ServerFrame;
use super::lifecycle::RoomLifecycle;
use super::mode::RelayMode;
use super::registry::{Connection, ConnectionRegistry};

/// Successful reply to an HTTP request, serialized as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RoomReply {
    Posted(PostReceipt),
    Info(RoomInfo),
}

/// Body of a successful POST.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostReceipt {
    pub success: bool,
    pub room: String,
    /// Peers connected after the broadcast.
    pub connections: usize,
}

/// Body of any non-POST request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomInfo {
    pub room: String,
    /// Length of the message log; 0 when persistence is off.
    pub messages: usize,
    pub connections: usize,
}

#[derive(Debug)]
pub struct RoomSession {
    context: RoomContext,
    mode: RelayMode,
    lifecycle: RoomLifecycle,
    message_log: Vec<Value>,
}

impl RoomSession {
    /// Runs `Cold → Starting → Ready`.
    ///
    /// With persistence on, the message log is read from the store first;
    /// the session does not exist until that read has finished.
    ///
    /// # Errors
    ///
    /// `RoomError::StoreUnavailable` if rehydration fails. The room is then
    /// still cold and the next event retries.
    pub async fn activate(context: RoomContext, mode: RelayMode) -> Result<Self, RoomError> {
        let lifecycle = RoomLifecycle::Cold.transition_to(RoomLifecycle::Starting)?;

        let message_log = if mode.persist_messages {
            match context.load_messages().await {
                Ok(log) => log,
                Err(e) => {
                    lifecycle.transition_to(RoomLifecycle::Cold)?;
                    tracing::error!(
                        room_id = %context.id(),
                        "Rehydration failed, room stays cold: {}",
                        e
                    );
                    return Err(RoomError::StoreUnavailable(e));
                }
            }
        } else {
            Vec::new()
        };

        let lifecycle = lifecycle.transition_to(RoomLifecycle::Ready)?;
        tracing::info!(
            room_id = %context.id(),
            messages = message_log.len(),
            "Room ready"
        );

        Ok(Self {
            context,
            mode,
            lifecycle,
            message_log,
        })
    }

    /// Drops all in-memory state, returning the room to `Cold`.
    pub fn hibernate(self) -> Result<RoomLifecycle, RoomError> {
        let lifecycle = self.lifecycle.transition_to(RoomLifecycle::Cold)?;
        tracing::info!(room_id = %self.context.id(), "Room hibernated");
        Ok(lifecycle)
    }

    pub fn id(&self) -> &RoomId {
        self.context.id()
    }

    pub fn lifecycle(&self) -> RoomLifecycle {
        self.lifecycle
    }

    pub fn mode(&self) -> &RelayMode {
        &self.mode
    }

    /// In-memory copy of the message log, oldest first.
    pub fn message_log(&self) -> &[Value] {
        &self.message_log
    }

    fn ensure_ready(&self) -> Result<(), RoomError> {
        if self.lifecycle.is_ready() {
            Ok(())
        } else {
            Err(RoomError::NotReady(self.lifecycle))
        }
    }

    /// Handles one HTTP request.
    ///
    /// POST parses and broadcasts the body; every other method is a
    /// read-only info request.
    ///
    /// # Errors
    ///
    /// - `MalformedRequest`: nothing was broadcast or stored.
    /// - `NotPersisted`: peers received the message and the in-memory log
    ///   holds it, but the store write failed. The next successful write
    ///   carries it.
    pub async fn handle_request(
        &mut self,
        registry: &ConnectionRegistry,
        method: &Method,
        body: &[u8],
    ) -> Result<RoomReply, RoomError> {
        self.ensure_ready()?;

        if method != Method::POST {
            return Ok(RoomReply::Info(self.info(registry)));
        }

        let message = match InboundMessage::parse(body, self.mode.envelope_mode) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(room_id = %self.id(), "Rejected request: {}", e);
                return Err(e);
            }
        };

        tracing::info!(
            room_id = %self.id(),
            request_id = message.request_id().unwrap_or("-"),
            body = %message.summary(self.mode.preview_chars),
            "Received message"
        );

        let report = registry.broadcast(message.frame());
        tracing::info!(
            room_id = %self.id(),
            delivered = report.delivered,
            failed = report.failed,
            "Broadcasted to {} connections",
            report.attempted
        );

        if self.mode.persist_messages {
            self.append_and_persist(message.into_log_entry()).await?;
        }

        Ok(RoomReply::Posted(PostReceipt {
            success: true,
            room: self.id().to_string(),
            connections: registry.len(),
        }))
    }

    /// Current room info, as reported to non-POST requests.
    pub fn info(&self, registry: &ConnectionRegistry) -> RoomInfo {
        RoomInfo {
            room: self.id().to_string(),
            messages: if self.mode.persist_messages {
                self.message_log.len()
            } else {
                0
            },
            connections: registry.len(),
        }
    }

    async fn append_and_persist(&mut self, entry: Value) -> Result<(), RoomError> {
        self.message_log.push(entry);
        if let Some(max) = self.mode.max_log_entries {
            let excess = self.message_log.len().saturating_sub(max);
            if excess > 0 {
                self.message_log.drain(..excess);
            }
        }

        self.context
            .save_messages(&self.message_log)
            .await
            .map_err(|e| {
                tracing::error!(
                    room_id = %self.context.id(),
                    "Failed to persist message log: {}",
                    e
                );
                RoomError::NotPersisted(e)
            })
    }

    /// Greets a peer the registry has just accepted.
    ///
    /// The welcome frame is the first frame the peer receives.
    pub fn on_connect(&self, connection: &Connection) -> Result<(), RoomError> {
        self.ensure_ready()?;
        tracing::info!(
            room_id = %self.id(),
            connection_id = %connection.id(),
            "Connection connected"
        );

        let welcome = ServerFrame::welcome(self.id(), &connection.id()).to_text();
        if let Err(e) = connection.send(welcome) {
            tracing::debug!(
                connection_id = %connection.id(),
                "Failed to send welcome: {}",
                e
            );
        }
        Ok(())
    }

    /// Logs a peer-originated frame. Peers cannot change room state.
    pub fn on_message(&self, connection_id: &ConnectionId, text: &str) -> Result<(), RoomError> {
        self.ensure_ready()?;
        match serde_json::from_str::<Value>(text) {
            Ok(parsed) => tracing::debug!(
                room_id = %self.id(),
                connection_id = %connection_id,
                message = %summarize(&parsed, self.mode.preview_chars),
                "Message from peer"
            ),
            Err(e) => tracing::debug!(
                room_id = %self.id(),
                connection_id = %connection_id,
                "Unparseable message from peer: {}",
                e
            ),
        }
        Ok(())
    }

    pub fn on_error(&self, connection_id: &ConnectionId, error: &str) -> Result<(), RoomError> {
        self.ensure_ready()?;
        tracing::warn!(
            room_id = %self.id(),
            connection_id = %connection_id,
            "Connection error: {}",
            error
        );
        Ok(())
    }

    pub fn on_close(&self, connection_id: &ConnectionId) -> Result<(), RoomError> {
        self.ensure_ready()?;
        tracing::info!(
            room_id = %self.id(),
            connection_id = %connection_id,
            "Connection closed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::adapters::storage::InMemoryDurableStore;
    use crate::domain::room::context::MESSAGES_KEY;
    use crate::domain::room::mode::EnvelopeMode;
    use crate::domain::room::registry::test_support::recording_connection;
    use crate::ports::{DurableStore, StoreError};

    /// Store that can be switched into failure mode.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryDurableStore,
        failing: AtomicBool,
    }

    impl FlakyStore {
        fn fail(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), StoreError> {
            if self.failing.load(Ordering::SeqCst) {
                Err(StoreError::Unavailable("store offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl DurableStore for FlakyStore {
        async fn get(&self, room_id: &RoomId, key: &str) -> Result<Option<Value>, StoreError> {
            self.check()?;
            self.inner.get(room_id, key).await
        }

        async fn put(&self, room_id: &RoomId, key: &str, value: &Value) -> Result<(), StoreError> {
            self.check()?;
            self.inner.put(room_id, key, value).await
        }
    }

    fn room_id() -> RoomId {
        RoomId::new("abc").unwrap()
    }

    async fn activate(store: Arc<dyn DurableStore>, mode: RelayMode) -> RoomSession {
        RoomSession::activate(RoomContext::new(room_id(), store), mode)
            .await
            .unwrap()
    }

    fn post(request_id: &str, body: &str) -> Vec<u8> {
        json!({"requestId": request_id, "body": body})
            .to_string()
            .into_bytes()
    }

    #[tokio::test]
    async fn activation_reaches_ready_with_empty_log() {
        let store = Arc::new(InMemoryDurableStore::new());
        let session = activate(store, RelayMode::default()).await;

        assert_eq!(session.lifecycle(), RoomLifecycle::Ready);
        assert!(session.message_log().is_empty());
    }

    #[tokio::test]
    async fn activation_rehydrates_persisted_log() {
        let store = Arc::new(InMemoryDurableStore::new());
        store
            .put(&room_id(), MESSAGES_KEY, &json!(["a", "b"]))
            .await
            .unwrap();

        let session = activate(store, RelayMode::default()).await;
        assert_eq!(session.message_log(), &[json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn activation_skips_store_when_not_persisting() {
        let store = Arc::new(FlakyStore::default());
        store.fail(true);

        let session = activate(store, RelayMode::ephemeral(EnvelopeMode::Raw)).await;
        assert_eq!(session.lifecycle(), RoomLifecycle::Ready);
    }

    #[tokio::test]
    async fn activation_failure_reports_store_unavailable() {
        let store = Arc::new(FlakyStore::default());
        store.fail(true);

        let err = RoomSession::activate(RoomContext::new(room_id(), store), RelayMode::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RoomError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn post_broadcasts_to_every_peer_and_reports_count() {
        let store = Arc::new(InMemoryDurableStore::new());
        let mut session = activate(store, RelayMode::default()).await;
        let mut registry = ConnectionRegistry::new();
        let (a, sink_a) = recording_connection();
        let (b, sink_b) = recording_connection();
        registry.register(a);
        registry.register(b);

        let reply = session
            .handle_request(&registry, &Method::POST, &post("r1", "hello"))
            .await
            .unwrap();

        assert_eq!(
            reply,
            RoomReply::Posted(PostReceipt {
                success: true,
                room: "abc".to_string(),
                connections: 2,
            })
        );
        assert_eq!(sink_a.frames(), vec!["hello".to_string()]);
        assert_eq!(sink_b.frames(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn post_appends_and_persists_log() {
        let store = Arc::new(InMemoryDurableStore::new());
        let mut session = activate(store.clone(), RelayMode::default()).await;
        let registry = ConnectionRegistry::new();

        for (i, body) in ["one", "two", "three"].iter().enumerate() {
            session
                .handle_request(&registry, &Method::POST, &post(&format!("r{}", i), body))
                .await
                .unwrap();
        }

        let stored = store.get(&room_id(), MESSAGES_KEY).await.unwrap();
        assert_eq!(stored, Some(json!(["one", "two", "three"])));
        assert_eq!(session.info(&registry).messages, 3);
    }

    #[tokio::test]
    async fn malformed_post_changes_nothing() {
        let store = Arc::new(InMemoryDurableStore::new());
        let mut session = activate(store.clone(), RelayMode::default()).await;
        let mut registry = ConnectionRegistry::new();
        let (conn, sink) = recording_connection();
        registry.register(conn);

        let bodies: [&[u8]; 3] = [b"not json", br#"{"requestId":"r1"}"#, br#"{"body":"x"}"#];
        for body in bodies {
            let err = session
                .handle_request(&registry, &Method::POST, body)
                .await
                .unwrap_err();
            assert!(matches!(err, RoomError::MalformedRequest(_)));
        }

        assert!(sink.frames().is_empty());
        assert!(session.message_log().is_empty());
        assert_eq!(store.get(&room_id(), MESSAGES_KEY).await.unwrap(), None);

        session
            .handle_request(&registry, &Method::POST, &post("r2", "ok"))
            .await
            .unwrap();
        assert_eq!(sink.frames(), vec!["ok".to_string()]);
    }

    #[tokio::test]
    async fn non_post_methods_report_info() {
        let store = Arc::new(InMemoryDurableStore::new());
        let mut session = activate(store, RelayMode::default()).await;
        let mut registry = ConnectionRegistry::new();
        registry.register(recording_connection().0);

        session
            .handle_request(&registry, &Method::POST, &post("r1", "hello"))
            .await
            .unwrap();

        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH] {
            let reply = session
                .handle_request(&registry, &method, b"ignored")
                .await
                .unwrap();
            assert_eq!(
                reply,
                RoomReply::Info(RoomInfo {
                    room: "abc".to_string(),
                    messages: 1,
                    connections: 1,
                })
            );
        }
    }

    #[tokio::test]
    async fn ephemeral_room_reports_zero_messages() {
        let store = Arc::new(InMemoryDurableStore::new());
        let mut session =
            activate(store.clone(), RelayMode::ephemeral(EnvelopeMode::Correlated)).await;
        let registry = ConnectionRegistry::new();

        session
            .handle_request(&registry, &Method::POST, br#"{"body":{"k":1}}"#)
            .await
            .unwrap();

        assert_eq!(session.info(&registry).messages, 0);
        assert_eq!(store.get(&room_id(), MESSAGES_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn correlated_room_logs_envelopes() {
        let store = Arc::new(InMemoryDurableStore::new());
        let mut session =
            activate(store.clone(), RelayMode::persistent(EnvelopeMode::Correlated)).await;
        let mut registry = ConnectionRegistry::new();
        let (conn, sink) = recording_connection();
        registry.register(conn);

        session
            .handle_request(
                &registry,
                &Method::POST,
                br#"{"requestId":"r9","body":{"k":1}}"#,
            )
            .await
            .unwrap();

        let expected = json!({"requestId": "r9", "body": {"k": 1}});
        let frame: Value = serde_json::from_str(&sink.frames()[0]).unwrap();
        assert_eq!(frame, expected);
        assert_eq!(
            store.get(&room_id(), MESSAGES_KEY).await.unwrap(),
            Some(json!([expected]))
        );
    }

    #[tokio::test]
    async fn retention_cap_drops_oldest_entries() {
        let store = Arc::new(InMemoryDurableStore::new());
        let mode = RelayMode {
            max_log_entries: Some(2),
            ..RelayMode::default()
        };
        let mut session = activate(store.clone(), mode).await;
        let registry = ConnectionRegistry::new();

        for body in ["a", "b", "c"] {
            session
                .handle_request(&registry, &Method::POST, &post("r", body))
                .await
                .unwrap();
        }

        assert_eq!(session.message_log(), &[json!("b"), json!("c")]);
        assert_eq!(
            store.get(&room_id(), MESSAGES_KEY).await.unwrap(),
            Some(json!(["b", "c"]))
        );
    }

    #[tokio::test]
    async fn persistence_failure_keeps_broadcast_and_heals_later() {
        let store = Arc::new(FlakyStore::default());
        let mut session = activate(store.clone(), RelayMode::default()).await;
        let mut registry = ConnectionRegistry::new();
        let (conn, sink) = recording_connection();
        registry.register(conn);

        store.fail(true);
        let err = session
            .handle_request(&registry, &Method::POST, &post("r1", "first"))
            .await
            .unwrap_err();
        assert!(matches!(err, RoomError::NotPersisted(_)));
        assert_eq!(sink.frames(), vec!["first".to_string()]);

        store.fail(false);
        session
            .handle_request(&registry, &Method::POST, &post("r2", "second"))
            .await
            .unwrap();

        assert_eq!(
            store.get(&room_id(), MESSAGES_KEY).await.unwrap(),
            Some(json!(["first", "second"]))
        );
    }

    #[tokio::test]
    async fn welcome_precedes_broadcast() {
        let store = Arc::new(InMemoryDurableStore::new());
        let mut session = activate(store, RelayMode::default()).await;
        let mut registry = ConnectionRegistry::new();
        let (conn, sink) = recording_connection();

        registry.register(conn.clone());
        session.on_connect(&conn).unwrap();
        session
            .handle_request(&registry, &Method::POST, &post("r1", "hello"))
            .await
            .unwrap();

        let frames = sink.frames();
        assert_eq!(frames.len(), 2);
        let welcome: Value = serde_json::from_str(&frames[0]).unwrap();
        assert_eq!(welcome["type"], "welcome");
        assert_eq!(welcome["room"], "abc");
        assert_eq!(welcome["connectionId"], conn.id().to_string());
        assert_eq!(frames[1], "hello");
    }

    #[tokio::test]
    async fn peer_messages_never_mutate_state() {
        let store = Arc::new(InMemoryDurableStore::new());
        let session = activate(store, RelayMode::default()).await;
        let id = ConnectionId::new();

        session.on_message(&id, r#"{"requestId":"x","body":"y"}"#).unwrap();
        session.on_message(&id, "{{ not json").unwrap();
        session.on_error(&id, "reset by peer").unwrap();
        session.on_close(&id).unwrap();

        assert!(session.message_log().is_empty());
    }

    #[tokio::test]
    async fn hibernate_returns_cold() {
        let store = Arc::new(InMemoryDurableStore::new());
        let session = activate(store, RelayMode::default()).await;

        assert_eq!(session.hibernate().unwrap(), RoomLifecycle::Cold);
    }

    #[tokio::test]
    async fn reactivation_reproduces_message_count() {
        let store = Arc::new(InMemoryDurableStore::new());
        let registry = ConnectionRegistry::new();
        let mut session = activate(store.clone(), RelayMode::default()).await;
        for body in ["x", "y"] {
            session
                .handle_request(&registry, &Method::POST, &post("r", body))
                .await
                .unwrap();
        }
        let before = session.info(&registry);
        session.hibernate().unwrap();

        let session = activate(store, RelayMode::default()).await;
        assert_eq!(session.info(&registry), before);
    }
}
