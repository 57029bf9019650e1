//! Per-activation room context.
//!
//! Bundles the room's identity with its storage handle so neither has to
//! be ambient. Built once each time a room leaves `Cold`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::RoomId;
use crate::ports::{DurableStore, StoreError};

/// Durable key holding a room's message log.
pub const MESSAGES_KEY: &str = "messages";

#[derive(Clone)]
pub struct RoomContext {
    id: RoomId,
    store: Arc<dyn DurableStore>,
}

impl RoomContext {
    pub fn new(id: RoomId, store: Arc<dyn DurableStore>) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Reads the persisted message log. A room that never stored one has
    /// an empty log.
    pub async fn load_messages(&self) -> Result<Vec<Value>, StoreError> {
        match self.store.get(&self.id, MESSAGES_KEY).await? {
            None => Ok(Vec::new()),
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => Err(StoreError::DeserializationFailed {
                key: MESSAGES_KEY.to_string(),
                reason: format!("expected array, found {}", super::envelope::type_tag(&other)),
            }),
        }
    }

    /// Writes the whole message log.
    pub async fn save_messages(&self, log: &[Value]) -> Result<(), StoreError> {
        self.store
            .put(&self.id, MESSAGES_KEY, &Value::Array(log.to_vec()))
            .await
    }
}

impl fmt::Debug for RoomContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoomContext").field("id", &self.id).finish()
    }
}
