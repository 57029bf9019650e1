//! Durable Store port - Key-value persistence scoped to a room.
//!
//! The relay treats the store as an opaque `get`/`put` interface and as the
//! source of truth across process restarts. Adapters live in
//! `adapters::storage`.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::foundation::RoomId;

/// Errors that can occur during durable store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize value for key '{key}': {reason}")]
    SerializationFailed { key: String, reason: String },

    #[error("Failed to deserialize value for key '{key}': {reason}")]
    DeserializationFailed { key: String, reason: String },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for room-scoped key-value persistence.
///
/// Every call names the room it belongs to; implementations must keep the
/// key spaces of different rooms disjoint.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read a value.
    ///
    /// # Returns
    /// `Ok(None)` when nothing was ever stored under `key` for this room.
    async fn get(&self, room_id: &RoomId, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a value, replacing any previous one.
    ///
    /// Returning `Ok(())` acknowledges that the value is durable.
    async fn put(&self, room_id: &RoomId, key: &str, value: &Value) -> Result<(), StoreError>;
}
