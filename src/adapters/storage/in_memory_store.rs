//! In-Memory Durable Store Adapter
//!
//! Keeps room values in a process-local map. Survives room hibernation but
//! not process restarts. Useful for testing and development.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::RoomId;
use crate::ports::{DurableStore, StoreError};

/// In-memory key-value storage, one key space per room
#[derive(Debug, Clone, Default)]
pub struct InMemoryDurableStore {
    values: Arc<RwLock<HashMap<(RoomId, String), Value>>>,
}

impl InMemoryDurableStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove everything (useful for tests)
    pub async fn clear(&self) {
        self.values.write().await.clear();
    }

    /// Number of stored keys across all rooms
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }
}

#[async_trait]
impl DurableStore for InMemoryDurableStore {
    async fn get(&self, room_id: &RoomId, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.read().await;
        Ok(values.get(&(room_id.clone(), key.to_string())).cloned())
    }

    async fn put(&self, room_id: &RoomId, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut values = self.values.write().await;
        values.insert((room_id.clone(), key.to_string()), value.clone());
        Ok(())
    }
}
