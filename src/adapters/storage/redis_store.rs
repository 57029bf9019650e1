//! Redis-backed Durable Store Adapter
//!
//! Stores each room value as a JSON string under
//! `<prefix>:room:<room_id>:<key>`. Suitable when rooms must survive
//! process restarts on a different host.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde_json::Value;

use crate::domain::foundation::RoomId;
use crate::ports::{DurableStore, StoreError};

#[derive(Clone)]
pub struct RedisDurableStore {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisDurableStore {
    /// Wrap an established connection.
    pub fn new(conn: MultiplexedConnection, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    /// Open a multiplexed connection to `url`.
    pub async fn connect(url: &str, key_prefix: impl Into<String>) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self::new(conn, key_prefix))
    }

    fn redis_key(&self, room_id: &RoomId, key: &str) -> String {
        redis_key(&self.key_prefix, room_id, key)
    }
}

fn redis_key(prefix: &str, room_id: &RoomId, key: &str) -> String {
    format!("{}:room:{}:{}", prefix, room_id, key)
}

#[async_trait]
impl DurableStore for RedisDurableStore {
    async fn get(&self, room_id: &RoomId, key: &str) -> Result<Option<Value>, StoreError> {
        let mut conn = self.conn.clone();

        let raw: Option<String> = conn
            .get(self.redis_key(room_id, key))
            .await
            .map_err(|e: redis::RedisError| StoreError::Unavailable(e.to_string()))?;

        raw.map(|json| {
            serde_json::from_str(&json).map_err(|e| StoreError::DeserializationFailed {
                key: key.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()
    }

    async fn put(&self, room_id: &RoomId, key: &str, value: &Value) -> Result<(), StoreError> {
        let json = serde_json::to_string(value).map_err(|e| StoreError::SerializationFailed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(self.redis_key(room_id, key), json)
            .await
            .map_err(|e: redis::RedisError| StoreError::Unavailable(e.to_string()))
    }
}
