//! File-based Durable Store Adapter
//!
//! Stores each room value as a JSON file under `<base>/<room>/<key>.json`.
//! Room ids and keys are escaped so any opaque id maps to a single safe
//! path component.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::RoomId;
use crate::ports::{DurableStore, StoreError};

/// File-based storage for room values
#[derive(Debug, Clone)]
pub struct FileDurableStore {
    base_path: PathBuf,
}

impl FileDurableStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileDurableStore::new("./data/rooms");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn room_dir(&self, room_id: &RoomId) -> PathBuf {
        self.base_path.join(escape_component(room_id.as_str()))
    }

    fn value_path(&self, room_id: &RoomId, key: &str) -> PathBuf {
        self.room_dir(room_id)
            .join(format!("{}.json", escape_component(key)))
    }
}

/// Escapes everything outside `[A-Za-z0-9_-]` as `%XX`, byte by byte.
fn escape_component(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            escaped.push(byte as char);
        } else {
            escaped.push_str(&format!("%{:02X}", byte));
        }
    }
    escaped
}

#[async_trait]
impl DurableStore for FileDurableStore {
    async fn get(&self, room_id: &RoomId, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.value_path(room_id, key);

        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::IoError(e.to_string())),
        };

        let value = serde_json::from_slice(&raw).map_err(|e| StoreError::DeserializationFailed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Some(value))
    }

    async fn put(&self, room_id: &RoomId, key: &str, value: &Value) -> Result<(), StoreError> {
        let dir = self.room_dir(room_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        let json = serde_json::to_vec(value).map_err(|e| StoreError::SerializationFailed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        // Readers only ever see complete files.
        let path = self.value_path(room_id, key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))?;

        Ok(())
    }
}
