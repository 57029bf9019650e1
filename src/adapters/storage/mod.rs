//! Storage Adapters
//!
//! Implementations of the DurableStore port.
//!
//! ## Available Adapters
//!
//! - **InMemoryDurableStore** - Process-local map (testing/development)
//! - **FileDurableStore** - JSON files on disk
//! - **RedisDurableStore** - JSON strings in Redis
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileDurableStore, InMemoryDurableStore};
//!
//! // Single host: file-based storage
//! let store = FileDurableStore::new("./data/rooms");
//!
//! // Testing: in-memory storage
//! let store = InMemoryDurableStore::new();
//! ```

mod file_store;
mod in_memory_store;
mod redis_store;

use std::sync::Arc;

pub use file_store::FileDurableStore;
pub use in_memory_store::InMemoryDurableStore;
pub use redis_store::RedisDurableStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::ports::{DurableStore, StoreError};

/// Build the store selected by configuration.
pub async fn build_store(config: &StorageConfig) -> Result<Arc<dyn DurableStore>, StoreError> {
    let store: Arc<dyn DurableStore> = match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryDurableStore::new()),
        StorageBackend::File => Arc::new(FileDurableStore::new(&config.data_dir)),
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| StoreError::Unavailable("redis_url is not set".to_string()))?;
            Arc::new(RedisDurableStore::connect(url, config.redis_key_prefix.clone()).await?)
        }
    };
    Ok(store)
}
