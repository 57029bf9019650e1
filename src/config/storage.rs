//! Durable store configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Which DurableStore adapter backs the rooms
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Redis,
}

/// Durable store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Root directory for the file backend
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Redis connection URL for the redis backend
    pub redis_url: Option<String>,

    /// Namespace prepended to every Redis key
    #[serde(default = "default_redis_key_prefix")]
    pub redis_key_prefix: String,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.backend {
            StorageBackend::Memory => Ok(()),
            StorageBackend::File => {
                if self.data_dir.as_os_str().is_empty() {
                    return Err(ValidationError::MissingRequired("STORAGE__DATA_DIR"));
                }
                Ok(())
            }
            StorageBackend::Redis => {
                let url = self
                    .redis_url
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .ok_or(ValidationError::MissingRequired("STORAGE__REDIS_URL"))?;
                if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                    return Err(ValidationError::InvalidRedisUrl);
                }
                Ok(())
            }
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: default_data_dir(),
            redis_url: None,
            redis_key_prefix: default_redis_key_prefix(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/rooms")
}

fn default_redis_key_prefix() -> String {
    "room-relay".to_string()
}
