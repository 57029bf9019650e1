//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `ROOM_RELAY` prefix and nested values use double underscores as separators.
//!
//! Every value has a default, so an empty environment yields a working
//! development server with in-memory storage.
//!
//! # Example
//!
//! ```no_run
//! use room_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod relay;
mod server;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use relay::RelayConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Relay behaviour shared by all rooms
    #[serde(default)]
    pub relay: RelayConfig,

    /// Durable store selection
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `ROOM_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `ROOM_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `ROOM_RELAY__RELAY__ENVELOPE_MODE=correlated` -> `relay.envelope_mode`
    /// - `ROOM_RELAY__STORAGE__BACKEND=redis` -> `storage.backend`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ROOM_RELAY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.relay.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
