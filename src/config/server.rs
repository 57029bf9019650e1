//! Listener, logging and HTTP layer settings.

use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

/// Longest request timeout accepted, in seconds.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub log_level: String,

    /// Applies to plain HTTP requests. Upgraded sockets are not timed out.
    pub request_timeout_secs: u64,

    /// Comma-separated allowed origins. Unset means permissive CORS outside
    /// production and none in production.
    pub cors_origins: Option<String>,
}

/// Deployment environment. Production switches logs to JSON and closes CORS.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,room_relay=debug,tower_http=info".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|_| ValidationError::InvalidAddress(addr))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Configured origins, blank entries dropped.
    pub fn cors_origins_list(&self) -> Vec<String> {
        let Some(origins) = &self.cors_origins else {
            return Vec::new();
        };
        origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr().map(|_| ())
    }
}
