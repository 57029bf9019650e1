//! Relay behaviour configuration

use serde::Deserialize;

use crate::domain::room::{EnvelopeMode, RelayMode};

use super::error::ValidationError;

/// How every room on this server relays and retains messages
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Keep a durable log of broadcast payloads
    #[serde(default = "default_persist_messages")]
    pub persist_messages: bool,

    /// `raw` or `correlated`
    #[serde(default)]
    pub envelope_mode: EnvelopeMode,

    /// Newest entries kept per room log; unset keeps everything
    pub max_log_entries: Option<usize>,

    /// Return a room to cold once its last peer leaves
    #[serde(default = "default_hibernate_when_empty")]
    pub hibernate_when_empty: bool,

    /// Characters of a string payload shown in logs
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl RelayConfig {
    /// The room core configuration these settings describe
    pub fn mode(&self) -> RelayMode {
        RelayMode {
            persist_messages: self.persist_messages,
            envelope_mode: self.envelope_mode,
            max_log_entries: self.max_log_entries,
            preview_chars: self.preview_chars,
        }
    }

    /// Validate relay configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_log_entries == Some(0) {
            return Err(ValidationError::InvalidLogCap);
        }
        if self.preview_chars == 0 {
            return Err(ValidationError::InvalidPreviewLength);
        }
        Ok(())
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            persist_messages: default_persist_messages(),
            envelope_mode: EnvelopeMode::default(),
            max_log_entries: None,
            hibernate_when_empty: default_hibernate_when_empty(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_persist_messages() -> bool {
    true
}

fn default_hibernate_when_empty() -> bool {
    true
}

fn default_preview_chars() -> usize {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_defaults() {
        let config = RelayConfig::default();
        assert!(config.persist_messages);
        assert_eq!(config.envelope_mode, EnvelopeMode::Raw);
        assert_eq!(config.max_log_entries, None);
        assert!(config.hibernate_when_empty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mode_mirrors_settings() {
        let config = RelayConfig {
            persist_messages: false,
            envelope_mode: EnvelopeMode::Correlated,
            max_log_entries: Some(10),
            preview_chars: 20,
            ..Default::default()
        };
        let mode = config.mode();
        assert!(!mode.persist_messages);
        assert_eq!(mode.envelope_mode, EnvelopeMode::Correlated);
        assert_eq!(mode.max_log_entries, Some(10));
        assert_eq!(mode.preview_chars, 20);
    }

    #[test]
    fn test_zero_log_cap_is_invalid() {
        let config = RelayConfig {
            max_log_entries: Some(0),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidLogCap));
    }

    #[test]
    fn test_zero_preview_is_invalid() {
        let config = RelayConfig {
            preview_chars: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPreviewLength));
    }

    #[test]
    fn test_relay_deserialization() {
        let json = r#"{
            "persist_messages": false,
            "envelope_mode": "correlated",
            "max_log_entries": 500
        }"#;

        let config: RelayConfig = serde_json::from_str(json).unwrap();
        assert!(!config.persist_messages);
        assert_eq!(config.envelope_mode, EnvelopeMode::Correlated);
        assert_eq!(config.max_log_entries, Some(500));
        assert!(config.hibernate_when_empty);
        assert_eq!(config.preview_chars, 50);
    }
}
