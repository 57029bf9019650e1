//! Relay behaviour switches.

use serde::Deserialize;

/// Shape of inbound POST bodies and outbound broadcast frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeMode {
    /// `{requestId: string, body: string}`; peers receive the bare body string.
    #[default]
    Raw,
    /// `{requestId?: string, body: any}`; peers receive the whole envelope
    /// as JSON so they can filter on `requestId`.
    Correlated,
}

/// Configuration of one room core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMode {
    /// Keep and persist a log of broadcast payloads.
    pub persist_messages: bool,
    pub envelope_mode: EnvelopeMode,
    /// Retention cap for the message log. `None` keeps everything.
    pub max_log_entries: Option<usize>,
    /// Characters kept in the diagnostic preview of string payloads.
    pub preview_chars: usize,
}

impl Default for RelayMode {
    fn default() -> Self {
        Self {
            persist_messages: true,
            envelope_mode: EnvelopeMode::Raw,
            max_log_entries: None,
            preview_chars: 50,
        }
    }
}

impl RelayMode {
    /// Plain relay without history.
    pub fn ephemeral(envelope_mode: EnvelopeMode) -> Self {
        Self {
            persist_messages: false,
            envelope_mode,
            ..Self::default()
        }
    }

    /// Relay that keeps every broadcast payload.
    pub fn persistent(envelope_mode: EnvelopeMode) -> Self {
        Self {
            persist_messages: true,
            envelope_mode,
            ..Self::default()
        }
    }
}
