//! Inbound message parsing and outbound frame shaping.
//!
//! A POST body becomes an [`InboundMessage`]: the text frame sent to every
//! peer plus the value appended to the message log. The body itself is
//! never inspected beyond a short diagnostic summary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::RoomError;
use super::mode::EnvelopeMode;

/// Simple-relay POST body. `body` must be a string; `requestId` is only
/// used for logging.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPost {
    #[serde(default)]
    request_id: Option<String>,
    body: String,
}

/// Correlation envelope: an opaque request id paired with any JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub body: Value,
}

/// A parsed POST, ready to broadcast and log.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    request_id: Option<String>,
    body: Value,
    frame: String,
    log_entry: Value,
}

impl InboundMessage {
    /// Parses a POST body according to the envelope mode.
    ///
    /// # Errors
    ///
    /// `RoomError::MalformedRequest` if the body is not JSON or a required
    /// field is missing or has the wrong type.
    pub fn parse(raw: &[u8], mode: EnvelopeMode) -> Result<Self, RoomError> {
        match mode {
            EnvelopeMode::Raw => {
                let post: RawPost = serde_json::from_slice(raw)
                    .map_err(|e| RoomError::MalformedRequest(e.to_string()))?;
                Ok(Self {
                    request_id: post.request_id,
                    frame: post.body.clone(),
                    log_entry: Value::String(post.body.clone()),
                    body: Value::String(post.body),
                })
            }
            EnvelopeMode::Correlated => {
                let envelope: Envelope = serde_json::from_slice(raw)
                    .map_err(|e| RoomError::MalformedRequest(e.to_string()))?;
                let log_entry = envelope_value(&envelope);
                Ok(Self {
                    request_id: envelope.request_id,
                    body: envelope.body,
                    frame: log_entry.to_string(),
                    log_entry,
                })
            }
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Text frame delivered to every peer.
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// Value appended to the message log.
    pub fn log_entry(&self) -> &Value {
        &self.log_entry
    }

    pub fn into_log_entry(self) -> Value {
        self.log_entry
    }

    /// Diagnostic summary of the body, see [`summarize`].
    pub fn summary(&self, preview_chars: usize) -> String {
        summarize(&self.body, preview_chars)
    }
}

fn envelope_value(envelope: &Envelope) -> Value {
    let mut object = serde_json::Map::new();
    if let Some(request_id) = &envelope.request_id {
        object.insert("requestId".to_string(), Value::String(request_id.clone()));
    }
    object.insert("body".to_string(), envelope.body.clone());
    Value::Object(object)
}

/// Short, log-safe description of a payload.
///
/// Strings are cut to `preview_chars` characters (with a trailing `...`
/// when cut); anything else is reduced to its JSON type name.
pub fn summarize(value: &Value, preview_chars: usize) -> String {
    match value {
        Value::String(text) => {
            let mut chars = text.chars();
            let preview: String = chars.by_ref().take(preview_chars).collect();
            if chars.next().is_some() {
                format!("{}...", preview)
            } else {
                preview
            }
        }
        other => type_tag(other).to_string(),
    }
}

/// JSON type name of a value.
pub fn type_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
