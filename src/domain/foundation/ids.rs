//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Longest room identifier accepted from a request path.
pub const MAX_ROOM_ID_LEN: usize = 256;

/// Identifier of a room, assigned by the hosting environment.
///
/// Opaque to the relay: it is only ever compared, displayed and used to
/// scope durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Creates a RoomId, rejecting empty or oversized identifiers.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("room_id"));
        }
        if id.chars().count() > MAX_ROOM_ID_LEN {
            return Err(ValidationError::invalid_format(
                "room_id",
                format!("must be at most {} characters", MAX_ROOM_ID_LEN),
            ));
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RoomId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Unique identifier for one attached peer, generated at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Creates a new random ConnectionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ConnectionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConnectionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_id_accepts_opaque_strings() {
        let id = RoomId::new("abc").unwrap();
        assert_eq!(id.as_str(), "abc");
        assert_eq!(id.to_string(), "abc");

        let id: RoomId = "team/alpha:1".parse().unwrap();
        assert_eq!(id.as_str(), "team/alpha:1");
    }

    #[test]
    fn room_id_rejects_empty() {
        assert!(matches!(
            RoomId::new(""),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn room_id_rejects_oversized() {
        let long = "x".repeat(MAX_ROOM_ID_LEN + 1);
        assert!(matches!(
            RoomId::new(long),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(RoomId::new("x".repeat(MAX_ROOM_ID_LEN)).is_ok());
    }

    #[test]
    fn room_id_serializes_transparently() {
        let id = RoomId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""abc""#);
    }

    #[test]
    fn connection_ids_are_unique() {
        assert_ne!(ConnectionId::new(), ConnectionId::new());
    }

    #[test]
    fn connection_id_round_trips_through_display() {
        let id = ConnectionId::new();
        let parsed: ConnectionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.to_string().len(), 36);
    }
}
