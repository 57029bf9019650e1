//! Room error types.

use thiserror::Error;

use crate::domain::foundation::TransitionError;
use crate::ports::StoreError;

use super::lifecycle::RoomLifecycle;

/// Errors raised while a room handles an event.
///
/// None of these are fatal to the room: only the offending operation fails.
#[derive(Debug, Error)]
pub enum RoomError {
    /// POST body was not JSON or lacked a required field. Nothing was
    /// broadcast and no state changed.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Rehydration from the durable store failed; the room stays cold.
    #[error("Room unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    /// The broadcast went out but the message log could not be written.
    #[error("Message broadcast but not persisted: {0}")]
    NotPersisted(#[source] StoreError),

    /// An event reached a room that is not serving.
    #[error("Room is not ready (state: {0:?})")]
    NotReady(RoomLifecycle),

    #[error(transparent)]
    Lifecycle(#[from] TransitionError),
}

impl RoomError {
    /// True when the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RoomError::MalformedRequest(_))
    }
}
