//! Foundation module - Shared domain primitives.
//!
//! Identifiers, validation errors and the lifecycle state machine trait
//! that the room module builds on.

mod errors;
mod ids;
mod state_machine;

pub use errors::{TransitionError, ValidationError};
pub use ids::{ConnectionId, RoomId, MAX_ROOM_ID_LEN};
pub use state_machine::StateMachine;
