//! Response bodies for room endpoints not produced by the room core.

use serde::Serialize;

/// Plain-text body for a rejected POST.
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";

/// Plain-text body when the room could not be activated.
pub const ROOM_UNAVAILABLE: &str = "Room unavailable";

/// Plain-text body when the broadcast went out but the log write failed.
pub const NOT_PERSISTED: &str = "Message broadcast but not persisted";

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Rooms currently holding a slot on this server.
    pub rooms: usize,
}
