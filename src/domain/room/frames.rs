//! Frames the server originates on its own.
//!
//! Broadcast frames are passed through from POST bodies (see
//! [`super::envelope`]); only the welcome frame is shaped here.

use serde::Serialize;

use crate::domain::foundation::{ConnectionId, RoomId};

/// Server-originated socket frames.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Sent once to each peer immediately after it is accepted.
    Welcome(WelcomeFrame),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeFrame {
    pub room: String,
    pub connection_id: String,
}

impl ServerFrame {
    pub fn welcome(room_id: &RoomId, connection_id: &ConnectionId) -> Self {
        ServerFrame::Welcome(WelcomeFrame {
            room: room_id.to_string(),
            connection_id: connection_id.to_string(),
        })
    }

    /// Serializes the frame to its wire text.
    pub fn to_text(&self) -> String {
        serde_json::to_string(self).expect("ServerFrame serialization should not fail")
    }
}
