//! Room activation lifecycle.
//!
//! ```text
//!          activate            rehydrated
//!   Cold ────────────► Starting ──────────► Ready
//!    ▲                    │                   │
//!    └──── store failed ──┘                   │
//!    └───────────────── hibernate ────────────┘
//! ```
//!
//! Only `Ready` serves traffic. There is no terminal state: the host may
//! send a ready room back to `Cold` at any time and the next event
//! rehydrates it.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

/// Where a room instance is in its activation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomLifecycle {
    /// No in-memory state.
    Cold,
    /// Constructed, rehydrating from the durable store.
    Starting,
    /// Serving requests and socket events.
    Ready,
}

impl RoomLifecycle {
    /// Returns true if events may be handled in this state.
    pub fn is_ready(&self) -> bool {
        matches!(self, RoomLifecycle::Ready)
    }
}

impl StateMachine for RoomLifecycle {
    fn valid_transitions(&self) -> Vec<Self> {
        use RoomLifecycle::*;
        match self {
            Cold => vec![Starting],
            Starting => vec![Ready, Cold],
            Ready => vec![Cold],
        }
    }
}
