//! Room module - the broadcast relay core.
//!
//! A room owns its activation lifecycle and message log, and fans inbound
//! messages out to the peers in its connection registry.
//!
//! - [`session`] - `RoomSession`, the per-room event handler
//! - [`registry`] - live peers of one room
//! - [`envelope`] - POST body parsing and frame shaping
//! - [`lifecycle`] - `Cold → Starting → Ready` state machine
//! - [`context`] - room identity plus scoped storage
//! - [`mode`] - relay configuration switches
//! - [`frames`] - server-originated socket frames

pub mod context;
pub mod envelope;
pub mod errors;
pub mod frames;
pub mod lifecycle;
pub mod mode;
pub mod registry;
pub mod session;

pub use context::{RoomContext, MESSAGES_KEY};
pub use envelope::{summarize, Envelope, InboundMessage};
pub use errors::RoomError;
pub use frames::{ServerFrame, WelcomeFrame};
pub use lifecycle::RoomLifecycle;
pub use mode::{EnvelopeMode, RelayMode};
pub use registry::{BroadcastReport, Connection, ConnectionRegistry};
pub use session::{PostReceipt, RoomInfo, RoomReply, RoomSession};
