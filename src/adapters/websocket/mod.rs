//! WebSocket adapter - binds upgraded sockets to rooms.
//!
//! ```text
//!  peer socket ──► handle_socket ──► RoomHost::connect / message / disconnect
//!       ▲                                   │
//!       └──── writer task ◄── ChannelPeerSink (queue) ◄── room broadcast
//! ```
//!
//! - [`handler`] - per-socket driver
//! - [`sink`] - queue-backed `PeerSink`

pub mod handler;
pub mod sink;

pub use handler::handle_socket;
pub use sink::ChannelPeerSink;
