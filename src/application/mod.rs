//! Application layer - orchestrates room sessions for the transport.

pub mod room_host;

pub use room_host::RoomHost;
