//! Room Relay - room-scoped broadcast relay over HTTP and WebSocket.
//!
//! Each room fans inbound messages out to its connected peers and can keep
//! a durable log of what it broadcast, rehydrated whenever the room wakes.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
