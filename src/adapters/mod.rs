//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the room core to the outside world:
//! - `http` - axum router, admission middleware, 404 fallback
//! - `storage` - durable store backends (in-memory, file, Redis)
//! - `websocket` - socket sessions bridged onto peer sinks

pub mod http;
pub mod storage;
pub mod websocket;

pub use storage::{build_store, FileDurableStore, InMemoryDurableStore, RedisDurableStore};
pub use websocket::ChannelPeerSink;
