//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the room core and the outside world. Adapters implement these ports.
//!
//! - `DurableStore` - Room-scoped key-value persistence
//! - `PeerSink` - Non-blocking outbound delivery to one peer
//! - `AdmissionHook` - Pre-request and pre-connect interception

mod admission_hook;
mod durable_store;
mod peer_sink;

pub use admission_hook::{Admission, AdmissionHook, PassThrough};
pub use durable_store::{DurableStore, StoreError};
pub use peer_sink::{PeerSendError, PeerSink};
