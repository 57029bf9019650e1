//! HTTP middleware.

pub mod admission;

pub use admission::{admission_middleware, AdmissionState};
