//! HTTP routes for room endpoints.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, get},
    Router,
};

use crate::adapters::http::middleware::admission_middleware;
use crate::ports::AdmissionHook;

use super::handlers::{health, room_request, unrecognized, RoomHandlers};

/// Creates the room router.
///
/// Admission hooks wrap only the room route: health checks and unmatched
/// paths never reach them.
pub fn room_routes(handlers: RoomHandlers, admission: Arc<dyn AdmissionHook>) -> Router {
    let rooms = Router::new()
        .route("/room/:room_id", any(room_request))
        .route_layer(middleware::from_fn_with_state(admission, admission_middleware));

    Router::new()
        .merge(rooms)
        .route("/health", get(health))
        .fallback(unrecognized)
        .with_state(handlers)
}
