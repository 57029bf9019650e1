//! HTTP adapter - axum router for the relay.
//!
//! ```text
//! /room/:room_id   ANY   → admission hook → RoomHost (or WebSocket upgrade)
//! /health          GET   → liveness
//! *                      → 404 "Unrecognized request: {uri}"
//! ```

pub mod middleware;
pub mod room;

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::RoomHost;
use crate::config::ServerConfig;
use crate::ports::{AdmissionHook, PassThrough};

pub use room::{room_routes, RoomHandlers};

/// Build the relay router with pass-through admission and no extra layers.
pub fn router(host: Arc<RoomHost>) -> Router {
    router_with_admission(host, Arc::new(PassThrough))
}

/// Build the relay router with a custom admission hook.
pub fn router_with_admission(host: Arc<RoomHost>, admission: Arc<dyn AdmissionHook>) -> Router {
    room_routes(RoomHandlers::new(host), admission)
}

/// Wrap a router with tracing, CORS and request timeout layers.
pub fn with_server_layers(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(cors_layer(config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else if config.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::permissive()
    }
}
