//! HTTP handlers for room endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State, WebSocketUpgrade},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::websocket::handle_socket;
use crate::application::RoomHost;
use crate::domain::foundation::RoomId;
use crate::domain::room::RoomError;

use super::dto::{HealthResponse, INVALID_REQUEST_BODY, NOT_PERSISTED, ROOM_UNAVAILABLE};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct RoomHandlers {
    host: Arc<RoomHost>,
}

impl RoomHandlers {
    pub fn new(host: Arc<RoomHost>) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &Arc<RoomHost> {
        &self.host
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// ANY /room/:room_id
///
/// - GET with upgrade headers: attach a WebSocket peer
/// - POST: broadcast the body
/// - anything else: room info
pub async fn room_request(
    State(handlers): State<RoomHandlers>,
    Path(room_id): Path<String>,
    ws: Option<WebSocketUpgrade>,
    method: Method,
    body: Bytes,
) -> Response {
    let room_id = match RoomId::new(room_id) {
        Ok(id) => id,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    if let Some(ws) = ws {
        let host = handlers.host.clone();
        return ws.on_upgrade(move |socket| handle_socket(socket, room_id, host));
    }

    match handlers.host.handle_request(&room_id, &method, &body).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /health
pub async fn health(State(handlers): State<RoomHandlers>) -> Response {
    let response = HealthResponse {
        status: "ok",
        rooms: handlers.host.active_rooms().await,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// Fallback for every unmatched route.
pub async fn unrecognized(uri: axum::http::Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        format!("Unrecognized request: {}", uri),
    )
        .into_response()
}

/// Room errors surface as plain-text bodies.
impl IntoResponse for RoomError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            tracing::debug!(error = %self, "Room request rejected");
        } else {
            tracing::warn!(error = %self, "Room request failed");
        }

        let (status, body) = match self {
            RoomError::MalformedRequest(_) => (StatusCode::BAD_REQUEST, INVALID_REQUEST_BODY),
            RoomError::NotPersisted(_) => (StatusCode::INTERNAL_SERVER_ERROR, NOT_PERSISTED),
            RoomError::StoreUnavailable(_) | RoomError::NotReady(_) | RoomError::Lifecycle(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, ROOM_UNAVAILABLE)
            }
        };
        (status, body).into_response()
    }
}
