//! Admission middleware for axum.
//!
//! Routes every room request through the configured `AdmissionHook` before
//! it can activate a room. Socket upgrades go to `before_connect`, all
//! other requests to `before_request`.
//!
//! # Example
//!
//! ```ignore
//! let hook: Arc<dyn AdmissionHook> = Arc::new(PassThrough);
//!
//! let app = Router::new()
//!     .route("/room/:room_id", any(handler))
//!     .route_layer(middleware::from_fn_with_state(hook, admission_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
};

use crate::ports::AdmissionHook;

/// Admission middleware state.
pub type AdmissionState = Arc<dyn AdmissionHook>;

pub async fn admission_middleware(
    State(hook): State<AdmissionState>,
    request: Request,
    next: Next,
) -> Response {
    let admitted = if is_upgrade(&request) {
        hook.before_connect(request).await
    } else {
        hook.before_request(request).await
    };

    match admitted {
        Ok(request) => next.run(request).await,
        Err(rejection) => {
            tracing::debug!(status = %rejection.status(), "Request rejected at admission");
            rejection
        }
    }
}

/// True for requests that will be upgraded to a WebSocket: a GET carrying
/// `Upgrade: websocket` and a `Sec-WebSocket-Key`.
fn is_upgrade(request: &Request) -> bool {
    let headers = request.headers();
    request.method() == Method::GET
        && headers.contains_key(header::SEC_WEBSOCKET_KEY)
        && headers
            .get(header::UPGRADE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.eq_ignore_ascii_case("websocket"))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn upgrade_request(method: &str) -> Request {
        Request::builder()
            .method(method)
            .uri("/room/abc")
            .header(header::CONNECTION, "upgrade")
            .header(header::UPGRADE, "WebSocket")
            .header(header::SEC_WEBSOCKET_VERSION, "13")
            .header(header::SEC_WEBSOCKET_KEY, "dGhlIHNhbXBsZSBub25jZQ==")
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn detects_websocket_upgrade() {
        assert!(is_upgrade(&upgrade_request("GET")));
    }

    #[test]
    fn plain_request_is_not_upgrade() {
        let request = Request::builder()
            .uri("/room/abc")
            .body(Body::empty())
            .unwrap();
        assert!(!is_upgrade(&request));
    }

    #[test]
    fn post_with_upgrade_header_is_not_upgrade() {
        assert!(!is_upgrade(&upgrade_request("POST")));
    }

    #[test]
    fn upgrade_header_without_key_is_not_upgrade() {
        let request = Request::builder()
            .uri("/room/abc")
            .header(header::UPGRADE, "websocket")
            .body(Body::empty())
            .unwrap();
        assert!(!is_upgrade(&request));
    }
}
