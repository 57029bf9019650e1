//! AdmissionHook port - Interception before a room is activated.
//!
//! Two interception points run ahead of room dispatch: one for plain HTTP
//! requests and one for socket upgrades. Each either hands the request on
//! (possibly rewritten) or rejects it with a ready response.

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::Response;

/// Outcome of an admission check.
pub type Admission = Result<Request, Response>;

/// Port for pre-request and pre-connect interception.
#[async_trait]
pub trait AdmissionHook: Send + Sync {
    /// Runs before an HTTP request reaches its room.
    async fn before_request(&self, request: Request) -> Admission;

    /// Runs before a socket upgrade reaches its room.
    async fn before_connect(&self, request: Request) -> Admission;
}

/// Default hook: admits everything unmodified.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

#[async_trait]
impl AdmissionHook for PassThrough {
    async fn before_request(&self, request: Request) -> Admission {
        Ok(request)
    }

    async fn before_connect(&self, request: Request) -> Admission {
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn pass_through_admits_request_unmodified() {
        let request = Request::builder()
            .method("POST")
            .uri("/room/abc?x=1")
            .header("x-trace", "t1")
            .body(Body::empty())
            .unwrap();

        let admitted = PassThrough.before_request(request).await.unwrap();
        assert_eq!(admitted.method(), "POST");
        assert_eq!(admitted.uri(), "/room/abc?x=1");
        assert_eq!(admitted.headers()["x-trace"], "t1");
    }

    #[tokio::test]
    async fn pass_through_admits_connect() {
        let request = Request::builder()
            .uri("/room/abc")
            .body(Body::empty())
            .unwrap();

        assert!(PassThrough.before_connect(request).await.is_ok());
    }
}
