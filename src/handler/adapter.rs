//! Route adapter between the server and a loaded entry point.
//!
//! # Responsibilities
//! - Build the request context for the entry point
//! - Invoke the entry point and hand its result back unchanged
//! - Record per-route request metrics
//!
//! # Design Decisions
//! - One adapter per route, holding only its own entry point
//! - Entry point errors are returned as-is; rendering them is the server's job

use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};

use crate::handler::entry::{EntryPoint, HandlerResult};
use crate::handler::request::HandlerRequest;
use crate::observability::metrics;

/// Default cap on buffered request bodies, matching the server's body limit.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// A registered route's request handler.
#[derive(Debug, Clone)]
pub struct RouteHandler {
    name: String,
    entry: EntryPoint,
    body_limit: usize,
}

impl RouteHandler {
    pub fn new(name: impl Into<String>, entry: EntryPoint) -> Self {
        Self {
            name: name.into(),
            entry,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    /// Registration name of the route this handler serves.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Invoke the entry point with an already built request context.
    pub async fn call(&self, request: HandlerRequest) -> HandlerResult {
        self.entry.call(request).await
    }

    /// Serve one HTTP request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let method = request.method().to_string();

        let response = match HandlerRequest::from_request(request, self.body_limit).await {
            Ok(req) => self.call(req).await.into_response(),
            Err(e) => {
                tracing::debug!(route = %self.name, error = %e, "Rejected request");
                e.into_response()
            }
        };

        metrics::record_request(&self.name, &method, response.status().as_u16(), start);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::entry::HandlerError;
    use crate::handler::response::HandlerResponse;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_handle_passes_request_through() {
        let entry = EntryPoint::from_fn(|req| {
            Ok(HandlerResponse::ok(format!("{} {}", req.method(), req.path())))
        });
        let handler = RouteHandler::new("users_get", entry);

        let request = Request::builder().uri("/api/users").body(Body::empty()).unwrap();
        let response = handler.handle(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(handler.name(), "users_get");
    }

    #[tokio::test]
    async fn test_entry_error_is_not_translated() {
        let entry = EntryPoint::from_fn(|_req| -> Result<HandlerResponse, HandlerError> {
            Err(HandlerError::internal("boom"))
        });
        let handler = RouteHandler::new("boom_get", entry);

        let req = HandlerRequest::new(axum::http::Method::GET, axum::http::Uri::from_static("/"));
        let err = handler.call(req).await.unwrap_err();
        assert_eq!(err.message(), "boom");

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = handler.handle(request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let entry = EntryPoint::from_fn(|_req| Ok("unreachable"));
        let handler = RouteHandler::new("upload_post", entry).with_body_limit(4);

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .body(Body::from("too large"))
            .unwrap();
        let response = handler.handle(request).await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
