//! Handler entry points.
//!
//! An entry point is the single callable a handler file exposes: it takes the
//! request context and produces a response descriptor or an error.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::handler::request::HandlerRequest;
use crate::handler::response::HandlerResponse;

/// Outcome of invoking an entry point.
pub type HandlerResult = Result<HandlerResponse, HandlerError>;

type EntryFn = dyn Fn(HandlerRequest) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A loaded handler's callable. Cheap to clone; clones share the same function.
#[derive(Clone)]
pub struct EntryPoint {
    inner: Arc<EntryFn>,
}

impl EntryPoint {
    /// Wrap an async function as an entry point.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(HandlerRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |req| f(req).boxed()),
        }
    }

    /// Wrap a synchronous function as an entry point.
    pub fn from_fn<F, R>(f: F) -> Self
    where
        F: Fn(&HandlerRequest) -> Result<R, HandlerError> + Send + Sync + 'static,
        R: Into<HandlerResponse>,
    {
        Self::new(move |req| {
            let result = f(&req).map(Into::into);
            async move { result }
        })
    }

    pub async fn call(&self, request: HandlerRequest) -> HandlerResult {
        (self.inner)(request).await
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint").finish_non_exhaustive()
    }
}

/// Error raised by a handler. Rendered by the server as a JSON error body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    status: StatusCode,
    message: String,
}

impl HandlerError {
    /// A `500 Internal Server Error` with `message`.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        tracing::error!(status = %self.status, error = %self.message, "Handler failed");
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        HandlerError::with_status(StatusCode::BAD_REQUEST, format!("invalid JSON body: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Uri};

    #[tokio::test]
    async fn test_async_entry_point() {
        let entry = EntryPoint::new(|req: HandlerRequest| async move {
            let name = req.query("name").unwrap_or("world").to_string();
            Ok::<_, HandlerError>(HandlerResponse::ok(format!("Hello, {name}!")))
        });

        let req = HandlerRequest::new(Method::GET, Uri::from_static("/api/hello?name=ada"));
        let response = entry.call(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sync_entry_point_error() {
        let entry = EntryPoint::from_fn(|_req| -> Result<HandlerResponse, HandlerError> {
            Err(HandlerError::with_status(StatusCode::CONFLICT, "taken"))
        });

        let req = HandlerRequest::new(Method::POST, Uri::from_static("/api/users"));
        let err = entry.call(req).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "taken");
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_clones_share_function() {
        let entry = EntryPoint::from_fn(|_req| Ok("same"));
        let copy = entry.clone();
        let req = HandlerRequest::new(Method::GET, Uri::from_static("/"));
        assert!(copy.call(req).await.is_ok());
    }
}
