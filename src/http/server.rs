//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Accept file route registrations (`RouteHost`)
//! - Reject duplicate names and duplicate (path, method) pairs
//! - Build the Axum Router with middleware (request ID, tracing, limits)
//! - Bind server to listener and serve until shutdown
//!
//! # Design Decisions
//! - Registered paths are literal: each segment is matched in the
//!   percent-encoded form clients send, and the legacy `:`/`*` checks are
//!   off, so no segment is read as a capture
//! - `Endpoint.path` keeps the path as derived; only the router sees the
//!   encoded form
//! - One `MethodRouter` per path; sibling method files share it

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::extract::Request;
use axum::routing::MethodRouter;
use axum::Router;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, LimitsConfig};
use crate::handler::RouteHandler;
use crate::http::request_id::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::routing::host::{RegistrationError, RouteHost};
use crate::routing::method::HandlerMethod;

/// Bytes clients percent-encode inside a path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// A route registered on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub method: HandlerMethod,
    pub name: String,
}

/// Axum-backed host for file routes.
pub struct AppServer {
    root_path: PathBuf,
    limits: LimitsConfig,
    routes: BTreeMap<String, MethodRouter>,
    names: HashSet<String>,
    endpoints: Vec<Endpoint>,
}

impl AppServer {
    /// Create an empty server rooted at `root_path`.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
            limits: LimitsConfig::default(),
            routes: BTreeMap::new(),
            names: HashSet::new(),
            endpoints: Vec::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.server.root_path.clone()).with_limits(config.limits.clone())
    }

    pub fn with_limits(mut self, limits: LimitsConfig) -> Self {
        self.limits = limits;
        self
    }

    /// Endpoints in registration order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn has_endpoint(&self, path: &str, method: HandlerMethod) -> bool {
        self.endpoints
            .iter()
            .any(|e| e.path == path && e.method == method)
    }

    pub fn has_route_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Build the Axum Router with all middleware layers.
    #[allow(deprecated)]
    pub fn into_router(self) -> Router {
        let mut router = Router::new().without_v07_checks();
        for (path, method_router) in self.routes {
            router = router.route(&path, method_router);
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(RequestBodyLimitLayer::new(self.limits.max_body_size))
                .layer(TimeoutLayer::new(Duration::from_secs(self.limits.request_timeout_secs))),
        )
    }

    /// Serve until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, listener: TcpListener, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoints = self.endpoints.len(),
            "HTTP server starting"
        );

        let app = self.into_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

impl fmt::Debug for AppServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppServer")
            .field("root_path", &self.root_path)
            .field("limits", &self.limits)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl RouteHost for AppServer {
    fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn add_route(
        &mut self,
        path: &str,
        name: &str,
        handler: RouteHandler,
        methods: &[HandlerMethod],
    ) -> Result<(), RegistrationError> {
        if !path.starts_with('/') {
            return Err(RegistrationError::InvalidPath {
                path: path.to_string(),
                reason: "paths must start with '/'".to_string(),
            });
        }
        if self.names.contains(name) {
            return Err(RegistrationError::DuplicateName {
                name: name.to_string(),
            });
        }
        let wire = wire_path(path);
        let mut seen = HashSet::new();
        for method in methods {
            let taken = self
                .endpoints
                .iter()
                .any(|e| e.method == *method && wire_path(&e.path) == wire);
            if !seen.insert(*method) || taken {
                return Err(RegistrationError::DuplicateEndpoint {
                    path: path.to_string(),
                    method: *method,
                });
            }
        }

        let mut method_router = self.routes.remove(&wire).unwrap_or_else(MethodRouter::new);
        for method in methods {
            let handler = handler.clone();
            method_router = method_router.on(method.filter(), move |request: Request| {
                let handler = handler.clone();
                async move { handler.handle(request).await }
            });
            self.endpoints.push(Endpoint {
                path: path.to_string(),
                method: *method,
                name: name.to_string(),
            });
        }
        self.routes.insert(wire, method_router);
        self.names.insert(name.to_string());

        tracing::debug!(path = %path, name = %name, "Route added");
        Ok(())
    }

    fn body_limit(&self) -> usize {
        self.limits.max_body_size
    }
}

/// A route path as it appears in request URIs: every segment
/// percent-encoded, `/` separators kept.
fn wire_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{EntryPoint, HandlerResponse};
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn echo(name: &str) -> RouteHandler {
        let label = name.to_string();
        RouteHandler::new(
            name,
            EntryPoint::from_fn(move |req| {
                Ok(HandlerResponse::ok(format!("{} {} {}", label, req.method(), req.path())))
            }),
        )
    }

    async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_sibling_methods_share_path() {
        let mut server = AppServer::new(".");
        server
            .add_route("/api/users", "users_get", echo("users_get"), &[HandlerMethod::Get])
            .unwrap();
        server
            .add_route("/api/users", "users_post", echo("users_post"), &[HandlerMethod::Post])
            .unwrap();
        assert_eq!(server.endpoints().len(), 2);

        let router = server.into_router();
        assert_eq!(
            send(router.clone(), "GET", "/api/users").await,
            (StatusCode::OK, "users_get GET /api/users".to_string())
        );
        assert_eq!(
            send(router.clone(), "POST", "/api/users").await,
            (StatusCode::OK, "users_post POST /api/users".to_string())
        );
        assert_eq!(
            send(router.clone(), "DELETE", "/api/users").await.0,
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(send(router, "GET", "/api/nope").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_duplicates_and_bad_paths() {
        let mut server = AppServer::new(".");
        server
            .add_route("/api", "_get", echo("_get"), &[HandlerMethod::Get])
            .unwrap();

        let name = server.add_route("/api/other", "_get", echo("_get"), &[HandlerMethod::Get]);
        assert_eq!(
            name,
            Err(RegistrationError::DuplicateName {
                name: "_get".to_string()
            })
        );

        let endpoint = server.add_route("/api", "root_get", echo("root_get"), &[HandlerMethod::Get]);
        assert!(matches!(endpoint, Err(RegistrationError::DuplicateEndpoint { .. })));

        let twice = server.add_route(
            "/api/x",
            "x",
            echo("x"),
            &[HandlerMethod::Put, HandlerMethod::Put],
        );
        assert!(matches!(twice, Err(RegistrationError::DuplicateEndpoint { .. })));

        let relative = server.add_route("api", "rel_get", echo("rel_get"), &[HandlerMethod::Get]);
        assert!(matches!(relative, Err(RegistrationError::InvalidPath { .. })));

        assert_eq!(server.endpoints().len(), 1);
        assert!(server.has_route_name("_get"));
        assert!(!server.has_route_name("root_get"));
    }

    #[tokio::test]
    async fn test_segments_are_literal() {
        let mut server = AppServer::new(".");
        server
            .add_route("/api/users/:id", "users_:id_get", echo("colon"), &[HandlerMethod::Get])
            .unwrap();
        server
            .add_route("/api/users/{id}", "users_{id}_get", echo("brace"), &[HandlerMethod::Get])
            .unwrap();

        server
            .add_route("/api/users/<id>", "users_<id>_get", echo("angle"), &[HandlerMethod::Get])
            .unwrap();
        server
            .add_route("/api/café", "café_get", echo("accent"), &[HandlerMethod::Get])
            .unwrap();

        let router = server.into_router();
        assert_eq!(
            send(router.clone(), "GET", "/api/users/:id").await,
            (StatusCode::OK, "colon GET /api/users/:id".to_string())
        );
        assert_eq!(
            send(router.clone(), "GET", "/api/users/%7Bid%7D").await,
            (StatusCode::OK, "brace GET /api/users/%7Bid%7D".to_string())
        );
        assert_eq!(send(router.clone(), "GET", "/api/users/%3Cid%3E").await.0, StatusCode::OK);
        assert_eq!(send(router.clone(), "GET", "/api/caf%C3%A9").await.0, StatusCode::OK);
        assert_eq!(send(router, "GET", "/api/users/42").await.0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_wire_path_encoding() {
        assert_eq!(wire_path("/api/users"), "/api/users");
        assert_eq!(wire_path("/api/users/<id>"), "/api/users/%3Cid%3E");
        assert_eq!(wire_path("/api/users/{slug}"), "/api/users/%7Bslug%7D");
        assert_eq!(wire_path("/api/hello world"), "/api/hello%20world");
        assert_eq!(wire_path("/api/café"), "/api/caf%C3%A9");
        assert_eq!(wire_path("/api/users/[id]"), "/api/users/[id]");
        assert_eq!(wire_path("/"), "/");
    }

    #[test]
    fn test_same_wire_path_is_a_duplicate() {
        let mut server = AppServer::new(".");
        server
            .add_route("/api/<id>", "<id>_get", echo("decoded"), &[HandlerMethod::Get])
            .unwrap();

        let clash = server.add_route("/api/%3Cid%3E", "%3Cid%3E_get", echo("encoded"), &[HandlerMethod::Get]);
        assert!(matches!(clash, Err(RegistrationError::DuplicateEndpoint { .. })));

        server
            .add_route("/api/%3Cid%3E", "%3Cid%3E_post", echo("encoded"), &[HandlerMethod::Post])
            .unwrap();
        assert_eq!(server.endpoints().len(), 2);
        let _ = server.into_router();
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let mut server = AppServer::new(".");
        server
            .add_route("/api", "_get", echo("_get"), &[HandlerMethod::Get])
            .unwrap();

        let router = server.into_router();
        let request = Request::builder()
            .uri("/api")
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "abc-123");

        let request = Request::builder().uri("/api").body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }

    #[tokio::test]
    async fn test_body_limit_from_config() {
        let mut config = AppConfig::default();
        config.limits.max_body_size = 16;
        let mut server = AppServer::from_config(&config);
        assert_eq!(server.body_limit(), 16);

        server
            .add_route("/api/upload", "upload_post", echo("upload"), &[HandlerMethod::Post])
            .unwrap();
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header("content-length", "64")
            .body(Body::from(vec![b'x'; 64]))
            .unwrap();
        let response = server.into_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_body_limit_without_content_length() {
        let mut config = AppConfig::default();
        config.limits.max_body_size = 16;
        let mut server = AppServer::from_config(&config);
        server
            .add_route("/api/upload", "upload_post", echo("upload"), &[HandlerMethod::Post])
            .unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .body(Body::from(vec![b'x'; 64]))
            .unwrap();
        assert!(request.headers().get("content-length").is_none());

        let response = server.into_router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
