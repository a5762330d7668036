//! Request context handed to handler entry points.
//!
//! # Design Decisions
//! - The body is buffered up front so entry points stay plain async functions
//! - Query parameters keep their order and repeats
//! - Path parameters are always empty: routes are literal

use std::collections::HashMap;
use std::error::Error as StdError;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::Query;
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;

use crate::http::request_id::X_REQUEST_ID;

/// Failure to build a `HandlerRequest` from an incoming request.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("failed to read request body: {0}")]
    Body(String),

    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("malformed query string: {0}")]
    Query(String),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = match self {
            RequestError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RequestError::Body(_) | RequestError::Query(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

/// The request as seen by a handler entry point.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    path_params: HashMap<String, String>,
    body: Bytes,
}

impl HandlerRequest {
    /// Build a request context, buffering at most `body_limit` bytes of body.
    pub async fn from_request(request: Request<Body>, body_limit: usize) -> Result<Self, RequestError> {
        let (parts, body) = request.into_parts();

        let query = match parts.uri.query() {
            Some(_) => {
                Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
                    .map_err(|e| RequestError::Query(e.body_text()))?
                    .0
            }
            None => Vec::new(),
        };

        let body = to_bytes(body, body_limit).await.map_err(|e| {
            if exceeds_limit(&e) {
                RequestError::TooLarge { limit: body_limit }
            } else {
                RequestError::Body(e.to_string())
            }
        })?;

        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            query,
            path_params: HashMap::new(),
            body,
        })
    }

    /// Build a request context directly, for calling entry points outside a server.
    pub fn new(method: Method, uri: Uri) -> Self {
        let query = Query::<Vec<(String, String)>>::try_from_uri(&uri)
            .map(|q| q.0)
            .unwrap_or_default();
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            query,
            path_params: HashMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// First value of a query parameter.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a repeated query parameter, in order.
    pub fn query_all(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Captured path parameters. File routes are literal, so this is always empty.
    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text, lossily decoded.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Correlation ID assigned by the server's request ID layer.
    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }
}

// The limit error may arrive wrapped by the server's own body limit layer.
fn exceeds_limit(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
