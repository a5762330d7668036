//! Response descriptors returned by handler entry points.
//!
//! # Conversion Rules
//! - `Status`: status code and body, content type inferred from the body kind
//! - `WithHeaders`: as `Status`, then each header is appended
//! - `Raw`: a framework response passed through untouched
//!
//! `(StatusCode, body)` tuples, JSON values and strings convert via `From`,
//! defaulting to `200 OK` where no status is given.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Body of a response descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Text(String),
    Json(serde_json::Value),
    Bytes(Bytes),
}

impl IntoResponse for ResponseBody {
    fn into_response(self) -> Response {
        match self {
            ResponseBody::Empty => ().into_response(),
            ResponseBody::Text(text) => text.into_response(),
            ResponseBody::Json(value) => Json(value).into_response(),
            ResponseBody::Bytes(bytes) => bytes.into_response(),
        }
    }
}

impl From<String> for ResponseBody {
    fn from(text: String) -> Self {
        ResponseBody::Text(text)
    }
}

impl From<&str> for ResponseBody {
    fn from(text: &str) -> Self {
        ResponseBody::Text(text.to_string())
    }
}

impl From<serde_json::Value> for ResponseBody {
    fn from(value: serde_json::Value) -> Self {
        ResponseBody::Json(value)
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        ResponseBody::Bytes(bytes)
    }
}

impl From<()> for ResponseBody {
    fn from(_: ()) -> Self {
        ResponseBody::Empty
    }
}

/// What a handler returns.
#[derive(Debug)]
pub enum HandlerResponse {
    Status {
        status: StatusCode,
        body: ResponseBody,
    },
    WithHeaders {
        status: StatusCode,
        body: ResponseBody,
        headers: HeaderMap,
    },
    Raw(Response),
}

impl HandlerResponse {
    pub fn new(status: StatusCode, body: impl Into<ResponseBody>) -> Self {
        HandlerResponse::Status {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<ResponseBody>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn json(status: StatusCode, value: serde_json::Value) -> Self {
        Self::new(status, ResponseBody::Json(value))
    }

    /// Attach headers, promoting a `Status` response to `WithHeaders`.
    /// Headers on a `Raw` response are appended to it directly.
    pub fn with_headers(self, extra: HeaderMap) -> Self {
        match self {
            HandlerResponse::Status { status, body } => HandlerResponse::WithHeaders {
                status,
                body,
                headers: extra,
            },
            HandlerResponse::WithHeaders {
                status,
                body,
                mut headers,
            } => {
                headers.extend(extra);
                HandlerResponse::WithHeaders {
                    status,
                    body,
                    headers,
                }
            }
            HandlerResponse::Raw(mut response) => {
                response.headers_mut().extend(extra);
                HandlerResponse::Raw(response)
            }
        }
    }

    /// Status code this descriptor will produce.
    pub fn status(&self) -> StatusCode {
        match self {
            HandlerResponse::Status { status, .. } => *status,
            HandlerResponse::WithHeaders { status, .. } => *status,
            HandlerResponse::Raw(response) => response.status(),
        }
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        match self {
            HandlerResponse::Status { status, body } => (status, body).into_response(),
            HandlerResponse::WithHeaders {
                status,
                body,
                headers,
            } => {
                let mut response = (status, body).into_response();
                for (name, value) in headers.iter() {
                    if name == header::CONTENT_TYPE {
                        response.headers_mut().insert(name.clone(), value.clone());
                    } else {
                        response.headers_mut().append(name.clone(), value.clone());
                    }
                }
                response
            }
            HandlerResponse::Raw(response) => response,
        }
    }
}

impl<B: Into<ResponseBody>> From<(StatusCode, B)> for HandlerResponse {
    fn from((status, body): (StatusCode, B)) -> Self {
        HandlerResponse::new(status, body)
    }
}

// Body-first tuples, as handlers commonly write `(body, status)`.
macro_rules! body_status_tuple {
    ($($body:ty),*) => {
        $(
            impl From<($body, StatusCode)> for HandlerResponse {
                fn from((body, status): ($body, StatusCode)) -> Self {
                    HandlerResponse::new(status, body)
                }
            }
        )*
    };
}

body_status_tuple!(serde_json::Value, String, &str, Bytes);

impl From<serde_json::Value> for HandlerResponse {
    fn from(value: serde_json::Value) -> Self {
        HandlerResponse::ok(value)
    }
}

impl From<String> for HandlerResponse {
    fn from(text: String) -> Self {
        HandlerResponse::ok(text)
    }
}

impl From<&str> for HandlerResponse {
    fn from(text: &str) -> Self {
        HandlerResponse::ok(text)
    }
}

impl From<Response> for HandlerResponse {
    fn from(response: Response) -> Self {
        HandlerResponse::Raw(response)
    }
}

/// Parse a header pair for a response descriptor.
pub(crate) fn header_pair(
    name: &str,
    value: &str,
) -> Result<(header::HeaderName, HeaderValue), String> {
    let name = header::HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| format!("invalid header name {name:?}: {e}"))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| format!("invalid value for header {name}: {e}"))?;
    Ok((name, value))
}
