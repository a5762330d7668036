//! TOML response manifests.
//!
//! A manifest handler file describes the response it serves:
//!
//! ```toml
//! [response]
//! status = 200
//! json = { status = "success", greeting = "Hello, {query.name}!" }
//!
//! [response.headers]
//! cache-control = "no-store"
//! ```
//!
//! `body` (text) and `json` are mutually exclusive. String values may use
//! `{query.<key>}`, `{path}` and `{method}` placeholders, filled from the
//! request at call time; a missing query parameter renders as an empty
//! string and unknown placeholders are left as written.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use serde::Deserialize;

use crate::handler::response::header_pair;
use crate::handler::{EntryPoint, HandlerRequest, HandlerResponse, ResponseBody};
use crate::loader::{HandlerLoader, LoadError};
use crate::routing::discovery::HandlerFile;

/// Table a manifest must define to be servable.
pub const ENTRY_TABLE: &str = "response";

/// Loader for `.toml` response manifests.
#[derive(Debug, Clone, Default)]
pub struct ManifestLoader;

impl ManifestLoader {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Deserialize)]
struct Manifest {
    response: Option<ResponseTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResponseTable {
    #[serde(default = "default_status")]
    status: u16,
    body: Option<String>,
    json: Option<serde_json::Value>,
    content_type: Option<String>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

fn default_status() -> u16 {
    200
}

#[derive(Debug)]
enum BodyTemplate {
    Empty,
    Text(String),
    Json(serde_json::Value),
}

/// A validated manifest, ready to render per request.
#[derive(Debug)]
struct CompiledResponse {
    status: StatusCode,
    body: BodyTemplate,
    headers: HeaderMap,
}

impl CompiledResponse {
    fn render(&self, req: &HandlerRequest) -> HandlerResponse {
        let body = match &self.body {
            BodyTemplate::Empty => ResponseBody::Empty,
            BodyTemplate::Text(template) => ResponseBody::Text(render(template, req)),
            BodyTemplate::Json(value) => ResponseBody::Json(render_json(value, req)),
        };

        let response = HandlerResponse::new(self.status, body);
        if self.headers.is_empty() {
            response
        } else {
            response.with_headers(self.headers.clone())
        }
    }
}

impl HandlerLoader for ManifestLoader {
    fn extension(&self) -> &str {
        "toml"
    }

    fn load(&self, file: &HandlerFile) -> Result<EntryPoint, LoadError> {
        let content = fs::read_to_string(&file.path).map_err(|source| LoadError::Io {
            path: file.path.clone(),
            source,
        })?;
        let compiled = Arc::new(compile(&file.path, &content)?);

        Ok(EntryPoint::from_fn(move |req| Ok(compiled.render(req))))
    }
}

fn compile(path: &Path, content: &str) -> Result<CompiledResponse, LoadError> {
    let manifest: Manifest = toml::from_str(content).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let table = manifest.response.ok_or_else(|| LoadError::MissingEntryPoint {
        path: path.to_path_buf(),
        entry: ENTRY_TABLE.to_string(),
    })?;

    let invalid = |reason: String| LoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    };

    let status = StatusCode::from_u16(table.status)
        .map_err(|_| invalid(format!("status {} is not a valid HTTP status", table.status)))?;

    let body = match (table.body, table.json) {
        (Some(_), Some(_)) => {
            return Err(invalid("`body` and `json` are mutually exclusive".to_string()));
        }
        (Some(text), None) => BodyTemplate::Text(text),
        (None, Some(value)) => BodyTemplate::Json(value),
        (None, None) => BodyTemplate::Empty,
    };

    let mut headers = HeaderMap::new();
    for (name, value) in &table.headers {
        let (name, value) = header_pair(name, value).map_err(invalid)?;
        headers.append(name, value);
    }
    if let Some(content_type) = table.content_type {
        let value = HeaderValue::from_str(&content_type)
            .map_err(|e| invalid(format!("invalid content_type {content_type:?}: {e}")))?;
        headers.insert(header::CONTENT_TYPE, value);
    }

    Ok(CompiledResponse {
        status,
        body,
        headers,
    })
}

/// Fill `{...}` placeholders in `template` from the request.
fn render(template: &str, req: &HandlerRequest) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let token = &after[..end];
        match resolve(token, req) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('{');
                out.push_str(token);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn resolve(token: &str, req: &HandlerRequest) -> Option<String> {
    if let Some(key) = token.strip_prefix("query.") {
        return Some(req.query(key).unwrap_or_default().to_string());
    }
    match token {
        "path" => Some(req.path().to_string()),
        "method" => Some(req.method().to_string()),
        _ => None,
    }
}

// Only string leaves are rendered; keys stay literal.
fn render_json(value: &serde_json::Value, req: &HandlerRequest) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::String(s) => Value::String(render(s, req)),
        Value::Array(items) => Value::Array(items.iter().map(|v| render_json(v, req)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), render_json(v, req)))
                .collect(),
        ),
        other => other.clone(),
    }
}
