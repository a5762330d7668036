//! Handler tree traversal and route derivation.
//!
//! # Responsibilities
//! - Enumerate every file below the API root
//! - Keep only files named after a handler method with the loader's extension
//! - Derive the route path and registration name for each kept file
//!
//! # Design Decisions
//! - Entries are visited in sorted name order so registration order is stable
//! - Symlinked directories are not descended (no cycles); symlinked files are kept
//! - A missing or unreadable root yields no routes rather than an error
//! - Segments are used verbatim: no case folding, no parameter syntax

use std::fs;
use std::path::{Path, PathBuf};

use crate::routing::method::HandlerMethod;

/// A file recognized as a route handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFile {
    /// Full path to the file on disk.
    pub path: PathBuf,
    /// Path relative to the API root.
    pub relative: PathBuf,
    /// Directory segments between the API root and the file.
    pub segments: Vec<String>,
    /// Method declared by the file name.
    pub method: HandlerMethod,
}

impl HandlerFile {
    /// Lookup key used by registration tables: segments plus stem, `/`-joined
    /// (`users/profile/get`, or just `get` at the root).
    pub fn key(&self) -> String {
        let mut parts: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        parts.push(self.method.stem());
        parts.join("/")
    }
}

/// A route derived from a handler file. Lives only for one discovery pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRoute {
    pub file: HandlerFile,
    pub route_path: String,
    pub name: String,
}

impl DiscoveredRoute {
    pub fn method(&self) -> HandlerMethod {
        self.file.method
    }
}

/// Route path for a directory segment sequence under `prefix`.
///
/// Handlers at the root map to the prefix alone; `/` if the prefix is empty.
pub fn route_path(prefix: &str, segments: &[String]) -> String {
    if segments.is_empty() {
        if prefix.is_empty() {
            return "/".to_string();
        }
        return prefix.to_string();
    }
    format!("{}/{}", prefix, segments.join("/"))
}

/// Registration name: segments joined with `_`, then `_` and the method stem.
pub fn registration_name(segments: &[String], method: HandlerMethod) -> String {
    format!("{}_{}", segments.join("_"), method.stem())
}

/// Walk `root` and derive a route for every handler file with `extension`.
pub fn discover(root: &Path, prefix: &str, extension: &str) -> Vec<DiscoveredRoute> {
    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "API directory not found, no routes discovered");
        return Vec::new();
    }

    let mut files = Vec::new();
    walk(root, &mut files);

    files
        .into_iter()
        .filter_map(|path| classify(root, path, extension))
        .map(|file| DiscoveredRoute {
            route_path: route_path(prefix, &file.segments),
            name: registration_name(&file.segments, file.method),
            file,
        })
        .collect()
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
            return;
        }
    };

    let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping entry with unknown type");
                continue;
            }
        };

        if file_type.is_dir() {
            walk(&path, files);
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            files.push(path);
        }
    }
}

/// Turn a file path into a `HandlerFile` if its name declares a method.
fn classify(root: &Path, path: PathBuf, extension: &str) -> Option<HandlerFile> {
    if path.extension().and_then(|e| e.to_str()) != Some(extension) {
        return None;
    }
    let method = path
        .file_stem()
        .and_then(|s| s.to_str())
        .and_then(HandlerMethod::from_stem)?;

    let relative = path.strip_prefix(root).ok()?.to_path_buf();
    let mut segments = Vec::new();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            match component.as_os_str().to_str() {
                Some(segment) => segments.push(segment.to_string()),
                None => {
                    tracing::warn!(path = %path.display(), "Skipping handler with non UTF-8 path");
                    return None;
                }
            }
        }
    }

    Some(HandlerFile {
        path,
        relative,
        segments,
        method,
    })
}
