//! Handler loading subsystem.
//!
//! # Data Flow
//! ```text
//! HandlerFile (discovered on disk)
//!     → HandlerLoader::load
//!         table.rs    (StaticLoader: compile-time registration table)
//!         manifest.rs (ManifestLoader: TOML response manifest read from disk)
//!     → EntryPoint
//! ```
//!
//! # Design Decisions
//! - Each loader claims exactly one file extension; discovery ignores the rest
//! - Loading happens once, at router construction
//! - Any load failure is fatal to construction

pub mod manifest;
pub mod table;

use std::path::PathBuf;

use crate::handler::EntryPoint;
use crate::routing::discovery::HandlerFile;

pub use manifest::ManifestLoader;
pub use table::StaticLoader;

/// Errors raised while turning a handler file into an entry point.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The handler file could not be read.
    #[error("failed to read handler {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The handler file is not valid for its loader.
    #[error("failed to parse handler {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The handler file does not expose the entry point its loader expects.
    #[error("handler {} has no `{entry}` entry point", .path.display())]
    MissingEntryPoint { path: PathBuf, entry: String },

    /// The handler file parsed but describes something unusable.
    #[error("invalid handler {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl LoadError {
    /// Path of the handler file that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Parse { path, .. }
            | LoadError::MissingEntryPoint { path, .. }
            | LoadError::Invalid { path, .. } => path,
        }
    }
}

/// Turns handler files into callable entry points.
pub trait HandlerLoader {
    /// File extension (without the dot) this loader handles.
    fn extension(&self) -> &str;

    /// Load one handler file.
    fn load(&self, file: &HandlerFile) -> Result<EntryPoint, LoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LoadError::MissingEntryPoint {
            path: PathBuf::from("api/users/get.toml"),
            entry: "response".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "handler api/users/get.toml has no `response` entry point"
        );
        assert_eq!(err.path(), std::path::Path::new("api/users/get.toml"));
    }
}
