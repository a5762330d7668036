//! Compile-time registration table.
//!
//! Handler files are source files compiled into the binary; the table maps
//! each file's key (`users/profile/get`) to the entry point built from it.
//! Discovery still decides which routes exist: a table entry with no file on
//! disk is never registered, and a file with no table entry fails to load.

use std::collections::HashMap;

use crate::handler::EntryPoint;
use crate::loader::{HandlerLoader, LoadError};
use crate::routing::discovery::HandlerFile;

/// Extension claimed by `StaticLoader` unless overridden.
pub const DEFAULT_EXTENSION: &str = "rs";

/// Loader backed by an in-memory table of entry points.
#[derive(Debug, Clone)]
pub struct StaticLoader {
    extension: String,
    entries: HashMap<String, EntryPoint>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::with_extension(DEFAULT_EXTENSION)
    }

    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            entries: HashMap::new(),
        }
    }

    /// Add an entry, builder style.
    pub fn register(mut self, key: &str, entry: EntryPoint) -> Self {
        self.insert(key, entry);
        self
    }

    /// Add an entry. `key` may carry a leading `/` or the file extension.
    pub fn insert(&mut self, key: &str, entry: EntryPoint) -> Option<EntryPoint> {
        let key = self.normalize(key);
        self.entries.insert(key, entry)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&self.normalize(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize(&self, key: &str) -> String {
        let key = key.trim_matches('/');
        let suffix = format!(".{}", self.extension);
        key.strip_suffix(suffix.as_str()).unwrap_or(key).to_string()
    }
}

impl Default for StaticLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerLoader for StaticLoader {
    fn extension(&self) -> &str {
        &self.extension
    }

    fn load(&self, file: &HandlerFile) -> Result<EntryPoint, LoadError> {
        let key = file.key();
        self.entries
            .get(&key)
            .cloned()
            .ok_or_else(|| LoadError::MissingEntryPoint {
                path: file.path.clone(),
                entry: key,
            })
    }
}

/// Build a `StaticLoader` from `key => entry point` pairs.
///
/// ```ignore
/// let loader = flext::handlers! {
///     "hello/get" => EntryPoint::from_fn(hello::main),
///     "users/post" => EntryPoint::new(users::create),
/// };
/// ```
#[macro_export]
macro_rules! handlers {
    ($($key:expr => $entry:expr),* $(,)?) => {{
        let loader = $crate::loader::StaticLoader::new();
        $(let loader = loader.register($key, $entry);)*
        loader
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::method::HandlerMethod;
    use std::path::PathBuf;

    fn file(segments: &[&str], method: HandlerMethod) -> HandlerFile {
        let segments: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
        let mut relative = PathBuf::from(segments.join("/"));
        relative.push(format!("{}.rs", method.stem()));
        HandlerFile {
            path: PathBuf::from("api").join(&relative),
            relative,
            segments,
            method,
        }
    }

    #[test]
    fn test_key_normalization() {
        let loader = StaticLoader::new()
            .register("/users/get.rs", EntryPoint::from_fn(|_| Ok("a")))
            .register("get", EntryPoint::from_fn(|_| Ok("b")));

        assert!(loader.contains("users/get"));
        assert!(loader.contains("get.rs"));
        assert_eq!(loader.len(), 2);
    }

    #[test]
    fn test_load_hits_and_misses() {
        let loader = crate::handlers! {
            "users/get" => EntryPoint::from_fn(|_| Ok("users")),
        };

        assert!(loader.load(&file(&["users"], HandlerMethod::Get)).is_ok());

        let err = loader
            .load(&file(&["users"], HandlerMethod::Post))
            .unwrap_err();
        match err {
            LoadError::MissingEntryPoint { entry, .. } => assert_eq!(entry, "users/post"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_extension() {
        let loader = StaticLoader::with_extension("handler");
        assert_eq!(loader.extension(), "handler");
        assert!(loader.is_empty());
    }
}
