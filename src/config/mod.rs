//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → RouterConfig handed to FileRouter, the rest to AppServer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; handler trees are scanned once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, LimitsConfig, LogFormat, ObservabilityConfig, RouterConfig, ServerConfig};
pub use validation::{validate_config, ValidationError};
