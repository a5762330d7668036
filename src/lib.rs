//! Convention-based HTTP route loader.
//!
//! Handler files laid out under an API directory become routes: the
//! directories give the path, the file name gives the method.
//!
//! ```text
//! api/
//! ├── get.toml              → GET    /api
//! └── users/
//!     ├── get.toml          → GET    /api/users
//!     ├── post.toml         → POST   /api/users
//!     └── helpers.toml      (ignored)
//! ```

pub mod config;
pub mod handler;
pub mod http;
pub mod loader;
pub mod observability;
pub mod routing;

pub use config::{AppConfig, RouterConfig};
pub use handler::{EntryPoint, HandlerError, HandlerRequest, HandlerResponse};
pub use http::AppServer;
pub use loader::{HandlerLoader, ManifestLoader, StaticLoader};
pub use routing::{FileRouter, HandlerMethod, RouteHost, RouterError};
