//! File routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Discovery (at startup):
//!     api directory
//!     → discovery.rs (walk tree, keep method-named files)
//!     → method.rs (file stem → HTTP method)
//!     → DiscoveredRoute (route path, registration name)
//!
//! Registration:
//!     DiscoveredRoute
//!     → HandlerLoader (entry point)
//!     → RouteHandler adapter
//!     → host.rs (RouteHost::add_route)
//! ```
//!
//! # Design Decisions
//! - Routes are discovered once; a new router is needed to pick up new files
//! - Directory names are used literally as path segments
//! - Deterministic: same tree always registers in the same order

pub mod builder;
pub mod discovery;
pub mod host;
pub mod method;

pub use builder::{FileRouter, FileRouterBuilder, RouterError, ROUTE_LOG_TARGET};
pub use discovery::{discover, DiscoveredRoute, HandlerFile};
pub use host::{RegistrationError, RouteHost};
pub use method::HandlerMethod;
