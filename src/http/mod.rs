//! HTTP host subsystem.
//!
//! # Data Flow
//! ```text
//! FileRouter registrations
//!     → server.rs (AppServer: route table, duplicate checks)
//!     → into_router (Axum Router + middleware)
//!
//! TCP connection
//!     → request_id.rs (assign / propagate x-request-id)
//!     → trace, body limit, timeout layers
//!     → MethodRouter for the path
//!     → RouteHandler (handler subsystem)
//! ```

pub mod request_id;
pub mod server;

pub use request_id::X_REQUEST_ID;
pub use server::{AppServer, Endpoint};
