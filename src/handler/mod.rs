//! Handler contract subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (axum)
//!     → adapter.rs (RouteHandler: buffer body, build context)
//!     → request.rs (HandlerRequest: method, path, query, headers, body)
//!     → entry.rs (EntryPoint: the loaded handler's callable)
//!     → response.rs (HandlerResponse → axum Response)
//! ```
//!
//! # Design Decisions
//! - Entry points are `Arc`-shared and immutable once loaded
//! - The adapter never captures path parameters
//! - Handler errors reach the server untranslated

pub mod adapter;
pub mod entry;
pub mod request;
pub mod response;

pub use adapter::RouteHandler;
pub use entry::{EntryPoint, HandlerError, HandlerResult};
pub use request::{HandlerRequest, RequestError};
pub use response::{HandlerResponse, ResponseBody};
