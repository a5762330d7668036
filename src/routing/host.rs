//! Host server capability.
//!
//! The router never owns the server it registers on; anything that can
//! accept a named route for a path and method set can host file routes.

use std::path::Path;

use crate::handler::RouteHandler;
use crate::routing::method::HandlerMethod;

/// Rejections a host may return for a registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Another route already uses this registration name.
    #[error("route name `{name}` is already registered")]
    DuplicateName { name: String },

    /// The path already has a handler for this method.
    #[error("{method} {path} is already registered")]
    DuplicateEndpoint { path: String, method: HandlerMethod },

    /// The host cannot serve this path.
    #[error("invalid route path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },
}

/// A server that file routes can be registered on.
pub trait RouteHost {
    /// Directory the API root is resolved against.
    fn root_path(&self) -> &Path;

    /// Register `handler` under `path` for `methods`, identified by `name`.
    fn add_route(
        &mut self,
        path: &str,
        name: &str,
        handler: RouteHandler,
        methods: &[HandlerMethod],
    ) -> Result<(), RegistrationError>;

    /// Cap on buffered request bodies handed to adapters.
    fn body_limit(&self) -> usize {
        crate::handler::adapter::DEFAULT_BODY_LIMIT
    }
}

impl<H: RouteHost + ?Sized> RouteHost for &mut H {
    fn root_path(&self) -> &Path {
        (**self).root_path()
    }

    fn add_route(
        &mut self,
        path: &str,
        name: &str,
        handler: RouteHandler,
        methods: &[HandlerMethod],
    ) -> Result<(), RegistrationError> {
        (**self).add_route(path, name, handler, methods)
    }

    fn body_limit(&self) -> usize {
        (**self).body_limit()
    }
}
