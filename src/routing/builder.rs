//! File route builder.
//!
//! # Responsibilities
//! - Resolve the API root against the host's root path
//! - Run discovery once and load every handler file
//! - Wrap each entry point in a `RouteHandler` and register it on the host
//!
//! # Design Decisions
//! - All work happens inside construction; a built router is inert
//! - The first load or registration failure aborts construction
//! - Already registered routes are not rolled back on failure
//! - `debug` only adds log lines on the `flext::routes` target, it never
//!   changes what gets registered

use std::path::PathBuf;

use crate::config::RouterConfig;
use crate::handler::RouteHandler;
use crate::loader::{HandlerLoader, LoadError};
use crate::observability::metrics;
use crate::routing::discovery::{discover, DiscoveredRoute};
use crate::routing::host::{RegistrationError, RouteHost};
use crate::routing::method::HandlerMethod;

/// Target of the per-route lines logged when `debug` is set.
pub const ROUTE_LOG_TARGET: &str = "flext::routes";

/// Fatal errors raised while building file routes.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to register {method} {path}: {source}")]
    Registration {
        path: String,
        method: HandlerMethod,
        #[source]
        source: RegistrationError,
    },
}

/// Registers a directory tree of handler files as routes on a host server.
#[derive(Debug)]
pub struct FileRouter<H> {
    server: H,
    config: RouterConfig,
    route_count: usize,
}

impl<H: RouteHost> FileRouter<H> {
    /// Discover, load and register every handler under `config.api_dir`.
    pub fn new<L>(server: H, config: RouterConfig, loader: &L) -> Result<Self, RouterError>
    where
        L: HandlerLoader + ?Sized,
    {
        let mut router = Self {
            server,
            config,
            route_count: 0,
        };
        router.register_routes(loader)?;
        Ok(router)
    }

    /// Build with the default `api` directory, `/api` prefix and debug off.
    pub fn with_defaults<L>(server: H, loader: &L) -> Result<Self, RouterError>
    where
        L: HandlerLoader + ?Sized,
    {
        Self::new(server, RouterConfig::default(), loader)
    }

    pub fn builder(server: H) -> FileRouterBuilder<H> {
        FileRouterBuilder {
            server,
            config: RouterConfig::default(),
        }
    }

    /// Directory handlers are discovered in.
    pub fn api_root(&self) -> PathBuf {
        self.server.root_path().join(&self.config.api_dir)
    }

    fn register_routes<L>(&mut self, loader: &L) -> Result<(), RouterError>
    where
        L: HandlerLoader + ?Sized,
    {
        let root = self.api_root();
        tracing::debug!(
            root = %root.display(),
            prefix = %self.config.prefix,
            extension = %loader.extension(),
            "Discovering file routes"
        );

        for route in discover(&root, &self.config.prefix, loader.extension()) {
            self.register(route, loader)?;
        }

        tracing::info!(
            root = %root.display(),
            routes = self.route_count,
            "File routes registered"
        );
        Ok(())
    }

    fn register<L>(&mut self, route: DiscoveredRoute, loader: &L) -> Result<(), RouterError>
    where
        L: HandlerLoader + ?Sized,
    {
        let method = route.method();
        if self.config.debug {
            tracing::info!(
                target: ROUTE_LOG_TARGET,
                path = %route.route_path,
                method = %method,
                "Registering route"
            );
        }

        let entry = loader.load(&route.file)?;
        let handler = RouteHandler::new(&route.name, entry).with_body_limit(self.server.body_limit());

        self.server
            .add_route(&route.route_path, &route.name, handler, &[method])
            .map_err(|source| RouterError::Registration {
                path: route.route_path.clone(),
                method,
                source,
            })?;

        metrics::record_route_registered(method);
        self.route_count += 1;
        Ok(())
    }

    /// The host server, unchanged apart from the added routes.
    pub fn server(&self) -> &H {
        &self.server
    }

    pub fn server_mut(&mut self) -> &mut H {
        &mut self.server
    }

    pub fn into_server(self) -> H {
        self.server
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Number of routes this router registered.
    pub fn route_count(&self) -> usize {
        self.route_count
    }
}

/// Fluent construction for `FileRouter`.
#[derive(Debug)]
pub struct FileRouterBuilder<H> {
    server: H,
    config: RouterConfig,
}

impl<H: RouteHost> FileRouterBuilder<H> {
    pub fn api_dir(mut self, api_dir: impl Into<PathBuf>) -> Self {
        self.config.api_dir = api_dir.into();
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build<L>(self, loader: &L) -> Result<FileRouter<H>, RouterError>
    where
        L: HandlerLoader + ?Sized,
    {
        FileRouter::new(self.server, self.config, loader)
    }
}
