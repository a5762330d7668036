//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Pick pretty or JSON output from configuration
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - Route debugging turns on the route target at `info` whatever the level
//! - Library code only emits events; installing a subscriber is the binary's call

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::routing::ROUTE_LOG_TARGET;

/// Default filter directives for a configured level.
pub fn default_directives(level: &str) -> String {
    format!("flext={level},tower_http={level}")
}

/// Filter for the subscriber: `RUST_LOG` or the configured level, plus the
/// route target when `route_debug` is set.
pub fn build_filter(config: &ObservabilityConfig, route_debug: bool) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(&config.log_level).into());

    if !route_debug {
        return filter;
    }
    match format!("{ROUTE_LOG_TARGET}=info").parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(
    config: &ObservabilityConfig,
    route_debug: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = build_filter(config, route_debug);

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    }
}
