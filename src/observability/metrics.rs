//! Metrics collection and exposition.
//!
//! # Metrics
//! - `flext_routes_registered_total` (counter): routes registered, by method
//! - `flext_requests_total` (counter): handled requests by route, method, status
//! - `flext_request_duration_seconds` (histogram): handler latency by route
//!
//! Recording is a no-op until an exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::method::HandlerMethod;

/// Install the Prometheus exporter, serving scrapes on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_route_registered(method: HandlerMethod) {
    counter!("flext_routes_registered_total", "method" => method.as_str()).increment(1);
}

pub fn record_request(route: &str, method: &str, status: u16, start: Instant) {
    counter!(
        "flext_requests_total",
        "route" => route.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("flext_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}
