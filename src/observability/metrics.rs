//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by route, status
//! - `proxy_request_duration_seconds` (histogram): latency by route
//! - `proxy_upstream_failures_total` (counter): failed fetches by route, kind
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed inbound request.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "proxy_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("proxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream fetch that did not produce a relayable body.
pub fn record_upstream_failure(route: &'static str, kind: &'static str) {
    ::metrics::counter!(
        "proxy_upstream_failures_total",
        "route" => route,
        "kind" => kind
    )
    .increment(1);
}
