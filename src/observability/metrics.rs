//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tasks_requests_total` (counter): requests by method, route, status
//! - `tasks_request_duration_seconds` (histogram): latency by method, route
//! - `tasks_store_records` (gauge): records held per collection

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Route label used when no route matched.
pub const UNMATCHED_ROUTE: &str = "none";

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "tasks_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        "tasks_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the current size of a store collection.
pub fn record_store_size(collection: &str, records: usize) {
    ::metrics::gauge!("tasks_store_records", "collection" => collection.to_string())
        .set(records as f64);
}
