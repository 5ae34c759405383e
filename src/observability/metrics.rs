//! Client metrics.
//!
//! # Metrics
//! - `search_client_requests_total` (counter): calls by operation and outcome
//! - `search_client_request_duration_seconds` (histogram): call latency by operation
//! - `search_client_node_health` (gauge): 1=alive, 0=dead, per node
//!
//! Recorded through the `metrics` facade; installing an exporter is up to
//! the embedding application.

use std::time::Instant;

/// Record one completed call.
pub fn record_request(operation: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "search_client_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!(
        "search_client_request_duration_seconds",
        "operation" => operation
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a node health transition.
pub fn record_node_health(node: &str, alive: bool) {
    metrics::gauge!("search_client_node_health", "node" => node.to_string())
        .set(if alive { 1.0 } else { 0.0 });
}
