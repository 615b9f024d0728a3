//! Video service metrics.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "videodb_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "videodb_latency_seconds";

    /// Polls of long-running jobs by operation.
    pub const POLLS_TOTAL: &str = "videodb_polls_total";
}

/// Record metrics for a completed request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record one poll of a processing job.
pub fn record_poll(operation: &str) {
    counter!(
        names::POLLS_TOTAL,
        "operation" => operation.to_string()
    )
    .increment(1);
}
