//! Metrics and observability utilities
//!
//! Prometheus metrics under a common prefix. Recording is a no-op until a
//! recorder is installed, so these helpers are safe to call from tests.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all Shikshak Sarthi metrics
pub const METRICS_PREFIX: &str = "sarthi";

/// Histogram buckets for request latency (in seconds). The simulated
/// endpoints sleep for seconds, hence the long tail.
pub const LATENCY_BUCKETS: &[f64] = &[
    0.005, // 5ms
    0.010, // 10ms
    0.025, // 25ms
    0.050, // 50ms
    0.100, // 100ms
    0.250, // 250ms
    0.500, // 500ms
    1.000, // 1s
    2.500, // 2.5s
    5.000, // 5s
    10.00, // 10s
];

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    describe_counter!(
        format!("{}_appraisal_transitions_total", METRICS_PREFIX),
        Unit::Count,
        "Appraisal status changes, by target status"
    );

    describe_counter!(
        format!("{}_analyses_total", METRICS_PREFIX),
        Unit::Count,
        "Simulated appraisal analyses generated"
    );

    describe_counter!(
        format!("{}_publications_scraped_total", METRICS_PREFIX),
        Unit::Count,
        "Publications created by the simulated scrapers"
    );

    describe_counter!(
        format!("{}_emails_total", METRICS_PREFIX),
        Unit::Count,
        "Email delivery attempts, by outcome"
    );

    describe_counter!(
        format!("{}_field_mappings_total", METRICS_PREFIX),
        Unit::Count,
        "Field mapping requests, by backend"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

pub fn record_transition(status: &str) {
    counter!(
        format!("{}_appraisal_transitions_total", METRICS_PREFIX),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_analysis() {
    counter!(format!("{}_analyses_total", METRICS_PREFIX)).increment(1);
}

pub fn record_scrape(source: &str, count: usize) {
    counter!(
        format!("{}_publications_scraped_total", METRICS_PREFIX),
        "source" => source.to_string()
    )
    .increment(count as u64);
}

pub fn record_email(sent: bool) {
    let outcome = if sent { "sent" } else { "failed" };
    counter!(
        format!("{}_emails_total", METRICS_PREFIX),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_mapping(backend: &str, matched: usize) {
    counter!(
        format!("{}_field_mappings_total", METRICS_PREFIX),
        "backend" => backend.to_string(),
        "matched" => if matched > 0 { "yes" } else { "no" }
    )
    .increment(1);
}
