//! Metrics and observability utilities
//!
//! Provides pipeline metrics with standardized naming conventions.
//! Recording is a no-op until a recorder is installed, so library
//! callers that do not care about metrics pay nothing.

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram,
    gauge, histogram, Unit,
};
use std::time::Instant;

/// Metrics prefix for all BibNet metrics
pub const METRICS_PREFIX: &str = "bibnet";

/// Buckets for per-file parse latency (in seconds)
pub const PARSE_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.500,  // 500ms
    1.000,  // 1s
    5.000,  // 5s
];

/// Buckets for analytics latency (betweenness dominates)
pub const ANALYTICS_BUCKETS: &[f64] = &[
    0.010,  // 10ms
    0.100,  // 100ms
    0.500,  // 500ms
    1.000,  // 1s
    5.000,  // 5s
    30.00,  // 30s
    120.0,  // 2m
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Parser metrics
    describe_counter!(
        format!("{}_records_parsed_total", METRICS_PREFIX),
        Unit::Count,
        "Total bibliographic records emitted by the parser"
    );

    describe_counter!(
        format!("{}_entries_dropped_total", METRICS_PREFIX),
        Unit::Count,
        "Entries dropped because their braces never closed"
    );

    describe_histogram!(
        format!("{}_parse_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Per-file parse latency in seconds"
    );

    // Builder metrics
    describe_counter!(
        format!("{}_publications_total", METRICS_PREFIX),
        Unit::Count,
        "Publications added to the co-authorship network"
    );

    describe_counter!(
        format!("{}_records_skipped_total", METRICS_PREFIX),
        Unit::Count,
        "Records skipped for lacking authors or repeating a key"
    );

    describe_counter!(
        format!("{}_authors_resolved_total", METRICS_PREFIX),
        Unit::Count,
        "Author names normalized into identity keys"
    );

    describe_gauge!(
        format!("{}_network_nodes", METRICS_PREFIX),
        Unit::Count,
        "Authors in the current network snapshot"
    );

    describe_gauge!(
        format!("{}_network_edges", METRICS_PREFIX),
        Unit::Count,
        "Co-authorship edges in the current network snapshot"
    );

    // Analytics metrics
    describe_histogram!(
        format!("{}_analytics_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Metrics bundle computation latency in seconds"
    );

    tracing::debug!("Metrics registered");
}

/// Helper to time a pipeline stage
pub struct StageTimer {
    start: Instant,
}

impl StageTimer {
    /// Start timing
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds elapsed since start
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Helper to record parser metrics for one file
pub fn record_parse(duration_secs: f64, records: usize, dropped: usize) {
    counter!(format!("{}_records_parsed_total", METRICS_PREFIX)).increment(records as u64);

    if dropped > 0 {
        counter!(format!("{}_entries_dropped_total", METRICS_PREFIX)).increment(dropped as u64);
    }

    histogram!(format!("{}_parse_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

/// Helper to record a publication accepted by the builder
pub fn record_publication(author_count: usize) {
    counter!(format!("{}_publications_total", METRICS_PREFIX)).increment(1);

    counter!(format!("{}_authors_resolved_total", METRICS_PREFIX))
        .increment(author_count as u64);
}

/// Helper to record a record the builder did not accept
pub fn record_skipped(reason: &'static str) {
    counter!(
        format!("{}_records_skipped_total", METRICS_PREFIX),
        "reason" => reason
    )
    .increment(1);
}

/// Helper to record the size of a network snapshot
pub fn record_network_size(nodes: usize, edges: usize) {
    gauge!(format!("{}_network_nodes", METRICS_PREFIX)).set(nodes as f64);
    gauge!(format!("{}_network_edges", METRICS_PREFIX)).set(edges as f64);
}

/// Helper to record analytics latency
pub fn record_analytics(duration_secs: f64, exact_betweenness: bool) {
    let mode = if exact_betweenness { "exact" } else { "sampled" };

    histogram!(
        format!("{}_analytics_duration_seconds", METRICS_PREFIX),
        "betweenness" => mode
    )
    .record(duration_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets_sorted() {
        for buckets in [PARSE_BUCKETS, ANALYTICS_BUCKETS] {
            let mut prev = 0.0;
            for &bucket in buckets {
                assert!(bucket > prev);
                prev = bucket;
            }
        }
    }

    #[test]
    fn test_recording_without_recorder() {
        // No recorder installed: every helper must be a silent no-op
        register_metrics();
        record_parse(0.01, 10, 1);
        record_publication(3);
        record_skipped("no_authors");
        record_network_size(5, 4);
        record_analytics(0.2, true);

        let timer = StageTimer::start();
        assert!(timer.elapsed_secs() >= 0.0);
    }
}
