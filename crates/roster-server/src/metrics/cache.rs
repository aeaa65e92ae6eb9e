//! Cache metrics recording.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Describes the cache metrics. Call once at startup.
pub fn register_cache_metrics() {
    metrics::describe_counter!("roster_cache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("roster_cache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "roster_cache_errors_total",
        "Cache operations that failed and were treated as a miss or no-op"
    );
    metrics::describe_counter!(
        "roster_cache_writes_total",
        "Responses written back to the cache after a miss"
    );
    metrics::describe_counter!(
        "roster_cache_invalidated_keys_total",
        "Cache keys removed by invalidation after a mutation"
    );
    metrics::describe_histogram!(
        "roster_cache_operation_seconds",
        "Time spent on cache operations"
    );
}

/// Cache metrics recorder.
///
/// Counts are also kept in local atomics so tests and logs can read them
/// without a Prometheus recorder installed.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("roster_cache_hits_total").increment(1);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("roster_cache_misses_total").increment(1);
    }

    /// Records a failed cache operation (`get`, `set`, `delete`, `list_keys`).
    pub fn record_error(&self, operation: &'static str) {
        self.errors.fetch_add(1, Ordering::Relaxed);
        counter!("roster_cache_errors_total", "operation" => operation).increment(1);
    }

    pub fn record_write(&self) {
        counter!("roster_cache_writes_total").increment(1);
    }

    pub fn record_invalidated(&self, count: usize) {
        counter!("roster_cache_invalidated_keys_total").increment(count as u64);
    }

    pub fn record_operation_duration(&self, operation: &'static str, duration: Duration) {
        histogram!("roster_cache_operation_seconds", "operation" => operation)
            .record(duration.as_secs_f64());
    }

    /// Hit rate over the lifetime of this recorder
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }
}
