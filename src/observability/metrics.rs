//! Metrics collection for the Fastly client.
//!
//! Counters are kept per operation name (`s3.list`, `s3.update`, ...) so a
//! caller can tell which endpoint calls are slow or failing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Metrics collector interface.
pub trait MetricsCollector: Send + Sync {
    /// Records a completed operation.
    fn record_request(&self, operation: &str, success: bool, duration: Duration);

    /// Records an error by its [`kind`](crate::FastlyError::kind).
    fn record_error(&self, error_kind: &str);

    /// Gets current metrics.
    fn get_metrics(&self) -> RequestMetrics;

    /// Resets all metrics.
    fn reset(&self);
}

/// Counters for a single operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationMetrics {
    /// Completed calls.
    pub calls: u64,
    /// Calls that ended in an error.
    pub failures: u64,
    /// Summed latency in milliseconds.
    pub total_latency_ms: u64,
    /// Slowest call in milliseconds.
    pub max_latency_ms: u64,
}

impl OperationMetrics {
    /// Average latency of this operation in milliseconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_latency_ms(&self) -> f64 {
        if self.calls == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.calls as f64
        }
    }

    fn record(&mut self, success: bool, millis: u64) {
        self.calls += 1;
        if !success {
            self.failures += 1;
        }
        self.total_latency_ms = self.total_latency_ms.saturating_add(millis);
        self.max_latency_ms = self.max_latency_ms.max(millis);
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    /// Total operations.
    pub total_requests: u64,
    /// Operations that succeeded.
    pub successful_requests: u64,
    /// Operations that failed.
    pub failed_requests: u64,
    /// Summed latency in milliseconds.
    pub total_latency_ms: u64,
    /// Per-operation counters.
    pub operations: HashMap<String, OperationMetrics>,
    /// Error counts by kind.
    pub errors: HashMap<String, u64>,
}

impl RequestMetrics {
    /// Calculates average latency in milliseconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn average_latency_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.total_requests as f64
        }
    }

    /// Calculates success rate as a percentage.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            100.0
        } else {
            (self.successful_requests as f64 / self.total_requests as f64) * 100.0
        }
    }

    /// Number of calls recorded for `operation`.
    pub fn calls(&self, operation: &str) -> u64 {
        self.operations.get(operation).map_or(0, |op| op.calls)
    }
}

/// Default in-memory metrics collector.
pub struct DefaultMetricsCollector {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    total_latency_ms: AtomicU64,
    operations: RwLock<HashMap<String, OperationMetrics>>,
    errors: RwLock<HashMap<String, u64>>,
}

impl DefaultMetricsCollector {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            operations: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for DefaultMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector for DefaultMetricsCollector {
    fn record_request(&self, operation: &str, success: bool, duration: Duration) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        }
        self.total_latency_ms.fetch_add(millis, Ordering::Relaxed);

        if let Ok(mut ops) = self.operations.write() {
            ops.entry(operation.to_string())
                .or_default()
                .record(success, millis);
        }
    }

    fn record_error(&self, error_kind: &str) {
        if let Ok(mut errors) = self.errors.write() {
            *errors.entry(error_kind.to_string()).or_insert(0) += 1;
        }
    }

    fn get_metrics(&self) -> RequestMetrics {
        let total_requests = self.total_requests.load(Ordering::Relaxed);
        let successful_requests = self.successful_requests.load(Ordering::Relaxed);

        RequestMetrics {
            total_requests,
            successful_requests,
            failed_requests: total_requests.saturating_sub(successful_requests),
            total_latency_ms: self.total_latency_ms.load(Ordering::Relaxed),
            operations: self.operations.read().map(|o| o.clone()).unwrap_or_default(),
            errors: self.errors.read().map(|e| e.clone()).unwrap_or_default(),
        }
    }

    fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.successful_requests.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);

        if let Ok(mut ops) = self.operations.write() {
            ops.clear();
        }
        if let Ok(mut errors) = self.errors.write() {
            errors.clear();
        }
    }
}

impl std::fmt::Debug for DefaultMetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultMetricsCollector")
            .field("total_requests", &self.total_requests.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_request_per_operation() {
        let collector = DefaultMetricsCollector::new();

        collector.record_request("s3.list", true, Duration::from_millis(100));
        collector.record_request("s3.list", true, Duration::from_millis(200));
        collector.record_request("s3.delete", false, Duration::from_millis(50));

        let metrics = collector.get_metrics();
        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.successful_requests, 2);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.total_latency_ms, 350);

        let list = metrics.operations["s3.list"];
        assert_eq!(list.calls, 2);
        assert_eq!(list.failures, 0);
        assert_eq!(list.max_latency_ms, 200);
        assert!((list.average_latency_ms() - 150.0).abs() < 0.1);

        assert_eq!(metrics.operations["s3.delete"].failures, 1);
        assert_eq!(metrics.calls("s3.get"), 0);
    }

    #[test]
    fn test_average_latency_and_success_rate() {
        let collector = DefaultMetricsCollector::new();
        assert!((collector.get_metrics().success_rate() - 100.0).abs() < 0.1);

        collector.record_request("s3.get", true, Duration::from_millis(100));
        collector.record_request("s3.get", false, Duration::from_millis(200));

        let metrics = collector.get_metrics();
        assert!((metrics.average_latency_ms() - 150.0).abs() < 0.1);
        assert!((metrics.success_rate() - 50.0).abs() < 0.1);
    }

    #[test]
    fn test_record_error_and_reset() {
        let collector = DefaultMetricsCollector::new();

        collector.record_error("not_found");
        collector.record_error("not_found");
        collector.record_request("s3.get", false, Duration::from_millis(1));
        assert_eq!(collector.get_metrics().errors.get("not_found"), Some(&2));

        collector.reset();

        let metrics = collector.get_metrics();
        assert_eq!(metrics.total_requests, 0);
        assert!(metrics.errors.is_empty());
        assert!(metrics.operations.is_empty());
    }
}
