//! Metrics collection and reporting

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Outcome of a single `classify` invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Pipeline completed with a result
    Success,
    /// Rejected by the single-flight guard
    Rejected,
    /// Any other failure
    Failure,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Failure => "failure",
        }
    }
}

/// Metrics collector for classification monitoring.
///
/// Counters are kept locally for snapshots and mirrored to the global
/// `metrics` recorder, so an exporter installed by the host picks them up.
#[derive(Clone)]
pub struct ClassifierMetrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    total_requests: AtomicU64,
    successes: AtomicU64,
    failures: AtomicU64,
    rejected: AtomicU64,
    total_latency_us: AtomicU64,
    initializations: AtomicU64,
}

impl ClassifierMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                total_requests: AtomicU64::new(0),
                successes: AtomicU64::new(0),
                failures: AtomicU64::new(0),
                rejected: AtomicU64::new(0),
                total_latency_us: AtomicU64::new(0),
                initializations: AtomicU64::new(0),
            }),
        }
    }

    /// Record the outcome of one classification
    pub fn record_classification(&self, outcome: Outcome, latency_us: u64) {
        self.inner.total_requests.fetch_add(1, Ordering::Relaxed);

        let counter = match outcome {
            Outcome::Success => &self.inner.successes,
            Outcome::Rejected => &self.inner.rejected,
            Outcome::Failure => &self.inner.failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        ::metrics::counter!("petsnap_classifications_total", "outcome" => outcome.as_str())
            .increment(1);

        if outcome == Outcome::Success {
            self.inner
                .total_latency_us
                .fetch_add(latency_us, Ordering::Relaxed);
            ::metrics::histogram!("petsnap_classification_latency_us").record(latency_us as f64);
        }
    }

    /// Record a completed backend initialization
    pub fn record_initialization(&self) {
        self.inner.initializations.fetch_add(1, Ordering::Relaxed);
        ::metrics::counter!("petsnap_initializations_total").increment(1);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.inner.total_requests.load(Ordering::Relaxed),
            successes: self.inner.successes.load(Ordering::Relaxed),
            failures: self.inner.failures.load(Ordering::Relaxed),
            rejected: self.inner.rejected.load(Ordering::Relaxed),
            total_latency_us: self.inner.total_latency_us.load(Ordering::Relaxed),
            initializations: self.inner.initializations.load(Ordering::Relaxed),
        }
    }
}

impl Default for ClassifierMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of current metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub successes: u64,
    pub failures: u64,
    pub rejected: u64,
    pub total_latency_us: u64,
    pub initializations: u64,
}

impl MetricsSnapshot {
    /// Average latency of successful classifications
    pub fn avg_latency_us(&self) -> u64 {
        if self.successes == 0 {
            0
        } else {
            self.total_latency_us / self.successes
        }
    }

    /// Share of requests turned away by the single-flight guard
    pub fn rejection_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.rejected as f64 / self.total_requests as f64
        }
    }
}
