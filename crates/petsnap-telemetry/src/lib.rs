//! PetSnap Telemetry
//!
//! Classification metrics for PetSnap: per-outcome counters and latency,
//! mirrored to the `metrics` facade.

pub mod metrics;

pub use crate::metrics::{ClassifierMetrics, MetricsSnapshot, Outcome};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::metrics::{ClassifierMetrics, MetricsSnapshot, Outcome};
}
