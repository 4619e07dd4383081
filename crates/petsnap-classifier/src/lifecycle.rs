//! Backend lifecycle tracking and lazy initialization

use crate::backend::InferenceBackend;
use parking_lot::Mutex;
use petsnap_core::{Error, Result};
use petsnap_telemetry::ClassifierMetrics;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Initialization state of the inference backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierState {
    /// Backend setup has never been attempted
    Uninitialized,
    /// Backend setup is in flight
    Initializing,
    /// Backend is ready for inference
    Ready,
    /// Last setup attempt failed; the next use retries
    Failed,
}

impl ClassifierState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ClassifierState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks whether the backend is set up and performs setup on demand.
///
/// Setup attempts are serialized behind an async mutex: a caller arriving
/// while another attempt is running waits for it and then re-checks the
/// state, so setup runs at most once per transition into `Ready`.
pub struct Lifecycle {
    backend: Arc<dyn InferenceBackend>,
    state: Mutex<ClassifierState>,
    init_lock: tokio::sync::Mutex<()>,
    initializations: AtomicU64,
    metrics: ClassifierMetrics,
}

impl Lifecycle {
    /// Create a lifecycle manager for `backend`, starting `Uninitialized`
    pub fn new(backend: Arc<dyn InferenceBackend>, metrics: ClassifierMetrics) -> Self {
        Self {
            backend,
            state: Mutex::new(ClassifierState::Uninitialized),
            init_lock: tokio::sync::Mutex::new(()),
            initializations: AtomicU64::new(0),
            metrics,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> ClassifierState {
        *self.state.lock()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ClassifierState::Ready
    }

    /// Number of successful backend setups so far
    pub fn initializations(&self) -> u64 {
        self.initializations.load(Ordering::Relaxed)
    }

    /// Make sure the backend is ready, initializing it if needed
    pub async fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }

        let _init = self.init_lock.lock().await;

        // Another caller may have finished setup while we waited.
        let previous = self.state();
        if previous == ClassifierState::Ready {
            debug!("backend became ready while waiting for initialization");
            return Ok(());
        }

        let attempt = InitAttempt::begin(&self.state, previous);
        info!(
            backend = self.backend.name(),
            from = %previous,
            "initializing inference backend"
        );

        match self.backend.initialize().await {
            Ok(()) => {
                attempt.settle(ClassifierState::Ready);
                self.initializations.fetch_add(1, Ordering::Relaxed);
                self.metrics.record_initialization();
                info!(backend = self.backend.name(), "inference backend ready");
                Ok(())
            }
            Err(e) => {
                attempt.settle(ClassifierState::Failed);
                warn!(backend = self.backend.name(), error = %e, "backend initialization failed");
                Err(match e {
                    e @ Error::Initialization { .. } => e,
                    other => Error::initialization_with(
                        format!("backend '{}' failed to initialize", self.backend.name()),
                        other,
                    ),
                })
            }
        }
    }
}

/// An in-flight transition through `Initializing`.
///
/// Dropping it unsettled (the initializing future was cancelled) restores
/// the state the attempt started from.
struct InitAttempt<'a> {
    state: &'a Mutex<ClassifierState>,
    previous: ClassifierState,
    settled: bool,
}

impl<'a> InitAttempt<'a> {
    fn begin(state: &'a Mutex<ClassifierState>, previous: ClassifierState) -> Self {
        *state.lock() = ClassifierState::Initializing;
        Self {
            state,
            previous,
            settled: false,
        }
    }

    fn settle(mut self, next: ClassifierState) {
        *self.state.lock() = next;
        self.settled = true;
    }
}

impl Drop for InitAttempt<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.state.lock() = self.previous;
        }
    }
}
