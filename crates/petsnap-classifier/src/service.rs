//! Classifier service: the public entry point
//!
//! [`PetClassifier`] runs `ensure_ready -> prepare -> infer` for one image
//! at a time. A second `classify` issued while one is pending is rejected
//! with [`Error::ConcurrentClassification`]; it never queues behind or
//! interleaves with the running one.

use crate::backend::InferenceBackend;
use crate::config::ClassifierConfig;
use crate::lifecycle::{ClassifierState, Lifecycle};
use crate::platform::FileImageSizeProvider;
use crate::preprocess::{ImageSizeProvider, Preprocessor};
use crate::random::RandomBackend;
use petsnap_core::{ClassificationResult, Error, ImageRef, Result};
use petsnap_telemetry::{ClassifierMetrics, Outcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

/// Pet image classifier.
///
/// Construct one per application and share it (`Arc<PetClassifier>`) with
/// whoever needs to classify.
pub struct PetClassifier {
    lifecycle: Lifecycle,
    preprocessor: Preprocessor,
    backend: Arc<dyn InferenceBackend>,
    in_flight: AtomicBool,
    auto_initialize: bool,
    metrics: ClassifierMetrics,
}

impl PetClassifier {
    /// Create a classifier with lazy initialization enabled
    pub fn new(backend: Arc<dyn InferenceBackend>, provider: Arc<dyn ImageSizeProvider>) -> Self {
        Self::builder().backend(backend).provider(provider).build()
    }

    /// Create a classifier from configuration
    pub fn from_config(config: &ClassifierConfig, provider: Arc<dyn ImageSizeProvider>) -> Self {
        Self::builder()
            .backend(config.build_backend())
            .provider(provider)
            .auto_initialize(config.auto_initialize)
            .build()
    }

    pub fn builder() -> PetClassifierBuilder {
        PetClassifierBuilder::new()
    }

    /// Eagerly initialize the backend.
    ///
    /// Returns `false` instead of an error when setup fails; the failure is
    /// logged and the next call retries.
    pub async fn load_model(&self) -> bool {
        match self.lifecycle.ensure_ready().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "model load failed");
                false
            }
        }
    }

    /// Classify the image at `image`
    pub async fn classify(&self, image: &str) -> Result<ClassificationResult> {
        self.classify_with_cancel(image, &CancellationToken::new())
            .await
    }

    /// Classify the image at `image`, giving up with `Error::Cancelled`
    /// once `cancel` fires.
    ///
    /// The token is also handed to the backend so it can stop early.
    pub async fn classify_with_cancel(
        &self,
        image: &str,
        cancel: &CancellationToken,
    ) -> Result<ClassificationResult> {
        let image = match ImageRef::new(image) {
            Ok(image) => image,
            Err(e) => {
                self.metrics.record_classification(Outcome::Failure, 0);
                return Err(e);
            }
        };

        let Some(_guard) = SingleFlightGuard::try_acquire(&self.in_flight) else {
            warn!(image = %image, "classification rejected: another one is in progress");
            self.metrics.record_classification(Outcome::Rejected, 0);
            return Err(Error::ConcurrentClassification);
        };

        let span = info_span!("classify", request_id = %Uuid::new_v4(), image = %image);
        let start = Instant::now();
        let recorder = OutcomeRecorder::new(&self.metrics);

        let result = async {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(Error::Cancelled),
                result = self.run_pipeline(&image, cancel) => result,
            }
        }
        .instrument(span)
        .await;

        let elapsed_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(prediction) => {
                debug!(
                    image = %image,
                    label = %prediction.label,
                    confidence = prediction.confidence,
                    elapsed_us,
                    "classification complete"
                );
                recorder.finish(Outcome::Success, elapsed_us);
            }
            Err(e) => {
                warn!(image = %image, error = %e, "classification failed");
                recorder.finish(Outcome::Failure, 0);
            }
        }

        result
    }

    async fn run_pipeline(
        &self,
        image: &ImageRef,
        cancel: &CancellationToken,
    ) -> Result<ClassificationResult> {
        if self.auto_initialize {
            self.lifecycle.ensure_ready().await?;
        } else if !self.lifecycle.is_ready() {
            return Err(Error::NotReady);
        }

        let prepared = self.preprocessor.prepare(image).await?;
        self.backend.infer(&prepared, cancel).await
    }

    /// Current lifecycle state
    pub fn state(&self) -> ClassifierState {
        self.lifecycle.state()
    }

    /// Whether a classification is running right now
    pub fn is_classifying(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Number of successful backend setups
    pub fn initializations(&self) -> u64 {
        self.lifecycle.initializations()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn metrics(&self) -> &ClassifierMetrics {
        &self.metrics
    }
}

/// Holds the in-flight flag; clears it on drop.
///
/// The flag is released on every exit from `classify`, including early
/// returns and the caller dropping the future.
struct SingleFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SingleFlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SingleFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Records exactly one outcome per admitted classification.
///
/// A `classify` future dropped before it settles counts as a failure.
struct OutcomeRecorder<'a> {
    metrics: &'a ClassifierMetrics,
    settled: bool,
}

impl<'a> OutcomeRecorder<'a> {
    fn new(metrics: &'a ClassifierMetrics) -> Self {
        Self {
            metrics,
            settled: false,
        }
    }

    fn finish(mut self, outcome: Outcome, latency_us: u64) {
        self.settled = true;
        self.metrics.record_classification(outcome, latency_us);
    }
}

impl Drop for OutcomeRecorder<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("classification dropped before completion");
            self.metrics.record_classification(Outcome::Failure, 0);
        }
    }
}

/// Builder for [`PetClassifier`]
pub struct PetClassifierBuilder {
    backend: Option<Arc<dyn InferenceBackend>>,
    provider: Option<Arc<dyn ImageSizeProvider>>,
    auto_initialize: bool,
    metrics: Option<ClassifierMetrics>,
}

impl PetClassifierBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            backend: None,
            provider: None,
            auto_initialize: true,
            metrics: None,
        }
    }

    /// Set the inference backend (default: [`RandomBackend`])
    pub fn backend(mut self, backend: Arc<dyn InferenceBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set the image size provider (default: [`FileImageSizeProvider`])
    pub fn provider(mut self, provider: Arc<dyn ImageSizeProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Initialize lazily on first classification (default: true)
    pub fn auto_initialize(mut self, enabled: bool) -> Self {
        self.auto_initialize = enabled;
        self
    }

    /// Share an existing metrics collector
    pub fn metrics(mut self, metrics: ClassifierMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the classifier
    pub fn build(self) -> PetClassifier {
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(RandomBackend::new()));
        let provider = self
            .provider
            .unwrap_or_else(|| Arc::new(FileImageSizeProvider::new()));
        let metrics = self.metrics.unwrap_or_default();

        PetClassifier {
            lifecycle: Lifecycle::new(Arc::clone(&backend), metrics.clone()),
            preprocessor: Preprocessor::new(provider),
            backend,
            in_flight: AtomicBool::new(false),
            auto_initialize: self.auto_initialize,
            metrics,
        }
    }
}

impl Default for PetClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
