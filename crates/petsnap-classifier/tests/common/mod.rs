//! Mock backends and size providers for testing
//!
//! Configurable implementations of `InferenceBackend` and
//! `ImageSizeProvider` for exercising the lifecycle, the single-flight guard
//! and error paths.

#![allow(dead_code)]

use async_trait::async_trait;
use petsnap_classifier::{
    CancellationToken, ErrorCallback, ImageSizeProvider, InferenceBackend, PreparedImage,
    SizeCallback,
};
use petsnap_core::{ClassificationResult, Error, PetLabel, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// A configurable mock backend
pub struct MockBackend {
    label: PetLabel,
    confidence: f64,
    init_latency: Option<Duration>,
    infer_latency: Option<Duration>,
    init_failures_left: AtomicU32,
    infer_error: Option<String>,
    init_calls: AtomicU32,
    infer_calls: AtomicU32,
}

impl MockBackend {
    /// Create a mock that always answers `Dog` at 91.5%
    pub fn new() -> Self {
        Self {
            label: PetLabel::Dog,
            confidence: 91.5,
            init_latency: None,
            infer_latency: None,
            init_failures_left: AtomicU32::new(0),
            infer_error: None,
            init_calls: AtomicU32::new(0),
            infer_calls: AtomicU32::new(0),
        }
    }

    /// Set the prediction this backend returns
    pub fn with_prediction(mut self, label: PetLabel, confidence: f64) -> Self {
        self.label = label;
        self.confidence = confidence;
        self
    }

    /// Simulate slow setup
    pub fn with_init_latency(mut self, latency: Duration) -> Self {
        self.init_latency = Some(latency);
        self
    }

    /// Simulate slow inference
    pub fn with_infer_latency(mut self, latency: Duration) -> Self {
        self.infer_latency = Some(latency);
        self
    }

    /// Fail the first `count` setup attempts
    pub fn failing_init(self, count: u32) -> Self {
        self.init_failures_left.store(count, Ordering::SeqCst);
        self
    }

    /// Fail every inference with `message`
    pub fn failing_infer(mut self, message: &str) -> Self {
        self.infer_error = Some(message.to_string());
        self
    }

    /// Number of times `initialize` was called
    pub fn init_calls(&self) -> u32 {
        self.init_calls.load(Ordering::SeqCst)
    }

    /// Number of times `infer` was called
    pub fn infer_calls(&self) -> u32 {
        self.infer_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn initialize(&self) -> Result<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.init_latency {
            tokio::time::sleep(latency).await;
        }

        let left = self.init_failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.init_failures_left.store(left - 1, Ordering::SeqCst);
            return Err(Error::initialization("simulated setup failure"));
        }
        Ok(())
    }

    async fn infer(
        &self,
        _image: &PreparedImage,
        cancel: &CancellationToken,
    ) -> Result<ClassificationResult> {
        self.infer_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(latency) = self.infer_latency {
            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(latency) => {}
            }
        }

        if let Some(message) = &self.infer_error {
            return Err(Error::inference(message.clone()));
        }

        Ok(ClassificationResult::new(self.label, self.confidence, "mock"))
    }
}

/// Reports the same error for every query
pub struct FailingProvider {
    message: String,
}

impl FailingProvider {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

impl ImageSizeProvider for FailingProvider {
    fn get_size(&self, _uri: &str, _on_success: SizeCallback, on_error: ErrorCallback) {
        on_error(self.message.clone().into());
    }
}

/// Drops both callbacks without calling either
pub struct SilentProvider;

impl ImageSizeProvider for SilentProvider {
    fn get_size(&self, _uri: &str, _on_success: SizeCallback, _on_error: ErrorCallback) {}
}
