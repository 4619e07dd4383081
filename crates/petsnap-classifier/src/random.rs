//! Placeholder backend producing random predictions

use crate::backend::InferenceBackend;
use crate::preprocess::PreparedImage;
use petsnap_core::{round_percent, ClassificationResult, Error, PetLabel, Result};
use rand::Rng;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Lowest confidence the placeholder reports
pub const MIN_CONFIDENCE: f64 = 70.0;

/// Highest confidence the placeholder reports
pub const MAX_CONFIDENCE: f64 = 100.0;

/// Stand-in backend: picks `Cat` or `Dog` uniformly and a confidence
/// uniformly in [70, 100], rounded to two decimals.
///
/// Optional latencies let callers exercise the service's concurrency
/// behaviour as if a real model were running.
pub struct RandomBackend {
    name: String,
    latency: Option<Duration>,
    init_latency: Option<Duration>,
}

impl RandomBackend {
    /// Create a new random backend.
    pub fn new() -> Self {
        Self {
            name: "random".to_string(),
            latency: None,
            init_latency: None,
        }
    }

    /// Simulate inference taking `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency).filter(|d| !d.is_zero());
        self
    }

    /// Simulate setup taking `latency`
    pub fn with_init_latency(mut self, latency: Duration) -> Self {
        self.init_latency = Some(latency).filter(|d| !d.is_zero());
        self
    }

    fn draw() -> (PetLabel, f64) {
        let mut rng = rand::thread_rng();
        let label = if rng.gen::<f64>() < 0.5 {
            PetLabel::Cat
        } else {
            PetLabel::Dog
        };
        let confidence = round_percent(rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE));
        (label, confidence)
    }
}

impl Default for RandomBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InferenceBackend for RandomBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn initialize(&self) -> Result<()> {
        if let Some(latency) = self.init_latency {
            tokio::time::sleep(latency).await;
        }
        Ok(())
    }

    async fn infer(
        &self,
        image: &PreparedImage,
        cancel: &CancellationToken,
    ) -> Result<ClassificationResult> {
        let start = Instant::now();

        if let Some(latency) = self.latency {
            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(latency) => {}
            }
        }

        let (label, confidence) = Self::draw();
        debug!(image = %image.image(), %label, confidence, "random prediction");

        Ok(ClassificationResult::new(label, confidence, &self.name)
            .with_latency_us(start.elapsed().as_micros() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petsnap_core::{ImageMetadata, ImageRef};
    use std::collections::HashSet;

    fn prepared() -> PreparedImage {
        PreparedImage::new(
            ImageRef::new("fixtures/pet.jpg").unwrap(),
            ImageMetadata::new(224, 224).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_results_stay_in_range() {
        let backend = RandomBackend::new();
        let cancel = CancellationToken::new();
        let mut labels = HashSet::new();

        for _ in 0..500 {
            let result = backend.infer(&prepared(), &cancel).await.unwrap();
            assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&result.confidence));
            assert_eq!(result.confidence, round_percent(result.confidence));
            assert_eq!(result.backend, "random");
            labels.insert(result.label);
        }

        // 500 fair coin flips all landing the same way is not a realistic outcome.
        assert_eq!(labels.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_simulated_latency() {
        let backend = RandomBackend::new().with_latency(Duration::from_secs(30));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = backend.infer(&prepared(), &cancel).await.unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn test_zero_latency_is_ignored() {
        let backend = RandomBackend::new().with_latency(Duration::ZERO);
        assert!(backend.latency.is_none());
    }
}
