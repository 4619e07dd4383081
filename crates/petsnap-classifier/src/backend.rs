//! Inference backend trait

use crate::preprocess::PreparedImage;
use async_trait::async_trait;
use petsnap_core::{ClassificationResult, Result};
use tokio_util::sync::CancellationToken;

/// Trait for all inference backends.
///
/// A backend maps a prepared image to a two-class result. Implementations
/// must not mutate state shared with other components; anything they keep
/// (loaded weights, sessions) is private to the backend.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &str;

    /// One-time setup (load weights, warm caches).
    ///
    /// Called by the lifecycle manager at most once per transition into
    /// `Ready`; called again only after a failed attempt.
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Classify a prepared image.
    ///
    /// `cancel` fires when the caller gives up; long-running backends should
    /// stop early and return `Error::Cancelled`.
    async fn infer(
        &self,
        image: &PreparedImage,
        cancel: &CancellationToken,
    ) -> Result<ClassificationResult>;
}
