//! Preprocessing stage: turns an image locator into a prepared image
//!
//! Dimension probing goes through the platform's callback-style
//! [`ImageSizeProvider`]. [`query_size`] bridges the success/error callback
//! pair into a single awaitable outcome.

use parking_lot::Mutex;
use petsnap_core::{BoxError, Error, ImageMetadata, ImageRef, Result};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

/// Invoked with `(width, height)` when the size query succeeds
pub type SizeCallback = Box<dyn FnOnce(u32, u32) + Send + 'static>;

/// Invoked with the platform's error when the size query fails
pub type ErrorCallback = Box<dyn FnOnce(BoxError) + Send + 'static>;

/// Platform facility answering image size queries through callbacks.
///
/// Implementations call exactly one of the two callbacks, either before
/// returning or later from another task or thread.
pub trait ImageSizeProvider: Send + Sync {
    fn get_size(&self, uri: &str, on_success: SizeCallback, on_error: ErrorCallback);
}

/// Image ready for inference
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedImage {
    image: ImageRef,
    metadata: ImageMetadata,
}

impl PreparedImage {
    pub fn new(image: ImageRef, metadata: ImageMetadata) -> Self {
        Self { image, metadata }
    }

    /// Locator the image was prepared from
    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    pub fn metadata(&self) -> ImageMetadata {
        self.metadata
    }
}

/// Preprocessing stage
pub struct Preprocessor {
    provider: Arc<dyn ImageSizeProvider>,
}

impl Preprocessor {
    /// Create a preprocessor backed by `provider`
    pub fn new(provider: Arc<dyn ImageSizeProvider>) -> Self {
        Self { provider }
    }

    /// Resolve everything inference needs to know about `image`
    pub async fn prepare(&self, image: &ImageRef) -> Result<PreparedImage> {
        let metadata = self.probe_metadata(image).await?;
        debug!(
            image = %image,
            width = metadata.width,
            height = metadata.height,
            "image prepared"
        );
        Ok(PreparedImage::new(image.clone(), metadata))
    }

    async fn probe_metadata(&self, image: &ImageRef) -> Result<ImageMetadata> {
        let (width, height) = query_size(self.provider.as_ref(), image.as_str())
            .await
            .map_err(|e| Error::preprocessing(image.as_str(), e))?;

        ImageMetadata::new(width, height).ok_or_else(|| {
            Error::preprocessing(
                image.as_str(),
                format!("image reported invalid dimensions {}x{}", width, height),
            )
        })
    }
}

/// Run one size query and await whichever callback fires first.
///
/// Fails if the provider drops both callbacks without calling either.
pub async fn query_size(
    provider: &dyn ImageSizeProvider,
    uri: &str,
) -> std::result::Result<(u32, u32), BoxError> {
    let (tx, rx) = oneshot::channel();
    let slot = Arc::new(Mutex::new(Some(tx)));
    let success_slot = Arc::clone(&slot);

    provider.get_size(
        uri,
        Box::new(move |width: u32, height: u32| {
            if let Some(tx) = success_slot.lock().take() {
                let _ = tx.send(Ok((width, height)));
            }
        }),
        Box::new(move |err: BoxError| {
            if let Some(tx) = slot.lock().take() {
                let _ = tx.send(Err(err));
            }
        }),
    );

    match rx.await {
        Ok(outcome) => outcome,
        Err(_) => Err("image size query completed without reporting a result".into()),
    }
}
