//! Core types for PetSnap

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Opaque locator (URI or path) of a source image.
///
/// Immutable and cheap to clone. Construction rejects empty and
/// whitespace-only locators.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(Arc<str>);

impl ImageRef {
    /// Create a new image reference
    pub fn new(uri: impl AsRef<str>) -> Result<Self> {
        let uri = uri.as_ref();
        if uri.trim().is_empty() {
            return Err(Error::InvalidImageRef(
                "image reference must not be empty".to_string(),
            ));
        }
        Ok(Self(Arc::from(uri)))
    }

    /// Get the locator as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ImageRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ImageRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pixel dimensions of an image, both strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
}

impl ImageMetadata {
    /// Create metadata, returning `None` when either dimension is zero
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// The two-class label domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetLabel {
    Cat,
    Dog,
}

impl PetLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cat => "cat",
            Self::Dog => "dog",
        }
    }
}

impl fmt::Display for PetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Predicted label
    pub label: PetLabel,

    /// Confidence as a percentage (0.0-100.0)
    pub confidence: f64,

    /// Name of the backend that produced this result
    pub backend: String,

    /// Inference latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a new classification result; confidence is clamped to [0, 100]
    pub fn new(label: PetLabel, confidence: f64, backend: impl Into<String>) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 100.0),
            backend: backend.into(),
            latency_us: 0,
        }
    }

    /// Set the measured latency
    pub fn with_latency_us(mut self, latency_us: u64) -> Self {
        self.latency_us = latency_us;
        self
    }
}

/// Round a percentage to two decimal places
pub fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_image_ref_rejects_empty() {
        assert!(matches!(ImageRef::new(""), Err(Error::InvalidImageRef(_))));
        assert!(matches!(ImageRef::new("  \t"), Err(Error::InvalidImageRef(_))));

        let image: ImageRef = "file:///pets/rex.jpg".parse().unwrap();
        assert_eq!(image.as_str(), "file:///pets/rex.jpg");
    }

    #[test]
    fn test_metadata_requires_positive_dimensions() {
        assert!(ImageMetadata::new(0, 10).is_none());
        assert!(ImageMetadata::new(10, 0).is_none());

        let meta = ImageMetadata::new(640, 480).unwrap();
        assert!((meta.aspect_ratio() - 4.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_result_serializes_lowercase_label() {
        let result = ClassificationResult::new(PetLabel::Dog, 87.5, "random");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["label"], "dog");
        assert_eq!(json["confidence"], 87.5);
    }

    #[test]
    fn test_result_clamps_confidence() {
        assert_eq!(ClassificationResult::new(PetLabel::Cat, 140.0, "x").confidence, 100.0);
        assert_eq!(ClassificationResult::new(PetLabel::Cat, -3.0, "x").confidence, 0.0);
    }

    proptest! {
        #[test]
        fn round_percent_stays_in_range(value in 70.0f64..=100.0) {
            let rounded = round_percent(value);
            prop_assert!((70.0..=100.0).contains(&rounded));
            prop_assert!((rounded * 100.0 - (rounded * 100.0).round()).abs() < 1e-6);
        }
    }
}
