//! PetSnap Core
//!
//! Core types and error handling shared across PetSnap components.
//!
//! This crate provides:
//! - The error taxonomy surfaced by the classification service
//! - Image locator and metadata types
//! - The two-class classification result

pub mod error;
pub mod types;

pub use error::{BoxError, Error, Result};
pub use types::{round_percent, ClassificationResult, ImageMetadata, ImageRef, PetLabel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{ClassificationResult, ImageMetadata, ImageRef, PetLabel};
}
