//! PetSnap Classifier
//!
//! Asynchronous cat/dog image classification service.
//!
//! A classification runs three stages in order:
//! - Lifecycle: make sure the inference backend is set up (lazily by default)
//! - Preprocessing: resolve image dimensions through the platform's
//!   callback-style size query
//! - Inference: hand the prepared image to a pluggable [`InferenceBackend`]
//!
//! [`PetClassifier`] allows one classification in flight per instance and
//! rejects concurrent requests instead of queueing them.

pub mod backend;
pub mod config;
pub mod lifecycle;
pub mod platform;
pub mod preprocess;
pub mod random;
pub mod service;

pub use backend::InferenceBackend;
pub use config::{BackendSpec, ClassifierConfig};
pub use lifecycle::{ClassifierState, Lifecycle};
pub use platform::{FileImageSizeProvider, StaticImageSizeProvider};
pub use preprocess::{
    query_size, ErrorCallback, ImageSizeProvider, PreparedImage, Preprocessor, SizeCallback,
};
pub use random::RandomBackend;
pub use service::{PetClassifier, PetClassifierBuilder};

pub use tokio_util::sync::CancellationToken;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::backend::InferenceBackend;
    pub use crate::lifecycle::ClassifierState;
    pub use crate::preprocess::{ImageSizeProvider, PreparedImage};
    pub use crate::random::RandomBackend;
    pub use crate::service::PetClassifier;
    pub use petsnap_core::prelude::*;
}
