//! Configuration for the classifier service and its backend

use crate::backend::InferenceBackend;
use crate::random::RandomBackend;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the classifier service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Initialize the backend on first classification instead of
    /// requiring an explicit `load_model` call
    #[serde(default = "default_true")]
    pub auto_initialize: bool,

    /// Inference backend selection
    #[serde(default)]
    pub backend: BackendSpec,
}

/// Backend specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendSpec {
    /// Random placeholder predictions
    Random {
        /// Simulated inference latency
        #[serde(default)]
        latency_ms: u64,

        /// Simulated setup latency
        #[serde(default)]
        init_latency_ms: u64,
    },
}

impl Default for BackendSpec {
    fn default() -> Self {
        Self::Random {
            latency_ms: 0,
            init_latency_ms: 0,
        }
    }
}

impl BackendSpec {
    /// Override the simulated inference latency
    pub fn set_latency_ms(&mut self, value: u64) {
        match self {
            Self::Random { latency_ms, .. } => *latency_ms = value,
        }
    }

    /// Instantiate the backend
    pub fn build(&self) -> Arc<dyn InferenceBackend> {
        match self {
            Self::Random {
                latency_ms,
                init_latency_ms,
            } => Arc::new(
                RandomBackend::new()
                    .with_latency(Duration::from_millis(*latency_ms))
                    .with_init_latency(Duration::from_millis(*init_latency_ms)),
            ),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            auto_initialize: true,
            backend: BackendSpec::default(),
        }
    }
}

impl ClassifierConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> petsnap_core::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| {
            petsnap_core::Error::config(format!(
                "failed to parse classifier config {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Instantiate the configured backend
    pub fn build_backend(&self) -> Arc<dyn InferenceBackend> {
        self.backend.build()
    }
}

fn default_true() -> bool {
    true
}
