//! CLI configuration

use petsnap_classifier::ClassifierConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Classifier service settings
    #[serde(flatten)]
    pub classifier: ClassifierConfig,

    /// How results are printed
    #[serde(default)]
    pub output: OutputFormat,
}

impl CliConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &crate::Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(latency_ms) = cli.latency_ms {
            config.classifier.backend.set_latency_ms(latency_ms);
        }

        if cli.json {
            config.output = OutputFormat::Json;
        }

        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per image
    #[default]
    Text,
    /// One JSON object per line
    Json,
}
