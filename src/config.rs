use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::features::EnvelopeConfig;
use crate::spectrogram::SpectrogramConfig;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub schema_version: u32,

    // Envelope grid
    pub segment_count: usize,
    pub part_count: usize,

    /// Token marking a file as positive-class when it appears in the name
    pub label_token: String,

    /// Default output file for feature lines (stdout when absent)
    pub output_path: Option<PathBuf>,

    // Spectrogram tuning
    pub spectrogram: SpectrogramConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: 1,
            segment_count: 5,
            part_count: 16,
            label_token: "1_".to_string(),
            output_path: None,
            spectrogram: SpectrogramConfig::default(),
        }
    }
}

impl Config {
    /// Load config from file, or create default
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Get the default config directory
    pub fn default_config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".snore-features"))
    }

    /// Get the default config file path
    pub fn default_config_path() -> Result<PathBuf> {
        Ok(Self::default_config_dir()?.join("config.json"))
    }

    /// The envelope grid portion of this config
    pub fn envelope(&self) -> EnvelopeConfig {
        EnvelopeConfig {
            segment_count: self.segment_count,
            part_count: self.part_count,
        }
    }
}
