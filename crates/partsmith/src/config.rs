//! Extractor configuration.

use common::{PartsmithError, PartsmithResult};
use compositor::CompositorSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Extractor configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Directory receiving sprites and reports.
    pub output_dir: PathBuf,
    /// Whether sprite PNGs are written.
    pub write_sprites: bool,
    /// Whether JSON and text reports are written.
    pub write_reports: bool,
    /// Canvas mapping and tint tolerance.
    pub compositor: CompositorSettings,
}

impl ExtractorConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON configuration file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> PartsmithResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject settings the compositor cannot work with.
    pub fn validate(&self) -> PartsmithResult<()> {
        let settings = &self.compositor;
        if !settings.ratio.is_finite() || settings.ratio <= 0.0 {
            return Err(PartsmithError::config(format!(
                "ratio must be a positive number, got {}",
                settings.ratio
            )));
        }
        if !settings.tint_epsilon.is_finite() || settings.tint_epsilon < 0.0 {
            return Err(PartsmithError::config(format!(
                "tint_epsilon must not be negative, got {}",
                settings.tint_epsilon
            )));
        }
        Ok(())
    }

    /// Set output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set whether sprite PNGs are written.
    pub fn with_sprites(mut self, enabled: bool) -> Self {
        self.write_sprites = enabled;
        self
    }

    /// Set compositor settings.
    pub fn with_compositor(mut self, settings: CompositorSettings) -> Self {
        self.compositor = settings;
        self
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("extraction"),
            write_sprites: true,
            write_reports: true,
            compositor: CompositorSettings::default(),
        }
    }
}
