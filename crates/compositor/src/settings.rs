//! Compositor settings.

use common::CanvasSize;
use serde::{Deserialize, Serialize};

/// Runtime parameters of canvas sizing and compositing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorSettings {
    /// Pixels per source unit.
    pub ratio: f32,
    /// Total padding added to each canvas dimension.
    pub margin: u32,
    /// Minimum canvas width.
    pub min_width: u32,
    /// Minimum canvas height.
    pub min_height: u32,
    /// Per-channel tolerance under which a tint counts as identity.
    pub tint_epsilon: f32,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            ratio: 100.0,
            margin: 400,
            min_width: 2000,
            min_height: 4000,
            tint_epsilon: 0.001,
        }
    }
}

impl CompositorSettings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pixels per source unit.
    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }

    /// Set total canvas margin.
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Set minimum canvas size.
    pub fn with_min_size(mut self, width: u32, height: u32) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    pub fn min_size(&self) -> CanvasSize {
        CanvasSize::new(self.min_width, self.min_height)
    }
}
