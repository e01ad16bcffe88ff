//! Canvas sizing.

use crate::settings::CompositorSettings;
use common::CanvasSize;
use scene::CharacterPart;
use std::collections::HashSet;

/// Pixel bounds of a sprite centred on its part position, relative to the
/// canvas centre with Y pointing down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Extent {
    /// Extent of a part's sprite; `None` when there is nothing to measure.
    pub fn of_part(part: &CharacterPart, ratio: f32) -> Option<Self> {
        let sprite = part.sprite.as_ref()?;
        if sprite.width() == 0 || sprite.height() == 0 {
            return None;
        }

        let ratio = ratio as f64;
        let x = part.position.x as f64 * ratio;
        let y = part.position.y as f64 * -ratio;
        let half_w = (sprite.width() / 2) as f64;
        let half_h = (sprite.height() / 2) as f64;

        Some(Self {
            left: x - half_w,
            top: y - half_h,
            right: x + half_w,
            bottom: y + half_h,
        })
    }

    pub fn union(self, other: Extent) -> Extent {
        Extent {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

fn padded(span: f64, margin: u32, minimum: u32) -> u32 {
    let size = (span.trunc() + margin as f64).clamp(0.0, u32::MAX as f64) as u32;
    size.max(minimum)
}

/// Smallest canvas enclosing every selected part's sprite plus the margin,
/// never below the configured minimum.
///
/// Parts without a measurable sprite are left out of the bounds. An empty
/// selection yields the minimum size.
pub fn canvas_size(
    parts: &[CharacterPart],
    selected: &HashSet<String>,
    settings: &CompositorSettings,
) -> CanvasSize {
    if selected.is_empty() {
        return settings.min_size();
    }

    let bounds = parts
        .iter()
        .filter(|part| selected.contains(&part.name))
        .filter_map(|part| Extent::of_part(part, settings.ratio))
        .reduce(Extent::union);

    let Some(bounds) = bounds else {
        return settings.min_size();
    };

    CanvasSize::new(
        padded(bounds.width(), settings.margin, settings.min_width),
        padded(bounds.height(), settings.margin, settings.min_height),
    )
}
