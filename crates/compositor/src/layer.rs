//! Paint-ready sprite layers.

use crate::buffer::{PaintMode, PixelBuffer};
use crate::settings::CompositorSettings;
use crate::tint::apply_tint;
use common::{CanvasSize, Tint, Vec2};
use scene::CharacterPart;
use std::borrow::Cow;

/// Map a part position to canvas pixels. Y is flipped; the origin of the
/// source space sits at the canvas centre.
pub fn screen_position(position: Vec2, canvas: CanvasSize, ratio: f32) -> (i64, i64) {
    let ratio = ratio as f64;
    let center_x = (canvas.width / 2) as f64;
    let center_y = (canvas.height / 2) as f64;

    (
        (position.x as f64 * ratio + center_x).round() as i64,
        (position.y as f64 * -ratio + center_y).round() as i64,
    )
}

/// One selected part, placed and (if needed) tinted, ready to paint.
#[derive(Clone, Debug)]
pub struct Layer<'a> {
    pub name: &'a str,
    pub depth: i32,
    pub width: u32,
    pub height: u32,
    /// Top-left corner on the canvas.
    pub origin: (i64, i64),
    /// Whether the pixels are a tinted copy.
    pub tinted: bool,
    pixels: Cow<'a, [u8]>,
    translucent: bool,
}

impl<'a> Layer<'a> {
    /// Place a part's sprite on a canvas of the given size.
    ///
    /// Pixels are borrowed from the sprite unless `tint` differs from
    /// identity, in which case a private tinted copy is made. Returns
    /// `None` for parts without a sprite.
    pub fn prepare(
        part: &'a CharacterPart,
        depth: i32,
        tint: Tint,
        canvas: CanvasSize,
        settings: &CompositorSettings,
    ) -> Option<Self> {
        let sprite = part.sprite.as_deref()?;
        let (width, height) = (sprite.width(), sprite.height());

        let tinted = !tint.is_identity(settings.tint_epsilon);
        let pixels = if tinted {
            Cow::Owned(apply_tint(sprite.pixels(), tint))
        } else {
            Cow::Borrowed(sprite.pixels())
        };

        let translucent = pixels.chunks_exact(4).any(|px| px[3] != 255);

        let (screen_x, screen_y) = screen_position(part.position, canvas, settings.ratio);
        let origin = (
            screen_x - (width / 2) as i64,
            screen_y - (height / 2) as i64,
        );

        Some(Self {
            name: &part.name,
            depth,
            width,
            height,
            origin,
            tinted,
            pixels,
            translucent,
        })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Whether any pixel has alpha below 255.
    pub fn is_translucent(&self) -> bool {
        self.translucent
    }

    /// Fully opaque layers are copied; anything else is blended.
    pub fn paint_mode(&self) -> PaintMode {
        if self.translucent {
            PaintMode::Over
        } else {
            PaintMode::Copy
        }
    }

    pub fn paint_onto(&self, canvas: &mut PixelBuffer) {
        canvas.paint(&self.pixels, self.width, self.height, self.origin, self.paint_mode());
    }
}
