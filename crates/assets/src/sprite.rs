//! Decoded sprite images.

use crate::error::{AssetError, AssetResult};
use crate::ids::SpriteId;
use image::RgbaImage;

/// A sprite image owned by the asset source.
///
/// Consumers only read the pixels; tinting always works on a copy.
#[derive(Clone, Debug)]
pub struct SpriteAsset {
    pub id: SpriteId,
    pub name: String,
    image: RgbaImage,
}

impl SpriteAsset {
    pub fn new(id: SpriteId, name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            id,
            name: name.into(),
            image,
        }
    }

    /// Build from a raw straight-alpha RGBA buffer.
    pub fn from_rgba(
        id: SpriteId,
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> AssetResult<Self> {
        let len = pixels.len();
        let image = RgbaImage::from_raw(width, height, pixels).ok_or(AssetError::InvalidPixels {
            id,
            width,
            height,
            len,
        })?;
        Ok(Self::new(id, name, image))
    }

    /// Decode an encoded image (PNG or any format the `image` crate knows).
    pub fn decode(id: SpriteId, name: impl Into<String>, bytes: &[u8]) -> AssetResult<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::new(id, name, image))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes, row-major, 4 bytes per pixel.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}
