//! Color tint correction.
//!
//! Multiplies each 8-bit channel directly by its factor. There is no
//! linear-light conversion; results match a plain channel scale followed by
//! clamping and truncation to `u8`.

use common::Tint;
use image::RgbaImage;

#[inline]
fn scale(value: u8, factor: f32) -> u8 {
    (value as f32 * factor).clamp(0.0, 255.0) as u8
}

/// Return a tinted copy of an RGBA buffer. The input is left untouched.
pub fn apply_tint(pixels: &[u8], tint: Tint) -> Vec<u8> {
    let factors = tint.channels();
    let mut out = Vec::with_capacity(pixels.len());

    for px in pixels.chunks_exact(4) {
        out.extend(px.iter().zip(factors).map(|(&value, factor)| scale(value, factor)));
    }

    out
}

/// Image-level convenience around [`apply_tint`].
pub fn tint_image(image: &RgbaImage, tint: Tint) -> RgbaImage {
    let pixels = apply_tint(image.as_raw(), tint);
    RgbaImage::from_raw(image.width(), image.height(), pixels)
        .unwrap_or_else(|| RgbaImage::new(image.width(), image.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const PIXELS: [u8; 12] = [200, 100, 50, 255, 255, 1, 0, 128, 7, 8, 9, 0];

    #[test]
    fn test_identity_is_pixel_identical() {
        assert_eq!(apply_tint(&PIXELS, Tint::IDENTITY), PIXELS.to_vec());
    }

    #[test]
    fn test_halves_red_only() {
        let out = apply_tint(&PIXELS, Tint::new(0.5, 1.0, 1.0, 1.0));
        assert_eq!(out, vec![100, 100, 50, 255, 127, 1, 0, 128, 3, 8, 9, 0]);
    }

    #[test]
    fn test_clamps() {
        let out = apply_tint(&PIXELS, Tint::new(2.0, -1.0, 1.0, 1.5));
        assert_eq!(&out[..4], &[255, 0, 50, 255]);
        assert_eq!(&out[4..8], &[255, 0, 0, 192]);
    }

    #[test]
    fn test_input_untouched() {
        let input = PIXELS.to_vec();
        let _ = apply_tint(&input, Tint::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(input, PIXELS.to_vec());
    }

    #[test]
    fn test_tint_image() {
        let image = RgbaImage::from_pixel(2, 3, Rgba([100, 100, 100, 200]));
        let tinted = tint_image(&image, Tint::new(1.0, 0.5, 1.0, 0.5));
        assert_eq!(tinted.dimensions(), (2, 3));
        assert_eq!(tinted.get_pixel(1, 2), &Rgba([100, 50, 100, 100]));
        assert_eq!(image.get_pixel(1, 2), &Rgba([100, 100, 100, 200]));
    }
}
