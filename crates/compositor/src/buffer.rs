//! Canvas pixel buffer.

use common::{CanvasSize, Color, PartsmithResult};
use rayon::prelude::*;
use std::path::Path;

/// How source pixels are combined with the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintMode {
    /// Overwrite destination pixels. Only equivalent to `Over` for fully
    /// opaque sources.
    Copy,
    /// Porter-Duff "over" on straight alpha.
    Over,
}

/// Intersection of a placed sprite with the canvas, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    dst_x: usize,
    dst_y: usize,
    src_x: usize,
    src_y: usize,
    cols: usize,
    rows: usize,
}

/// Straight-alpha RGBA pixel buffer, origin at the top-left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize * 4;
        Self {
            width,
            height,
            data: vec![0; size],
        }
    }

    pub fn with_size(size: CanvasSize) -> Self {
        Self::new(size.width, size.height)
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }

    /// Fill with a color.
    pub fn fill(&mut self, color: Color) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color.to_array());
        }
    }

    /// Get pixel at position.
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            return Color::TRANSPARENT;
        }

        let offset = self.offset(x, y);
        Color::from_slice(&self.data[offset..offset + 4])
    }

    /// Set pixel at position.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        let offset = self.offset(x, y);
        self.data[offset..offset + 4].copy_from_slice(&color.to_array());
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Whether every pixel is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    fn clip(&self, origin: (i64, i64), width: u32, height: u32) -> Option<Span> {
        let left = origin.0.max(0);
        let top = origin.1.max(0);
        let right = (origin.0 + width as i64).min(self.width as i64);
        let bottom = (origin.1 + height as i64).min(self.height as i64);

        if left >= right || top >= bottom {
            return None;
        }

        Some(Span {
            dst_x: left as usize,
            dst_y: top as usize,
            src_x: (left - origin.0) as usize,
            src_y: (top - origin.1) as usize,
            cols: (right - left) as usize,
            rows: (bottom - top) as usize,
        })
    }

    /// Paint an RGBA image with its top-left corner at `origin`.
    ///
    /// Parts falling outside the canvas are clipped. Rows are processed in
    /// parallel; callers serialize successive paints.
    pub fn paint(&mut self, pixels: &[u8], width: u32, height: u32, origin: (i64, i64), mode: PaintMode) {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);

        let Some(span) = self.clip(origin, width, height) else {
            return;
        };

        let stride = self.width as usize * 4;
        let src_stride = width as usize * 4;

        self.data
            .par_chunks_exact_mut(stride)
            .skip(span.dst_y)
            .take(span.rows)
            .enumerate()
            .for_each(|(row, dst_row)| {
                let src_start = (span.src_y + row) * src_stride + span.src_x * 4;
                let src = &pixels[src_start..src_start + span.cols * 4];
                let dst = &mut dst_row[span.dst_x * 4..(span.dst_x + span.cols) * 4];

                match mode {
                    PaintMode::Copy => dst.copy_from_slice(src),
                    PaintMode::Over => {
                        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                            let out = Color::from_slice(s).blend_over(Color::from_slice(d));
                            d.copy_from_slice(&out.to_array());
                        }
                    }
                }
            });
    }

    /// Get as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Encode as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> PartsmithResult<()> {
        image::save_buffer_with_format(
            path.as_ref(),
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )?;
        Ok(())
    }
}
