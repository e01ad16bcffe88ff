//! Depth-sorted sprite compositing.
//!
//! Paints a selection of character parts onto one straight-alpha RGBA
//! canvas:
//! - canvas sizing from the selected sprites' extents
//! - per-part tint correction on private pixel copies
//! - stable back-to-front ordering with caller overrides
//! - "over" blending for translucent sprites, direct copy for opaque ones

pub mod buffer;
pub mod canvas;
pub mod compositor;
pub mod layer;
pub mod settings;
pub mod tint;

pub use self::compositor::{CompositeOutput, CompositeRequest, Compositor};
pub use buffer::PixelBuffer;
pub use canvas::canvas_size;
pub use layer::Layer;
pub use settings::CompositorSettings;
pub use tint::{apply_tint, tint_image};

#[cfg(test)]
mod test_support;
