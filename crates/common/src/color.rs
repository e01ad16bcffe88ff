//! Color representation and manipulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color with 8-bit components and straight (non-premultiplied) alpha.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Read a color from a 4-byte RGBA pixel slice.
    #[inline]
    pub fn from_slice(px: &[u8]) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }

    #[inline]
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Composite `self` over `background` with the Porter-Duff "over"
    /// operator on straight alpha.
    pub fn blend_over(&self, background: Color) -> Color {
        if self.a == 255 {
            return *self;
        }
        if self.a == 0 {
            return background;
        }

        let fg_a = self.a as f32 / 255.0;
        let bg_a = background.a as f32 / 255.0;

        let out_a = fg_a + bg_a * (1.0 - fg_a);

        if out_a <= 0.0 {
            return Color::TRANSPARENT;
        }

        let blend = |fg: u8, bg: u8| -> u8 {
            let out = (fg as f32 * fg_a + bg as f32 * bg_a * (1.0 - fg_a)) / out_a;
            out.round().clamp(0.0, 255.0) as u8
        };

        Color::rgba(
            blend(self.r, background.r),
            blend(self.g, background.g),
            blend(self.b, background.b),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        )
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Multiplicative RGBA tint. Each factor nominally lies in `[0, 2]`;
/// `1.0` leaves the channel unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    #[serde(default = "one")]
    pub r: f32,
    #[serde(default = "one")]
    pub g: f32,
    #[serde(default = "one")]
    pub b: f32,
    #[serde(default = "one")]
    pub a: f32,
}

fn one() -> f32 {
    1.0
}

impl Tint {
    pub const IDENTITY: Tint = Tint::new(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Whether every channel is within `epsilon` of `1.0`.
    pub fn is_identity(&self, epsilon: f32) -> bool {
        self.channels().iter().all(|c| (c - 1.0).abs() < epsilon)
    }

    #[inline]
    pub fn channels(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse `r,g,b,a` (alpha optional).
    pub fn parse(text: &str) -> Option<Self> {
        let values = text
            .split(',')
            .map(|part| part.trim().parse::<f32>().ok())
            .collect::<Option<Vec<_>>>()?;

        match values.as_slice() {
            [r, g, b] => Some(Self::new(*r, *g, *b, 1.0)),
            [r, g, b, a] => Some(Self::new(*r, *g, *b, *a)),
            _ => None,
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3}, {:.3})", self.r, self.g, self.b, self.a)
    }
}
