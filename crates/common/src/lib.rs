//! Common utilities and types shared by the partsmith crates.

pub mod color;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod progress;

pub use color::{Color, Tint};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{PartsmithError, PartsmithResult};
pub use geometry::{CanvasSize, Quat, Vec2, Vec3};
pub use progress::{Progress, ProgressFn};
