//! Asset-source boundary.
//!
//! The container decoder lives outside this workspace. What it hands over
//! is modelled here: raw typed records joined by opaque numeric ids, and a
//! sprite lookup yielding decoded RGBA pixels.

pub mod error;
pub mod ids;
pub mod record;
pub mod source;
pub mod sprite;

pub use error::{AssetError, AssetResult, RecordError};
pub use ids::{ObjectId, RendererId, SpriteId, TransformId};
pub use record::{ObjectRecord, RawRecord, Record, RecordKind, RendererRecord, TransformRecord};
pub use source::{AssetSource, DirectorySource, Manifest, MemorySource, SpriteEntry};
pub use sprite::SpriteAsset;
