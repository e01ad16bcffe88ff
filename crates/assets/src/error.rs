//! Asset errors.

use crate::ids::SpriteId;
use common::PartsmithError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain data from an asset source.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode sprite image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("sprite {0} not found")]
    MissingSprite(SpriteId),

    #[error("sprite {id} has invalid pixel buffer ({len} bytes for {width}x{height})")]
    InvalidPixels {
        id: SpriteId,
        width: u32,
        height: u32,
        len: usize,
    },
}

pub type AssetResult<T> = Result<T, AssetError>;

impl From<AssetError> for PartsmithError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::Io { source, .. } => PartsmithError::Io(source),
            AssetError::Decode(err) => PartsmithError::Image(err),
            AssetError::Manifest(err) => PartsmithError::Json(err),
            other => PartsmithError::asset_source(other.to_string()),
        }
    }
}

/// A raw record that cannot be interpreted as its declared type.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record id 0 is reserved")]
    ReservedId,

    #[error("owner reference is required")]
    MissingOwner,

    #[error("{0}")]
    Fields(#[from] serde_json::Error),
}
