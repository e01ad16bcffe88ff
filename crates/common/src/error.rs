//! Common error types.

use thiserror::Error;

/// Hard failures that abort an extraction run or a composite render.
///
/// Everything recoverable is reported through [`crate::Diagnostics`]
/// instead.
#[derive(Error, Debug)]
pub enum PartsmithError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Asset source error: {0}")]
    Source(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type PartsmithResult<T> = Result<T, PartsmithError>;

impl PartsmithError {
    pub fn asset_source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
