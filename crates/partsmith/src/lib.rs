//! Partsmith - layered character reconstruction from unpacked game assets.
//!
//! This crate ties the pipeline together:
//! - object graph building and part resolution
//! - hierarchy assembly for inspection
//! - sprite export with tint correction
//! - JSON and text reports
//! - depth-sorted compositing of a part selection

pub mod config;
pub mod engine;
pub mod overrides;
pub mod report;

pub use config::ExtractorConfig;
pub use engine::{ExtractionMode, ExtractionResult, Extractor};

/// Partsmith version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
