//! Scene reconstruction.
//!
//! Turns flat, id-linked records into:
//! - an indexed object graph
//! - a flat list of renderable character parts
//! - a rooted transform hierarchy for inspection

pub mod graph;
pub mod hierarchy;
pub mod part;

pub use graph::{GraphStats, ObjectGraph};
pub use hierarchy::{assemble_hierarchy, HierarchyNode, MAX_HIERARCHY_DEPTH};
pub use part::{resolve_parts, CharacterPart, PartCategory};

#[cfg(test)]
mod test_support;
