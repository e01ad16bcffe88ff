//! Non-fatal diagnostics channel.
//!
//! Recoverable conditions never abort an extraction run or a render. They
//! are logged when recorded and handed back to the caller alongside the
//! result.

use serde::Serialize;
use thiserror::Error;

/// A recoverable condition encountered while extracting or compositing.
#[derive(Error, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A raw record could not be interpreted as its declared type.
    #[error("malformed {record_type} record {record_id}: {reason}")]
    MalformedRecord {
        record_id: u64,
        record_type: String,
        reason: String,
    },

    /// A reference field points at a record that does not exist.
    #[error("{field} of record {from} references unknown id {target}")]
    UnresolvedReference {
        from: u64,
        field: &'static str,
        target: u64,
    },

    /// Pixel data for a sprite could not be obtained.
    #[error("sprite {sprite_id} for part '{part}' unavailable: {reason}")]
    AssetLoadFailure {
        sprite_id: u64,
        part: String,
        reason: String,
    },

    /// A transform was reached twice during one hierarchy traversal.
    #[error("transform {transform_id} closes a cycle under root {root_id}")]
    CyclicHierarchy { transform_id: u64, root_id: u64 },

    /// A transform lies deeper than the hierarchy depth limit.
    #[error("transform {transform_id} under root {root_id} exceeds hierarchy depth {max_depth}")]
    HierarchyTooDeep {
        transform_id: u64,
        root_id: u64,
        max_depth: u32,
    },
}

/// Ordered collection of diagnostics.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Append diagnostics gathered elsewhere, logging each.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.push(diagnostic);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count entries matching a predicate.
    pub fn count(&self, predicate: impl Fn(&Diagnostic) -> bool) -> usize {
        self.entries.iter().filter(|d| predicate(d)).count()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::CyclicHierarchy {
            transform_id: 3,
            root_id: 1,
        });
        diagnostics.extend([Diagnostic::UnresolvedReference {
            from: 7,
            field: "sprite",
            target: 99,
        }]);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.count(|d| matches!(d, Diagnostic::UnresolvedReference { .. })),
            1
        );
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::CyclicHierarchy { transform_id: 3, .. })
        ));
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::UnresolvedReference {
            from: 7,
            field: "sprite",
            target: 99,
        };
        assert_eq!(diagnostic.to_string(), "sprite of record 7 references unknown id 99");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let diagnostic = Diagnostic::CyclicHierarchy {
            transform_id: 3,
            root_id: 1,
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "cyclic_hierarchy");
        assert_eq!(json["transform_id"], 3);
    }
}
