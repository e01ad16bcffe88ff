//! Part resolution and categorization.

use crate::graph::ObjectGraph;
use assets::{
    AssetError, AssetSource, ObjectId, ObjectRecord, RendererId, SpriteAsset, SpriteId,
    TransformId,
};
use common::{Diagnostic, Diagnostics, Tint, Vec2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Semantic grouping of a part, derived from its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartCategory {
    Body,
    Head,
    ArmLeft,
    ArmRight,
    Arms,
    Eyes,
    Mouth,
    Hair,
    Effects,
    Other,
}

/// Keyword rules, checked in order; the first match wins.
const CATEGORY_RULES: &[(&[&str], PartCategory)] = &[
    (&["body", "torso"], PartCategory::Body),
    (&["head", "face"], PartCategory::Head),
    (&["arml", "leftarm"], PartCategory::ArmLeft),
    (&["armr", "rightarm"], PartCategory::ArmRight),
    (&["arm"], PartCategory::Arms),
    (&["eye"], PartCategory::Eyes),
    (&["mouth"], PartCategory::Mouth),
    (&["hair"], PartCategory::Hair),
    (&["blend", "effect", "shadow"], PartCategory::Effects),
];

impl PartCategory {
    pub const ALL: [PartCategory; 10] = [
        PartCategory::Body,
        PartCategory::Head,
        PartCategory::ArmLeft,
        PartCategory::ArmRight,
        PartCategory::Arms,
        PartCategory::Eyes,
        PartCategory::Mouth,
        PartCategory::Hair,
        PartCategory::Effects,
        PartCategory::Other,
    ];

    /// Classify a part by case-insensitive keyword match on its name.
    pub fn categorize(name: &str) -> Self {
        let name = name.to_lowercase();
        CATEGORY_RULES
            .iter()
            .find(|(keywords, _)| keywords.iter().any(|keyword| name.contains(keyword)))
            .map(|(_, category)| *category)
            .unwrap_or(PartCategory::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PartCategory::Body => "body",
            PartCategory::Head => "head",
            PartCategory::ArmLeft => "arm_left",
            PartCategory::ArmRight => "arm_right",
            PartCategory::Arms => "arms",
            PartCategory::Eyes => "eyes",
            PartCategory::Mouth => "mouth",
            PartCategory::Hair => "hair",
            PartCategory::Effects => "effects",
            PartCategory::Other => "other",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|category| category.as_str() == name)
    }
}

impl fmt::Display for PartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A renderable fragment: one object joined with its transform and
/// renderer.
#[derive(Clone, Debug)]
pub struct CharacterPart {
    pub name: String,
    pub object_id: ObjectId,
    pub transform_id: TransformId,
    pub renderer_id: RendererId,
    /// Sprite referenced by the renderer, resolved or not.
    pub sprite_id: Option<SpriteId>,
    /// Present only when the reference resolved to real pixels.
    pub sprite: Option<Arc<SpriteAsset>>,
    pub position: Vec2,
    pub sorting_order: i32,
    pub category: PartCategory,
    pub tint: Tint,
    /// Whether `tint` differs from identity, i.e. pixels need correcting.
    pub tint_corrected: bool,
    pub active: bool,
    pub selected: bool,
}

impl CharacterPart {
    #[inline]
    pub fn has_sprite(&self) -> bool {
        self.sprite.is_some()
    }
}

/// Join every object with its transform and renderer.
///
/// Objects lacking either are left out. Sprite references that do not
/// resolve leave `sprite` empty and are reported; the part itself is kept.
/// Output follows object record order.
pub fn resolve_parts(
    graph: &ObjectGraph,
    source: &dyn AssetSource,
    tint_epsilon: f32,
    diagnostics: &mut Diagnostics,
) -> Vec<CharacterPart> {
    let objects: Vec<&ObjectRecord> = graph.objects().collect();

    let resolved: Vec<Option<(CharacterPart, Option<Diagnostic>)>> = objects
        .par_iter()
        .map(|object| resolve_part(graph, source, object, tint_epsilon))
        .collect();

    let mut parts = Vec::with_capacity(resolved.len());
    for (part, diagnostic) in resolved.into_iter().flatten() {
        if let Some(diagnostic) = diagnostic {
            diagnostics.push(diagnostic);
        }
        parts.push(part);
    }

    tracing::debug!(
        "Resolved {} parts from {} objects",
        parts.len(),
        graph.object_count()
    );

    parts
}

fn resolve_part(
    graph: &ObjectGraph,
    source: &dyn AssetSource,
    object: &ObjectRecord,
    tint_epsilon: f32,
) -> Option<(CharacterPart, Option<Diagnostic>)> {
    let transform = graph.transform_of(object.id)?;
    let renderer = graph.renderer_of(object.id)?;

    let (sprite, diagnostic) = match renderer.sprite {
        None => (None, None),
        Some(sprite_id) => match source.sprite(sprite_id) {
            Ok(sprite) => (Some(sprite), None),
            Err(AssetError::MissingSprite(_)) => (
                None,
                Some(Diagnostic::UnresolvedReference {
                    from: renderer.id.get(),
                    field: "sprite",
                    target: sprite_id.get(),
                }),
            ),
            Err(err) => (
                None,
                Some(Diagnostic::AssetLoadFailure {
                    sprite_id: sprite_id.get(),
                    part: object.name.clone(),
                    reason: err.to_string(),
                }),
            ),
        },
    };

    let part = CharacterPart {
        name: object.name.clone(),
        object_id: object.id,
        transform_id: transform.id,
        renderer_id: renderer.id,
        sprite_id: renderer.sprite,
        sprite,
        position: transform.local_position.truncate(),
        sorting_order: renderer.sorting_order,
        category: PartCategory::categorize(&object.name),
        tint: renderer.tint,
        tint_corrected: !renderer.tint.is_identity(tint_epsilon),
        active: object.active,
        selected: false,
    };

    Some((part, diagnostic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use assets::{MemorySource, RawRecord};
    use serde_json::json;

    fn sprite(id: u64, name: &str) -> SpriteAsset {
        SpriteAsset::from_rgba(SpriteId(id), name, 2, 2, vec![255; 16]).unwrap()
    }

    #[test]
    fn test_categorize() {
        assert_eq!(PartCategory::categorize("LeftArm_Shadow"), PartCategory::ArmLeft);
        assert_eq!(PartCategory::categorize("EyeBrow"), PartCategory::Eyes);
        assert_eq!(PartCategory::categorize("XYZ"), PartCategory::Other);
        assert_eq!(PartCategory::categorize("Torso"), PartCategory::Body);
        assert_eq!(PartCategory::categorize("FACE_base"), PartCategory::Head);
        assert_eq!(PartCategory::categorize("ArmR_01"), PartCategory::ArmRight);
        assert_eq!(PartCategory::categorize("Forearm"), PartCategory::Arms);
        assert_eq!(PartCategory::categorize("Mouth_Open"), PartCategory::Mouth);
        assert_eq!(PartCategory::categorize("Hair_Shadow"), PartCategory::Hair);
        assert_eq!(PartCategory::categorize("Cheek_Blend"), PartCategory::Effects);
        // "body" is checked before "head".
        assert_eq!(PartCategory::categorize("HeadBody"), PartCategory::Body);
    }

    #[test]
    fn test_category_names_round_trip() {
        for category in PartCategory::ALL {
            assert_eq!(PartCategory::from_name(category.as_str()), Some(category));
        }
        assert_eq!(PartCategory::from_name("ARM_LEFT"), Some(PartCategory::ArmLeft));
        assert_eq!(PartCategory::from_name("tail"), None);
    }

    #[test]
    fn test_one_part_per_complete_object() {
        let records = vec![
            object(1, "Body"),
            object(2, "NoRenderer"),
            object(3, "NoTransform"),
            object(4, "Head"),
            transform(10, 1, (0.5, -1.0), 0, &[]),
            transform(11, 2, (0.0, 0.0), 0, &[]),
            transform(12, 4, (0.0, 2.0), 0, &[]),
            renderer(20, 1, 100, 3),
            renderer(21, 3, 100, 0),
            renderer(22, 4, 101, 5),
        ];
        let source = MemorySource::new()
            .with_sprite(sprite(100, "body"))
            .with_sprite(sprite(101, "head"));

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let parts = resolve_parts(&graph, &source, 0.001, &mut diagnostics);

        let names: Vec<_> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Body", "Head"]);

        let body = &parts[0];
        assert_eq!(body.position, Vec2::new(0.5, -1.0));
        assert_eq!(body.sorting_order, 3);
        assert_eq!(body.category, PartCategory::Body);
        assert!(body.has_sprite());
        assert!(!body.tint_corrected);
        assert!(!body.selected);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_unresolved_sprite_keeps_part() {
        let records = vec![
            object(1, "Ghost"),
            object(2, "Blank"),
            transform(10, 1, (0.0, 0.0), 0, &[]),
            transform(11, 2, (0.0, 0.0), 0, &[]),
            renderer(20, 1, 404, 0),
            renderer(21, 2, 0, 0),
        ];
        let source = MemorySource::new();

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let parts = resolve_parts(&graph, &source, 0.001, &mut diagnostics);

        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| !p.has_sprite()));
        assert_eq!(parts[0].sprite_id, Some(SpriteId(404)));
        assert_eq!(parts[1].sprite_id, None);
        assert_eq!(
            diagnostics.iter().collect::<Vec<_>>(),
            [&Diagnostic::UnresolvedReference {
                from: 20,
                field: "sprite",
                target: 404,
            }]
        );
    }

    #[test]
    fn test_tint_flag() {
        let records = vec![
            object(1, "Cheek"),
            transform(10, 1, (0.0, 0.0), 0, &[]),
            RawRecord::new(
                20,
                "SpriteRenderer",
                json!({"owner": 1, "sprite": 0, "color": {"r": 1.0, "g": 0.8, "b": 0.8, "a": 0.5}}),
            ),
        ];

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let parts = resolve_parts(&graph, &MemorySource::new(), 0.001, &mut diagnostics);

        assert!(parts[0].tint_corrected);
        assert_eq!(parts[0].tint, Tint::new(1.0, 0.8, 0.8, 0.5));
    }
}
