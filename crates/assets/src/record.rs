//! Raw and typed records.

use crate::error::RecordError;
use crate::ids::{ObjectId, RendererId, SpriteId, TransformId};
use common::{Quat, Tint, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A record as exposed by the asset source: an id, a declared type tag and
/// a loosely typed payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Record families the core understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Object,
    Transform,
    Renderer,
}

impl RecordKind {
    /// Map a declared type tag to a record family. Unknown tags yield `None`.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "object" | "gameobject" => Some(Self::Object),
            "transform" => Some(Self::Transform),
            "renderer" | "spriterenderer" => Some(Self::Renderer),
            _ => None,
        }
    }
}

/// A named node of the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectRecord {
    pub id: ObjectId,
    pub name: String,
    pub component_refs: Vec<u64>,
    pub active: bool,
}

/// Local placement of an object and its links into the transform tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformRecord {
    pub id: TransformId,
    pub owner: ObjectId,
    pub local_position: Vec3,
    pub local_rotation: Quat,
    pub local_scale: Vec3,
    pub children: SmallVec<[TransformId; 4]>,
    /// `None` for root transforms.
    pub parent: Option<TransformId>,
}

/// Sprite drawing component of an object.
#[derive(Clone, Debug, PartialEq)]
pub struct RendererRecord {
    pub id: RendererId,
    pub owner: ObjectId,
    pub sprite: Option<SpriteId>,
    pub sorting_order: i32,
    pub tint: Tint,
}

/// A successfully interpreted record.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    Object(ObjectRecord),
    Transform(TransformRecord),
    Renderer(RendererRecord),
}

#[derive(Deserialize)]
struct ObjectFields {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    components: Vec<u64>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Deserialize)]
struct TransformFields {
    owner: u64,
    #[serde(default)]
    position: Vec3,
    #[serde(default)]
    rotation: Quat,
    #[serde(default = "default_scale")]
    scale: Vec3,
    #[serde(default)]
    children: Vec<u64>,
    #[serde(default)]
    parent: u64,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

#[derive(Deserialize)]
struct RendererFields {
    owner: u64,
    #[serde(default)]
    sprite: u64,
    #[serde(default)]
    sorting_order: i32,
    #[serde(default)]
    color: Tint,
}

impl RawRecord {
    pub fn new(id: u64, type_name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            data,
        }
    }

    pub fn kind(&self) -> Option<RecordKind> {
        RecordKind::from_type_name(&self.type_name)
    }

    /// Interpret the payload according to the declared type.
    ///
    /// Returns `Ok(None)` for type tags outside the understood families.
    pub fn parse(&self) -> Result<Option<Record>, RecordError> {
        let Some(kind) = self.kind() else {
            return Ok(None);
        };
        if self.id == 0 {
            return Err(RecordError::ReservedId);
        }

        let empty = serde_json::Value::Object(Default::default());
        let data = if self.data.is_null() { &empty } else { &self.data };

        let record = match kind {
            RecordKind::Object => {
                let fields = ObjectFields::deserialize(data)?;
                Record::Object(ObjectRecord {
                    id: ObjectId(self.id),
                    name: fields
                        .name
                        .unwrap_or_else(|| format!("GameObject_{}", self.id)),
                    component_refs: fields.components,
                    active: fields.active,
                })
            }
            RecordKind::Transform => {
                let fields = TransformFields::deserialize(data)?;
                Record::Transform(TransformRecord {
                    id: TransformId(self.id),
                    owner: ObjectId::from_raw(fields.owner).ok_or(RecordError::MissingOwner)?,
                    local_position: fields.position,
                    local_rotation: fields.rotation,
                    local_scale: fields.scale,
                    children: fields
                        .children
                        .into_iter()
                        .filter_map(TransformId::from_raw)
                        .collect(),
                    parent: TransformId::from_raw(fields.parent),
                })
            }
            RecordKind::Renderer => {
                let fields = RendererFields::deserialize(data)?;
                Record::Renderer(RendererRecord {
                    id: RendererId(self.id),
                    owner: ObjectId::from_raw(fields.owner).ok_or(RecordError::MissingOwner)?,
                    sprite: SpriteId::from_raw(fields.sprite),
                    sorting_order: fields.sorting_order,
                    tint: fields.color,
                })
            }
        };

        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object_defaults() {
        let raw = RawRecord::new(5, "GameObject", serde_json::Value::Null);
        let Some(Record::Object(object)) = raw.parse().unwrap() else {
            panic!("expected object record");
        };
        assert_eq!(object.name, "GameObject_5");
        assert!(object.active);
        assert!(object.component_refs.is_empty());
    }

    #[test]
    fn test_parse_transform() {
        let raw = RawRecord::new(
            10,
            "transform",
            json!({
                "owner": 5,
                "position": {"x": 0.5, "y": -1.0, "z": 2.0},
                "children": [11, 0, 12],
                "parent": 0
            }),
        );
        let Some(Record::Transform(transform)) = raw.parse().unwrap() else {
            panic!("expected transform record");
        };
        assert_eq!(transform.owner, ObjectId(5));
        assert_eq!(transform.local_position, Vec3::new(0.5, -1.0, 2.0));
        assert_eq!(transform.local_scale, Vec3::ONE);
        assert_eq!(transform.local_rotation, Quat::IDENTITY);
        assert_eq!(transform.children.as_slice(), &[TransformId(11), TransformId(12)]);
        assert_eq!(transform.parent, None);
    }

    #[test]
    fn test_parse_renderer() {
        let raw = RawRecord::new(
            20,
            "SpriteRenderer",
            json!({"owner": 5, "sprite": 0, "sorting_order": -3, "color": {"r": 0.5}}),
        );
        let Some(Record::Renderer(renderer)) = raw.parse().unwrap() else {
            panic!("expected renderer record");
        };
        assert_eq!(renderer.sprite, None);
        assert_eq!(renderer.sorting_order, -3);
        assert_eq!(renderer.tint, Tint::new(0.5, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_unknown_type_is_ignored() {
        let raw = RawRecord::new(1, "MonoBehaviour", json!({"anything": true}));
        assert!(raw.parse().unwrap().is_none());
    }

    #[test]
    fn test_malformed_records() {
        let missing_owner = RawRecord::new(1, "transform", json!({"children": []}));
        assert!(missing_owner.parse().is_err());

        let zero_owner = RawRecord::new(1, "renderer", json!({"owner": 0}));
        assert!(matches!(zero_owner.parse(), Err(RecordError::MissingOwner)));

        let wrong_type = RawRecord::new(1, "object", json!({"name": 12}));
        assert!(wrong_type.parse().is_err());

        let reserved = RawRecord::new(0, "object", json!({}));
        assert!(matches!(reserved.parse(), Err(RecordError::ReservedId)));

        let not_a_map = RawRecord::new(1, "object", json!("text"));
        assert!(not_a_map.parse().is_err());
    }
}
