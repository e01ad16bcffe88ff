//! Object graph builder.
//!
//! Records are stored in slotmap arenas and addressed through id → key
//! tables built once per run. Records are never removed, so arena order is
//! record order.

use assets::{
    ObjectId, ObjectRecord, RawRecord, Record, RendererId, RendererRecord, TransformId,
    TransformRecord,
};
use common::{Diagnostic, Diagnostics};
use serde::Serialize;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use std::hash::Hash;

new_key_type! {
    struct ObjectKey;
    struct TransformKey;
    struct RendererKey;
}

/// Counters gathered while building a graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub objects: usize,
    pub transforms: usize,
    pub renderers: usize,
    /// Records whose type tag is outside the understood families.
    pub ignored: usize,
    /// Records dropped as malformed.
    pub malformed: usize,
    /// Records that replaced an earlier record with the same id.
    pub replaced: usize,
}

/// Identity-indexed records of one extraction run.
#[derive(Default)]
pub struct ObjectGraph {
    objects: SlotMap<ObjectKey, ObjectRecord>,
    transforms: SlotMap<TransformKey, TransformRecord>,
    renderers: SlotMap<RendererKey, RendererRecord>,

    object_index: HashMap<ObjectId, ObjectKey>,
    transform_index: HashMap<TransformId, TransformKey>,
    renderer_index: HashMap<RendererId, RendererKey>,

    transform_by_owner: HashMap<ObjectId, TransformKey>,
    renderer_by_owner: HashMap<ObjectId, RendererKey>,

    stats: GraphStats,
}

/// Insert or replace; a later record with the same id wins but keeps the
/// position of the first.
fn upsert<K, I, V>(arena: &mut SlotMap<K, V>, index: &mut HashMap<I, K>, id: I, value: V) -> bool
where
    K: slotmap::Key,
    I: Hash + Eq,
{
    match index.get(&id) {
        Some(&key) => {
            arena[key] = value;
            true
        }
        None => {
            let key = arena.insert(value);
            index.insert(id, key);
            false
        }
    }
}

impl ObjectGraph {
    /// Index raw records and resolve owner links.
    ///
    /// Unknown record types are ignored. Malformed records and dangling
    /// owner/parent references are reported and skipped; the build itself
    /// never fails.
    pub fn build(records: &[RawRecord], diagnostics: &mut Diagnostics) -> Self {
        let mut graph = Self::default();

        for raw in records {
            match raw.parse() {
                Ok(Some(record)) => graph.insert(record),
                Ok(None) => {
                    tracing::trace!("Ignoring record {} of type {}", raw.id, raw.type_name);
                    graph.stats.ignored += 1;
                }
                Err(err) => {
                    graph.stats.malformed += 1;
                    diagnostics.push(Diagnostic::MalformedRecord {
                        record_id: raw.id,
                        record_type: raw.type_name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        graph.link(diagnostics);

        graph.stats.objects = graph.objects.len();
        graph.stats.transforms = graph.transforms.len();
        graph.stats.renderers = graph.renderers.len();

        tracing::debug!(
            "Built object graph: {} objects, {} transforms, {} renderers",
            graph.stats.objects,
            graph.stats.transforms,
            graph.stats.renderers
        );

        graph
    }

    fn insert(&mut self, record: Record) {
        let replaced = match record {
            Record::Object(object) => {
                upsert(&mut self.objects, &mut self.object_index, object.id, object)
            }
            Record::Transform(transform) => upsert(
                &mut self.transforms,
                &mut self.transform_index,
                transform.id,
                transform,
            ),
            Record::Renderer(renderer) => upsert(
                &mut self.renderers,
                &mut self.renderer_index,
                renderer.id,
                renderer,
            ),
        };

        if replaced {
            self.stats.replaced += 1;
        }
    }

    /// Build the owner tables in one pass over each arena.
    fn link(&mut self, diagnostics: &mut Diagnostics) {
        for (key, transform) in &self.transforms {
            if !self.object_index.contains_key(&transform.owner) {
                diagnostics.push(Diagnostic::UnresolvedReference {
                    from: transform.id.get(),
                    field: "owner",
                    target: transform.owner.get(),
                });
                continue;
            }
            if self.transform_by_owner.contains_key(&transform.owner) {
                tracing::debug!(
                    "Object {} already has a transform; ignoring transform {}",
                    transform.owner,
                    transform.id
                );
                continue;
            }
            self.transform_by_owner.insert(transform.owner, key);

            if let Some(parent) = transform.parent {
                if !self.transform_index.contains_key(&parent) {
                    diagnostics.push(Diagnostic::UnresolvedReference {
                        from: transform.id.get(),
                        field: "parent",
                        target: parent.get(),
                    });
                }
            }
        }

        for (key, renderer) in &self.renderers {
            if !self.object_index.contains_key(&renderer.owner) {
                diagnostics.push(Diagnostic::UnresolvedReference {
                    from: renderer.id.get(),
                    field: "owner",
                    target: renderer.owner.get(),
                });
                continue;
            }
            if self.renderer_by_owner.contains_key(&renderer.owner) {
                tracing::debug!(
                    "Object {} already has a renderer; ignoring renderer {}",
                    renderer.owner,
                    renderer.id
                );
                continue;
            }
            self.renderer_by_owner.insert(renderer.owner, key);
        }
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }

    pub fn object(&self, id: ObjectId) -> Option<&ObjectRecord> {
        self.object_index.get(&id).map(|&key| &self.objects[key])
    }

    pub fn transform(&self, id: TransformId) -> Option<&TransformRecord> {
        self.transform_index.get(&id).map(|&key| &self.transforms[key])
    }

    pub fn renderer(&self, id: RendererId) -> Option<&RendererRecord> {
        self.renderer_index.get(&id).map(|&key| &self.renderers[key])
    }

    /// The transform attached to an object, if any.
    pub fn transform_of(&self, object: ObjectId) -> Option<&TransformRecord> {
        self.transform_by_owner
            .get(&object)
            .map(|&key| &self.transforms[key])
    }

    /// The renderer attached to an object, if any.
    pub fn renderer_of(&self, object: ObjectId) -> Option<&RendererRecord> {
        self.renderer_by_owner
            .get(&object)
            .map(|&key| &self.renderers[key])
    }

    /// Objects in record order.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.objects.values()
    }

    /// Transforms in record order.
    pub fn transforms(&self) -> impl Iterator<Item = &TransformRecord> {
        self.transforms.values()
    }

    /// Transforms that start a hierarchy: no parent, or a parent id that
    /// does not resolve.
    pub fn root_transforms(&self) -> impl Iterator<Item = &TransformRecord> {
        self.transforms.values().filter(|transform| match transform.parent {
            None => true,
            Some(parent) => !self.transform_index.contains_key(&parent),
        })
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn transform_count(&self) -> usize {
        self.transforms.len()
    }

    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }
}
