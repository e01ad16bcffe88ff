//! Transform hierarchy assembly.

use crate::graph::ObjectGraph;
use assets::{ObjectId, TransformId, TransformRecord};
use common::{Diagnostic, Diagnostics, Vec2};
use serde::Serialize;
use std::collections::HashSet;

/// Deepest level a hierarchy node may sit at. Roots are level 0.
pub const MAX_HIERARCHY_DEPTH: u32 = 256;

/// One transform of the assembled hierarchy. Inspection output only.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub name: String,
    pub object_id: ObjectId,
    pub transform_id: TransformId,
    pub depth: u32,
    pub position: Vec2,
    /// Whether the owning object has a renderer.
    pub has_sprite: bool,
    pub sorting_order: i32,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(HierarchyNode::node_count).sum::<usize>()
    }

    /// Visit the subtree depth-first, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a HierarchyNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Build one tree per root transform, in record order.
///
/// Child ids that do not resolve are skipped. A child that is already one
/// of its own ancestors is reported as a cycle and not descended into.
/// Children below [`MAX_HIERARCHY_DEPTH`] are reported and dropped.
pub fn assemble_hierarchy(graph: &ObjectGraph, diagnostics: &mut Diagnostics) -> Vec<HierarchyNode> {
    graph
        .root_transforms()
        .map(|root| {
            let mut ancestors = HashSet::new();
            ancestors.insert(root.id);
            build_node(graph, root, 0, root.id, &mut ancestors, diagnostics)
        })
        .collect()
}

fn build_node(
    graph: &ObjectGraph,
    transform: &TransformRecord,
    depth: u32,
    root_id: TransformId,
    ancestors: &mut HashSet<TransformId>,
    diagnostics: &mut Diagnostics,
) -> HierarchyNode {
    let renderer = graph.renderer_of(transform.owner);

    let mut node = HierarchyNode {
        name: graph
            .object(transform.owner)
            .map(|object| object.name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        object_id: transform.owner,
        transform_id: transform.id,
        depth,
        position: transform.local_position.truncate(),
        has_sprite: renderer.is_some(),
        sorting_order: renderer.map_or(0, |renderer| renderer.sorting_order),
        children: Vec::with_capacity(transform.children.len()),
    };

    for &child_id in &transform.children {
        let Some(child) = graph.transform(child_id) else {
            diagnostics.push(Diagnostic::UnresolvedReference {
                from: transform.id.get(),
                field: "children",
                target: child_id.get(),
            });
            continue;
        };

        if !ancestors.insert(child_id) {
            diagnostics.push(Diagnostic::CyclicHierarchy {
                transform_id: child_id.get(),
                root_id: root_id.get(),
            });
            continue;
        }

        if depth >= MAX_HIERARCHY_DEPTH {
            diagnostics.push(Diagnostic::HierarchyTooDeep {
                transform_id: child_id.get(),
                root_id: root_id.get(),
                max_depth: MAX_HIERARCHY_DEPTH,
            });
        } else {
            node.children
                .push(build_node(graph, child, depth + 1, root_id, ancestors, diagnostics));
        }
        ancestors.remove(&child_id);
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn test_builds_nested_tree() {
        let records = vec![
            object(1, "Root"),
            object(2, "Body"),
            object(3, "Head"),
            object(4, "Prop"),
            transform(10, 1, (0.0, 0.0), 0, &[11]),
            transform(11, 2, (0.0, 1.0), 10, &[12]),
            transform(12, 3, (0.0, 2.5), 11, &[]),
            transform(13, 4, (3.0, 0.0), 0, &[]),
            renderer(20, 2, 100, 4),
        ];

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let roots = assemble_hierarchy(&graph, &mut diagnostics);

        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].name, "Root");
        assert_eq!(roots[1].name, "Prop");
        assert_eq!(roots[0].node_count(), 3);

        let body = &roots[0].children[0];
        assert_eq!(body.depth, 1);
        assert!(body.has_sprite);
        assert_eq!(body.sorting_order, 4);

        let head = &body.children[0];
        assert_eq!(head.depth, 2);
        assert_eq!(head.position, Vec2::new(0.0, 2.5));
        assert!(!head.has_sprite);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_child_is_skipped() {
        let records = vec![
            object(1, "Root"),
            object(2, "Child"),
            transform(10, 1, (0.0, 0.0), 0, &[404, 11]),
            transform(11, 2, (0.0, 0.0), 10, &[]),
        ];

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let roots = assemble_hierarchy(&graph, &mut diagnostics);

        assert_eq!(roots[0].children.len(), 1);
        assert_eq!(roots[0].children[0].name, "Child");
        assert_eq!(
            diagnostics.count(|d| matches!(d, Diagnostic::UnresolvedReference { field: "children", .. })),
            1
        );
    }

    #[test]
    fn test_cycle_terminates() {
        // 10 -> 11 -> 12 -> 11 and 12 -> 10
        let records = vec![
            object(1, "Root"),
            object(2, "A"),
            object(3, "B"),
            transform(10, 1, (0.0, 0.0), 0, &[11]),
            transform(11, 2, (0.0, 0.0), 10, &[12]),
            transform(12, 3, (0.0, 0.0), 11, &[11, 10]),
        ];

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let roots = assemble_hierarchy(&graph, &mut diagnostics);

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].node_count(), 3);
        assert!(roots[0].children[0].children[0].children.is_empty());
        assert_eq!(
            diagnostics.count(|d| matches!(d, Diagnostic::CyclicHierarchy { .. })),
            2
        );
    }

    #[test]
    fn test_self_child() {
        let records = vec![object(1, "Loop"), transform(10, 1, (0.0, 0.0), 0, &[10])];

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let roots = assemble_hierarchy(&graph, &mut diagnostics);

        assert_eq!(roots[0].node_count(), 1);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_shared_child_is_not_a_cycle() {
        let records = vec![
            object(1, "Root"),
            object(2, "Left"),
            object(3, "Right"),
            object(4, "Shared"),
            transform(10, 1, (0.0, 0.0), 0, &[11, 12]),
            transform(11, 2, (0.0, 0.0), 10, &[13]),
            transform(12, 3, (0.0, 0.0), 10, &[13]),
            transform(13, 4, (0.0, 0.0), 11, &[]),
        ];

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let roots = assemble_hierarchy(&graph, &mut diagnostics);

        assert_eq!(roots[0].node_count(), 5);
        assert_eq!(roots[0].children[0].children[0].name, "Shared");
        assert_eq!(roots[0].children[1].children[0].name, "Shared");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_deep_chain_is_capped() {
        let levels = 3000u64;
        let mut records = Vec::new();
        for i in 0..levels {
            let parent = if i == 0 { 0 } else { 10_000 + i - 1 };
            let children: Vec<u64> = if i + 1 < levels { vec![10_000 + i + 1] } else { vec![] };
            records.push(object(i + 1, "Link"));
            records.push(transform(10_000 + i, i + 1, (0.0, 0.0), parent, &children));
        }

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let roots = assemble_hierarchy(&graph, &mut diagnostics);

        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].node_count(), MAX_HIERARCHY_DEPTH as usize + 1);

        let mut deepest = 0;
        roots[0].walk(&mut |node| deepest = deepest.max(node.depth));
        assert_eq!(deepest, MAX_HIERARCHY_DEPTH);
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::HierarchyTooDeep { max_depth: MAX_HIERARCHY_DEPTH, .. })
        ));
    }

    #[test]
    fn test_walk_order() {
        let records = vec![
            object(1, "Root"),
            object(2, "Left"),
            object(3, "Right"),
            transform(10, 1, (0.0, 0.0), 0, &[11, 12]),
            transform(11, 2, (0.0, 0.0), 10, &[]),
            transform(12, 3, (0.0, 0.0), 10, &[]),
        ];

        let mut diagnostics = Diagnostics::new();
        let graph = ObjectGraph::build(&records, &mut diagnostics);
        let roots = assemble_hierarchy(&graph, &mut diagnostics);

        let mut names = Vec::new();
        roots[0].walk(&mut |node| names.push(node.name.as_str()));
        assert_eq!(names, ["Root", "Left", "Right"]);
    }
}
