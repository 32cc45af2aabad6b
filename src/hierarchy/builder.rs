//! Flat records → depth-tagged forest.
//!
//! The default single-pass mode walks the records once, in input order, and
//! attaches each record to a node that already exists. A record whose parent
//! has not been seen yet is dropped, and so is one without a `parent` key.
//! Parent lookup goes through an `id → slot` index filled as nodes are
//! inserted, so each lookup is O(1). When an id is duplicated the index keeps
//! the node that comes first in pre-order.
//!
//! The two-pass mode collects every record into a `petgraph` graph first and
//! links afterwards, which lifts the "parents before children" requirement.
//! Anything not reachable from a root (missing parent, parent cycle) is dropped.

use std::collections::{HashMap, HashSet};
use std::mem;

use log::debug;
use petgraph::Directed;
use petgraph::stable_graph::{NodeIndex, StableGraph};

use super::node::{Forest, TreeNode};
use super::record::{InputRecord, ParentRef};

/// How parent references are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkMode {
    /// Records are linked in input order; a child before its parent is dropped.
    #[default]
    SinglePass,
    /// All records are collected before linking; input order only decides sibling order.
    TwoPass,
}

/// Configuration for hierarchy construction.
#[derive(Debug, Clone, Default)]
pub struct HierarchyConfig {
    pub link_mode: LinkMode,
}

/// Node storage used while linking. Children are slots into the same arena.
#[derive(Debug)]
struct ArenaNode {
    id: String,
    deep_level: u32,
    /// Sibling positions from the root down; orders nodes by pre-order.
    path: Vec<usize>,
    children: Vec<usize>,
}

/// Builds a [`Forest`] from [`InputRecord`]s.
pub struct HierarchyBuilder {
    config: HierarchyConfig,
}

impl HierarchyBuilder {
    pub fn new(config: HierarchyConfig) -> Self {
        Self { config }
    }

    /// Builder with the legacy single-pass semantics.
    pub fn with_defaults() -> Self {
        Self::new(HierarchyConfig::default())
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Convert `records` into a forest. Never fails; unlinkable records are dropped.
    pub fn build(&self, records: &[InputRecord]) -> Forest {
        let forest = match self.config.link_mode {
            LinkMode::SinglePass => Self::link_single_pass(records),
            LinkMode::TwoPass => Self::link_two_pass(records),
        };

        debug!(
            records = records.len(),
            nodes = forest.node_count(),
            roots = forest.roots().len();
            "Hierarchy built",
        );
        forest
    }

    fn link_single_pass(records: &[InputRecord]) -> Forest {
        let mut arena: Vec<ArenaNode> = Vec::with_capacity(records.len());
        let mut roots: Vec<usize> = Vec::new();
        // Each id maps to its earliest node in pre-order.
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(records.len());

        for record in records {
            let parent = match &record.parent {
                ParentRef::Root => None,
                ParentRef::Missing => {
                    debug!(id = record.id.as_str(); "Dropping record without a parent field");
                    continue;
                }
                ParentRef::Node(parent) => match Self::find_parent(&index, &arena, parent) {
                    found @ Some(_) => found,
                    None => {
                        debug!(
                            id = record.id.as_str(),
                            parent = parent.as_str();
                            "Dropping record with unknown parent",
                        );
                        continue;
                    }
                },
            };

            let slot = arena.len();
            let (deep_level, path) = match parent {
                Some((parent_slot, parent_level)) => {
                    let parent_node = &arena[parent_slot];
                    let mut path = parent_node.path.clone();
                    path.push(parent_node.children.len());
                    (parent_level + 1, path)
                }
                None => (1, vec![roots.len()]),
            };

            arena.push(ArenaNode {
                id: record.id.clone(),
                deep_level,
                path,
                children: Vec::new(),
            });
            let owned_earlier = index
                .get(record.id.as_str())
                .is_some_and(|&owner| arena[owner].path < arena[slot].path);
            if !owned_earlier {
                index.insert(record.id.as_str(), slot);
            }

            match parent {
                Some((parent_slot, _)) => arena[parent_slot].children.push(slot),
                None => roots.push(slot),
            }
        }

        let roots = roots
            .into_iter()
            .map(|slot| Self::materialize(&mut arena, slot))
            .collect();
        Forest::new(roots)
    }

    /// Look up the node that owns `parent_id`, returning its slot and depth together.
    fn find_parent(
        index: &HashMap<&str, usize>,
        arena: &[ArenaNode],
        parent_id: &str,
    ) -> Option<(usize, u32)> {
        index
            .get(parent_id)
            .map(|&slot| (slot, arena[slot].deep_level))
    }

    /// Move an arena subtree out into owned [`TreeNode`]s.
    fn materialize(arena: &mut [ArenaNode], slot: usize) -> TreeNode {
        let children = mem::take(&mut arena[slot].children);
        let id = mem::take(&mut arena[slot].id);
        let deep_level = arena[slot].deep_level;

        TreeNode {
            id,
            deep_level,
            children: children
                .into_iter()
                .map(|child| Self::materialize(arena, child))
                .collect(),
        }
    }

    fn link_two_pass(records: &[InputRecord]) -> Forest {
        // Node weight is the record's position in the input.
        let mut graph: StableGraph<usize, (), Directed> =
            StableGraph::with_capacity(records.len(), records.len());
        // No tree exists yet, so duplicate ids resolve to the first in input order.
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(records.len());

        let nodes: Vec<NodeIndex> = records
            .iter()
            .enumerate()
            .map(|(position, record)| {
                let node = graph.add_node(position);
                index.entry(record.id.as_str()).or_insert(node);
                node
            })
            .collect();

        for (record, &node) in records.iter().zip(&nodes) {
            match &record.parent {
                ParentRef::Node(parent) => match index.get(parent.as_str()) {
                    Some(&parent_node) if parent_node != node => {
                        graph.add_edge(parent_node, node, ());
                    }
                    _ => {}
                },
                ParentRef::Missing => {
                    debug!(id = record.id.as_str(); "Dropping record without a parent field");
                }
                ParentRef::Root => {}
            }
        }

        let mut visited: HashSet<NodeIndex> = HashSet::with_capacity(records.len());
        let roots: Vec<TreeNode> = records
            .iter()
            .zip(&nodes)
            .filter(|(record, _)| record.is_root())
            .filter_map(|(_, &node)| {
                Self::materialize_graph(&graph, records, node, 1, &mut visited)
            })
            .collect();

        let dropped = records.len() - visited.len();
        if dropped > 0 {
            debug!(dropped; "Dropping records unreachable from any root");
        }
        Forest::new(roots)
    }

    /// Depth-first conversion of the linked graph; children follow input order.
    fn materialize_graph(
        graph: &StableGraph<usize, (), Directed>,
        records: &[InputRecord],
        node: NodeIndex,
        deep_level: u32,
        visited: &mut HashSet<NodeIndex>,
    ) -> Option<TreeNode> {
        if !visited.insert(node) {
            return None;
        }

        // petgraph yields neighbors newest-first; restore input order.
        let mut children: Vec<NodeIndex> = graph.neighbors(node).collect();
        children.sort_by_key(|&child| graph[child]);

        Some(TreeNode {
            id: records[graph[node]].id.clone(),
            deep_level,
            children: children
                .into_iter()
                .filter_map(|child| {
                    Self::materialize_graph(graph, records, child, deep_level + 1, visited)
                })
                .collect(),
        })
    }
}

/// Build a forest with the default single-pass semantics.
pub fn build_hierarchy(records: &[InputRecord]) -> Forest {
    HierarchyBuilder::with_defaults().build(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::DataObject;

    fn two_pass() -> HierarchyBuilder {
        HierarchyBuilder::new(HierarchyConfig {
            link_mode: LinkMode::TwoPass,
        })
    }

    #[test]
    fn test_single_root() {
        let forest = build_hierarchy(&[InputRecord::root("a")]);
        assert_eq!(forest.roots(), &[TreeNode::new("a", 1)]);
        assert!(!forest.roots()[0].has_children());
    }

    #[test]
    fn test_root_with_two_children() {
        let forest = build_hierarchy(&[
            InputRecord::root("a"),
            InputRecord::child("b", "a"),
            InputRecord::child("c", "a"),
        ]);

        let expected = TreeNode::new("a", 1)
            .with_children(vec![TreeNode::new("b", 2), TreeNode::new("c", 2)]);
        assert_eq!(forest.roots(), &[expected]);
    }

    #[test]
    fn test_child_before_parent_is_dropped() {
        let forest = build_hierarchy(&[
            InputRecord::child("b", "a"),
            InputRecord::root("a"),
            InputRecord::child("c", "a"),
        ]);

        assert!(forest.find("b").is_none(), "b must not be re-attached later");
        assert_eq!(forest.node_count(), 2);
        assert_eq!(forest.roots()[0].children, vec![TreeNode::new("c", 2)]);
    }

    #[test]
    fn test_orphan_subtree_is_dropped() {
        // "y" hangs off a dropped node, so it is dropped too.
        let forest = build_hierarchy(&[
            InputRecord::root("a"),
            InputRecord::child("x", "missing"),
            InputRecord::child("y", "x"),
        ]);
        assert_eq!(forest.node_count(), 1);
    }

    #[test]
    fn test_multiple_roots_keep_order() {
        let forest = build_hierarchy(&[
            InputRecord::root("a"),
            InputRecord::root("b"),
            InputRecord::child("c", "b"),
            InputRecord::child("d", "a"),
        ]);

        let ids: Vec<&str> = forest.roots().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(forest.roots()[0].children[0].id, "d");
        assert_eq!(forest.roots()[1].children[0].id, "c");
    }

    #[test]
    fn test_depth_follows_parent() {
        let forest = build_hierarchy(&[
            InputRecord::root("a"),
            InputRecord::child("b", "a"),
            InputRecord::child("c", "b"),
            InputRecord::child("d", "c"),
        ]);

        assert_eq!(forest.find("d").map(|n| n.deep_level), Some(4));
        assert_eq!(forest.max_depth(), 4);
    }

    #[test]
    fn test_duplicate_id_first_node_owns_children() {
        let forest = build_hierarchy(&[
            InputRecord::root("a"),
            InputRecord::root("a"),
            InputRecord::child("b", "a"),
        ]);

        assert_eq!(forest.roots().len(), 2);
        assert_eq!(forest.roots()[0].children.len(), 1);
        assert!(forest.roots()[1].children.is_empty());
    }

    #[test]
    fn test_duplicate_id_resolves_to_first_in_pre_order() {
        // The second "d" is inserted later but sits under the first root.
        let forest = build_hierarchy(&[
            InputRecord::root("r1"),
            InputRecord::root("r2"),
            InputRecord::child("d", "r2"),
            InputRecord::child("m", "r1"),
            InputRecord::child("d", "m"),
            InputRecord::child("e", "d"),
        ]);

        assert_eq!(forest.find("e").map(|n| n.deep_level), Some(4));
        let under_m = &forest.roots()[0].children[0].children[0];
        assert_eq!(under_m.id, "d");
        assert_eq!(under_m.children, vec![TreeNode::new("e", 4)]);
        assert!(!forest.roots()[1].children[0].has_children());
    }

    #[test]
    fn test_record_without_parent_field_is_dropped() {
        let data: DataObject =
            serde_json::from_str(r#"{"data":[{"id":"a","parent":null},{"id":"b"}]}"#).unwrap();

        for forest in [build_hierarchy(data.records()), two_pass().build(data.records())] {
            assert_eq!(forest.roots(), &[TreeNode::new("a", 1)]);
            assert!(forest.find("b").is_none());
        }
    }

    #[test]
    fn test_children_of_unparented_record_are_dropped() {
        let forest = build_hierarchy(&[
            InputRecord::root("a"),
            InputRecord::unparented("b"),
            InputRecord::child("c", "b"),
        ]);
        assert_eq!(forest.node_count(), 1);
    }

    #[test]
    fn test_self_parent_is_dropped() {
        let forest = build_hierarchy(&[InputRecord::root("a"), InputRecord::child("b", "b")]);
        assert!(forest.find("b").is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(build_hierarchy(&[]).is_empty());
    }

    #[test]
    fn test_two_pass_accepts_forward_references() {
        let forest = two_pass().build(&[
            InputRecord::child("b", "a"),
            InputRecord::child("c", "b"),
            InputRecord::root("a"),
            InputRecord::child("d", "a"),
        ]);

        let expected = TreeNode::new("a", 1).with_children(vec![
            TreeNode::new("b", 2).with_children(vec![TreeNode::new("c", 3)]),
            TreeNode::new("d", 2),
        ]);
        assert_eq!(forest.roots(), &[expected]);
    }

    #[test]
    fn test_two_pass_drops_cycles_and_orphans() {
        let forest = two_pass().build(&[
            InputRecord::root("a"),
            InputRecord::child("x", "y"),
            InputRecord::child("y", "x"),
            InputRecord::child("z", "missing"),
        ]);

        assert_eq!(forest.node_count(), 1);
        assert!(forest.find("x").is_none());
        assert!(forest.find("z").is_none());
    }

    #[test]
    fn test_two_pass_matches_single_pass_on_ordered_input() {
        let records = [
            InputRecord::root("a"),
            InputRecord::child("b", "a"),
            InputRecord::child("c", "a"),
            InputRecord::child("d", "b"),
            InputRecord::root("e"),
            InputRecord::child("f", "e"),
        ];
        assert_eq!(two_pass().build(&records), build_hierarchy(&records));
    }
}
