//! Forest node types.
//!
//! A [`TreeNode`] carries its id, its 1-based depth (`deep_level`) and its
//! children in insertion order. A [`Forest`] is the ordered list of roots.

use serde::Serialize;

/// A node of the built hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    /// Depth from the root (root = 1).
    pub deep_level: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a node without children.
    pub fn new(id: impl Into<String>, deep_level: u32) -> Self {
        Self {
            id: id.into(),
            deep_level,
            children: Vec::new(),
        }
    }

    /// Builder-style helper used mostly by tests.
    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Depth of the deepest node in this subtree.
    pub fn max_depth(&self) -> u32 {
        self.children
            .iter()
            .map(TreeNode::max_depth)
            .max()
            .unwrap_or(self.deep_level)
    }

    /// Number of nodes in this subtree, including itself.
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::subtree_size).sum::<usize>()
    }
}

/// Ordered sequence of root nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Forest {
    roots: Vec<TreeNode>,
}

impl Forest {
    pub fn new(roots: Vec<TreeNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all trees.
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(TreeNode::subtree_size).sum()
    }

    /// Depth of the deepest node in the forest (0 when empty).
    pub fn max_depth(&self) -> u32 {
        self.roots.iter().map(TreeNode::max_depth).max().unwrap_or(0)
    }

    /// Pre-order lookup by id; the first match wins.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        fn walk<'a>(nodes: &'a [TreeNode], id: &str) -> Option<&'a TreeNode> {
            nodes.iter().find_map(|node| {
                if node.id == id {
                    Some(node)
                } else {
                    walk(&node.children, id)
                }
            })
        }
        walk(&self.roots, id)
    }
}
