//! Diapason tree layout.
//!
//! Every level of the forest gets the diapason of its parent (the whole
//! container for the roots), splits it evenly between siblings and centers
//! each node in its slice. Rows are stacked top-down with a fixed gutter.
//!
//! # Traversal
//!
//! Pre-order, per node: place it, emit its parent feed, emit its branch when
//! it has more than one child, lay out the children, then emit its child
//! feed. Each recursive call returns a [`LayoutFragment`] which the caller
//! merges, so no output buffer is shared across calls.

use log::debug;
use serde::Serialize;

use super::connector::{self, Connector, ConnectorKind, LineSegment, Stroke};
use super::diapason::Diapason;
use crate::error::{TreeResult, check_dimension};
use crate::hierarchy::{Forest, TreeNode};

/// Configuration for the diapason layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayoutConfig {
    /// Width of a rendered node box.
    pub node_width: f64,
    /// Height of a rendered node box.
    pub node_height: f64,
    /// Vertical space between two rows.
    pub vertical_gutter: f64,
    /// Stroke attached to every connector.
    pub stroke: Stroke,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 150.0,
            node_height: 150.0,
            vertical_gutter: 150.0,
            stroke: Stroke::default(),
        }
    }
}

impl TreeLayoutConfig {
    /// Reject sizes that would produce NaN or upward-growing rows.
    pub fn validate(&self) -> TreeResult<()> {
        check_dimension("node width", self.node_width)?;
        check_dimension("node height", self.node_height)?;
        check_dimension("vertical gutter", self.vertical_gutter)?;
        Ok(())
    }

    /// Height of one row including its gutter.
    #[inline]
    pub fn row_height(&self) -> f64 {
        self.node_height + self.vertical_gutter
    }

    /// Top edge of the row holding nodes of `deep_level`.
    #[inline]
    pub fn row_top(&self, deep_level: u32) -> f64 {
        (deep_level.saturating_sub(1)) as f64 * self.row_height()
    }
}

/// Where a node ends up.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePlacement {
    pub id: String,
    pub deep_level: u32,
    pub x: f64,
    pub y: f64,
    /// Slice the node was centered in.
    pub diapason: Diapason,
}

/// Output of a full layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayout {
    /// Nodes in pre-order.
    pub nodes: Vec<NodePlacement>,
    /// Connectors in emission order.
    pub connectors: Vec<Connector>,
    /// Canvas height needed to show every node.
    pub max_height: f64,
    /// Container width the layout was computed for.
    pub width: f64,
}

impl TreeLayout {
    /// Connectors of one kind, in emission order.
    pub fn connectors_of(&self, kind: ConnectorKind) -> impl Iterator<Item = &Connector> {
        self.connectors.iter().filter(move |c| c.kind == kind)
    }

    /// Interleaved `[x0, y0, x1, y1, ...]` in node order.
    pub fn positions_flat(&self) -> Vec<f32> {
        let mut positions = Vec::with_capacity(self.nodes.len() * 2);
        for node in &self.nodes {
            positions.push(node.x as f32);
            positions.push(node.y as f32);
        }
        positions
    }
}

/// Partial result for one sibling group and everything below it.
#[derive(Debug, Default)]
struct LayoutFragment {
    nodes: Vec<NodePlacement>,
    connectors: Vec<Connector>,
    max_height: f64,
}

impl LayoutFragment {
    fn track_height(&mut self, bottom: f64) {
        if bottom > self.max_height {
            self.max_height = bottom;
        }
    }

    fn absorb(&mut self, other: LayoutFragment) {
        self.nodes.extend(other.nodes);
        self.connectors.extend(other.connectors);
        self.track_height(other.max_height);
    }
}

/// The diapason layout engine.
pub struct LayoutEngine {
    config: TreeLayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: TreeLayoutConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(TreeLayoutConfig::default())
    }

    pub fn config(&self) -> &TreeLayoutConfig {
        &self.config
    }

    /// Lay out `forest` inside a container `container_width` pixels wide.
    ///
    /// Pure: the same forest and width always give the same result.
    pub fn compute(&self, forest: &Forest, container_width: f64) -> TreeLayout {
        let fragment = self.layout_level(
            forest.roots(),
            Diapason::container(container_width),
            container_width,
        );

        debug!(
            nodes = fragment.nodes.len(),
            connectors = fragment.connectors.len(),
            max_height = fragment.max_height,
            width = container_width;
            "Layout computed",
        );

        TreeLayout {
            nodes: fragment.nodes,
            connectors: fragment.connectors,
            max_height: fragment.max_height,
            width: container_width,
        }
    }

    fn layout_level(
        &self,
        nodes: &[TreeNode],
        diapason: Diapason,
        container_width: f64,
    ) -> LayoutFragment {
        let mut fragment = LayoutFragment::default();
        let level_size = nodes.len();

        for (index, node) in nodes.iter().enumerate() {
            let slice = diapason.split(index, level_size, container_width);

            let placement = self.place(node, slice);
            fragment.track_height(placement.y + self.config.row_height());
            fragment.nodes.push(placement);

            if node.deep_level > 1 {
                let feed = connector::parent_feed(slice, node.deep_level, &self.config);
                fragment.connectors.push(self.connector(ConnectorKind::ParentFeed, feed));
            }

            if node.children.len() > 1 {
                let line = connector::branch(slice, node.deep_level, level_size, &self.config);
                fragment.connectors.push(self.connector(ConnectorKind::Branch, line));
            }

            if node.has_children() {
                fragment.absorb(self.layout_level(&node.children, slice, container_width));

                let feed = connector::child_feed(slice, node.deep_level, &self.config);
                fragment.connectors.push(self.connector(ConnectorKind::ChildFeed, feed));
            }
        }

        fragment
    }

    fn place(&self, node: &TreeNode, slice: Diapason) -> NodePlacement {
        NodePlacement {
            id: node.id.clone(),
            deep_level: node.deep_level,
            x: slice.centered(self.config.node_width),
            y: self.config.row_top(node.deep_level),
            diapason: slice,
        }
    }

    fn connector(&self, kind: ConnectorKind, segment: LineSegment) -> Connector {
        Connector {
            kind,
            segment,
            stroke: self.config.stroke.clone(),
        }
    }
}

/// Lay out `forest` with the default node and gutter sizes.
pub fn compute_layout(forest: &Forest, container_width: f64) -> TreeLayout {
    LayoutEngine::with_defaults().compute(forest, container_width)
}
