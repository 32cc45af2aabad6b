//! Connector geometry.
//!
//! Three kinds of straight segments join a node to its family:
//!
//! - **Parent feed**: vertical, from half a gutter above a non-root node down
//!   to its top edge.
//! - **Child feed**: the parent feed shifted down by `1.5 * node_height`,
//!   running from under a node toward its children's branch.
//! - **Branch**: horizontal, spreading across the children of a node that has
//!   more than one.

use serde::Serialize;

use super::diapason::Diapason;
use super::engine::TreeLayoutConfig;

/// Horizontal inset of vertical feeds inside their slice.
const FEED_INSET: f64 = 2.0;

/// Line stroke handed to render sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: "rgba(0,0,0,1)".to_string(),
            width: 2.0,
        }
    }
}

/// What a connector links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectorKind {
    ParentFeed,
    ChildFeed,
    Branch,
}

/// A straight line from `(x1, y1)` to `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineSegment {
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.y1 == self.y2
    }
}

/// A segment tagged with its kind and stroke.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connector {
    pub kind: ConnectorKind,
    #[serde(flatten)]
    pub segment: LineSegment,
    pub stroke: Stroke,
}

/// Vertical segment ending at the top edge of a node.
pub fn parent_feed(slice: Diapason, deep_level: u32, config: &TreeLayoutConfig) -> LineSegment {
    let x = slice.start + (slice.width() - FEED_INSET) / 2.0;
    let y2 = config.row_top(deep_level);
    LineSegment {
        x1: x,
        y1: y2 - config.vertical_gutter / 2.0,
        x2: x,
        y2,
    }
}

/// Vertical segment under a node, leading toward its children.
pub fn child_feed(slice: Diapason, deep_level: u32, config: &TreeLayoutConfig) -> LineSegment {
    let offset = config.node_height * 1.5;
    let feed = parent_feed(slice, deep_level, config);
    LineSegment {
        y1: feed.y1 + offset,
        y2: feed.y2 + offset,
        ..feed
    }
}

/// Horizontal segment spreading over a node's children.
///
/// `level_size` is the number of nodes in the sibling group the node itself
/// belongs to. Below the first level the span carries one extra gutter term
/// compared to the first level; both formulas are kept as they are.
pub fn branch(
    slice: Diapason,
    deep_level: u32,
    level_size: usize,
    config: &TreeLayoutConfig,
) -> LineSegment {
    let node_width = config.node_width;
    let level_size = level_size as f64;
    let row_width = slice.width() / (level_size + 1.0);
    let gutter = (row_width - node_width) / 2.0;

    let (x1, length) = if deep_level == 1 {
        (
            gutter + node_width / 2.0,
            node_width * level_size + gutter * (level_size + 1.0),
        )
    } else {
        (
            slice.start + gutter + node_width / 2.0,
            node_width * level_size + gutter * (level_size + 2.0),
        )
    };

    let y = config.row_top(deep_level) + config.node_height * 1.5;
    LineSegment {
        x1,
        y1: y,
        x2: x1 + length,
        y2: y,
    }
}
