//! Layout algorithms for tree visualization.
//!
//! This module turns a built forest into pixel geometry: node positions,
//! connector segments and the canvas height a render sink needs.

pub mod connector;
pub mod diapason;
pub mod engine;

pub use connector::{Connector, ConnectorKind, LineSegment, Stroke};
pub use diapason::Diapason;
pub use engine::{LayoutEngine, NodePlacement, TreeLayout, TreeLayoutConfig, compute_layout};
