//! Hierarchy construction.
//!
//! Turns flat `{id, parent}` records into a forest of depth-tagged nodes.

mod builder;
mod node;
mod record;

pub use builder::{HierarchyBuilder, HierarchyConfig, LinkMode, build_hierarchy};
pub use node::{Forest, TreeNode};
pub use record::{DataObject, InputRecord, ParentRef};
