//! TreeBuilder - per-instance build state.
//!
//! Owns the data object, the forest built from it and the latest layout. A
//! build always starts from scratch: the forest and the layout are replaced,
//! never patched.

use log::debug;

use crate::error::{TreeBuilderError, TreeResult, check_width};
use crate::hierarchy::{DataObject, Forest, HierarchyBuilder, HierarchyConfig};
use crate::layout::{LayoutEngine, TreeLayout, TreeLayoutConfig};
use crate::render::{RenderSink, SvgSink, render_layout};

pub struct TreeBuilder {
    hierarchy: HierarchyBuilder,
    engine: LayoutEngine,
    data: Option<DataObject>,
    forest: Forest,
    layout: Option<TreeLayout>,
}

impl TreeBuilder {
    pub fn new(hierarchy: HierarchyConfig, layout: TreeLayoutConfig) -> Self {
        Self {
            hierarchy: HierarchyBuilder::new(hierarchy),
            engine: LayoutEngine::new(layout),
            data: None,
            forest: Forest::default(),
            layout: None,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(HierarchyConfig::default(), TreeLayoutConfig::default())
    }

    /// Build the hierarchy and the layout for `data` inside `container_width`.
    pub fn build(&mut self, data: DataObject, container_width: f64) -> TreeResult<&TreeLayout> {
        let width = check_width(container_width)?;
        self.engine.config().validate()?;
        self.data = Some(data);
        self.run(width)
    }

    /// Recompute everything from the stored data, e.g. after the container resized.
    pub fn rebuild(&mut self, container_width: f64) -> TreeResult<&TreeLayout> {
        let width = check_width(container_width)?;
        if self.data.is_none() {
            return Err(TreeBuilderError::NotBuilt);
        }
        self.run(width)
    }

    fn run(&mut self, width: f64) -> TreeResult<&TreeLayout> {
        let records = self.data.as_ref().map(DataObject::records).unwrap_or(&[]);
        self.forest = self.hierarchy.build(records);
        let layout = self.engine.compute(&self.forest, width);

        debug!(
            nodes = layout.nodes.len(),
            connectors = layout.connectors.len(),
            height = layout.max_height;
            "Tree built",
        );
        Ok(self.layout.insert(layout))
    }

    pub fn is_built(&self) -> bool {
        self.layout.is_some()
    }

    /// The forest from the last build (empty before the first one).
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn layout(&self) -> TreeResult<&TreeLayout> {
        self.layout.as_ref().ok_or(TreeBuilderError::NotBuilt)
    }

    pub fn layout_config(&self) -> &TreeLayoutConfig {
        self.engine.config()
    }

    /// Hand the current layout to `sink`.
    pub fn render<S: RenderSink + ?Sized>(&self, sink: &mut S) -> TreeResult<()> {
        render_layout(self.layout()?, sink)
    }

    /// Render the current layout as an SVG document string.
    pub fn to_svg(&self) -> TreeResult<String> {
        let config = self.layout_config();
        let mut sink = SvgSink::new(config.node_width, config.node_height);
        self.render(&mut sink)?;
        Ok(sink.finish().to_string())
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{InputRecord, LinkMode};

    fn data() -> DataObject {
        DataObject::new(vec![
            InputRecord::root("a"),
            InputRecord::child("b", "a"),
            InputRecord::child("c", "b"),
        ])
    }

    #[test]
    fn test_unbuilt_state() {
        let builder = TreeBuilder::default();
        assert!(!builder.is_built());
        assert!(builder.forest().is_empty());
        assert_eq!(builder.layout(), Err(TreeBuilderError::NotBuilt));
        assert_eq!(builder.to_svg(), Err(TreeBuilderError::NotBuilt));
    }

    #[test]
    fn test_build() {
        let mut builder = TreeBuilder::default();
        let layout = builder.build(data(), 900.0).unwrap();
        assert_eq!(layout.nodes.len(), 3);
        assert_eq!(layout.max_height, 900.0);
        assert!(builder.is_built());
        assert_eq!(builder.forest().max_depth(), 3);
    }

    #[test]
    fn test_missing_data_builds_empty_tree() {
        let mut builder = TreeBuilder::default();
        let layout = builder.build(DataObject::default(), 900.0).unwrap();
        assert!(layout.nodes.is_empty());
        assert_eq!(layout.max_height, 0.0);
        assert!(builder.is_built());
    }

    #[test]
    fn test_invalid_width_keeps_previous_state() {
        let mut builder = TreeBuilder::default();
        builder.build(data(), 900.0).unwrap();

        assert_eq!(
            builder.rebuild(-1.0).map(|_| ()),
            Err(TreeBuilderError::InvalidWidth(-1.0))
        );
        assert_eq!(builder.layout().unwrap().width, 900.0);
    }

    #[test]
    fn test_rebuild_recomputes_from_scratch() {
        let mut builder = TreeBuilder::default();
        let first = builder.build(data(), 900.0).unwrap().clone();
        let resized = builder.rebuild(600.0).unwrap().clone();
        assert_ne!(first, resized);
        assert_eq!(resized.width, 600.0);

        let again = builder.rebuild(900.0).unwrap();
        assert_eq!(&first, again);
    }

    #[test]
    fn test_invalid_node_size_is_rejected() {
        let mut builder = TreeBuilder::new(
            HierarchyConfig::default(),
            TreeLayoutConfig {
                node_height: -150.0,
                ..TreeLayoutConfig::default()
            },
        );
        assert_eq!(
            builder.build(data(), 900.0).map(|_| ()),
            Err(TreeBuilderError::InvalidDimension {
                name: "node height",
                value: -150.0
            })
        );
        assert!(!builder.is_built());
    }

    #[test]
    fn test_rebuild_before_build() {
        let mut builder = TreeBuilder::default();
        assert_eq!(builder.rebuild(900.0).map(|_| ()), Err(TreeBuilderError::NotBuilt));
    }

    #[test]
    fn test_two_pass_builder() {
        let mut builder = TreeBuilder::new(
            HierarchyConfig {
                link_mode: LinkMode::TwoPass,
            },
            TreeLayoutConfig::default(),
        );
        let data = DataObject::new(vec![InputRecord::child("b", "a"), InputRecord::root("a")]);
        let layout = builder.build(data, 900.0).unwrap();
        assert_eq!(layout.nodes.len(), 2);
    }

    #[test]
    fn test_to_svg() {
        let mut builder = TreeBuilder::default();
        builder.build(data(), 900.0).unwrap();
        let svg = builder.to_svg().unwrap();
        assert!(svg.contains("<svg"));
        assert_eq!(svg.matches("<rect").count(), 3);
    }
}
