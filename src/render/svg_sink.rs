//! Render sink that assembles a standalone SVG document.

use svg::Document;
use svg::node::element::{Group, Line, Rectangle, Text};

use super::RenderSink;
use crate::error::TreeResult;
use crate::layout::{Connector, NodePlacement};

const NODE_FILL: &str = "white";
const NODE_STROKE: &str = "rgba(0,0,0,1)";
const FONT_FAMILY: &str = "sans-serif";
const FONT_SIZE: f64 = 16.0;

/// Builds an SVG with one labeled box per node and one `<line>` per connector.
pub struct SvgSink {
    node_width: f64,
    node_height: f64,
    width: f64,
    height: f64,
    nodes: Group,
    lines: Group,
}

impl SvgSink {
    /// `node_width`/`node_height` size the boxes; they should match the layout config.
    pub fn new(node_width: f64, node_height: f64) -> Self {
        Self {
            node_width,
            node_height,
            width: 0.0,
            height: 0.0,
            nodes: Group::new().set("class", "nodes"),
            lines: Group::new().set("class", "connections"),
        }
    }

    /// Finish the document. Connectors are drawn under the nodes.
    pub fn finish(self) -> Document {
        Document::new()
            .set("viewBox", format!("0 0 {} {}", self.width, self.height))
            .set("width", self.width)
            .set("height", self.height)
            .add(self.lines)
            .add(self.nodes)
    }
}

impl RenderSink for SvgSink {
    fn begin(&mut self, width: f64, height: f64) -> TreeResult<()> {
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn draw_node(&mut self, node: &NodePlacement) -> TreeResult<()> {
        let rect = Rectangle::new()
            .set("x", node.x)
            .set("y", node.y)
            .set("width", self.node_width)
            .set("height", self.node_height)
            .set("fill", NODE_FILL)
            .set("stroke", NODE_STROKE);

        let label = Text::new(node.id.as_str())
            .set("x", node.x + self.node_width / 2.0)
            .set("y", node.y + self.node_height / 2.0)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-family", FONT_FAMILY)
            .set("font-size", FONT_SIZE);

        let group = Group::new()
            .set("class", "node-item")
            .set("data-id", node.id.as_str())
            .add(rect)
            .add(label);

        let nodes = std::mem::replace(&mut self.nodes, Group::new());
        self.nodes = nodes.add(group);
        Ok(())
    }

    fn draw_line(&mut self, connector: &Connector) -> TreeResult<()> {
        let segment = connector.segment;
        let line = Line::new()
            .set("x1", segment.x1)
            .set("y1", segment.y1)
            .set("x2", segment.x2)
            .set("y2", segment.y2)
            .set("stroke", connector.stroke.color.as_str())
            .set("stroke-width", connector.stroke.width);

        let lines = std::mem::replace(&mut self.lines, Group::new());
        self.lines = lines.add(line);
        Ok(())
    }
}
