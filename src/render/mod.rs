//! Render sinks.
//!
//! The layout never touches a drawing surface. A [`RenderSink`] receives the
//! canvas size, then every node position, then every connector, and draws
//! them however it likes.

mod js_sink;
mod svg_sink;

pub use js_sink::JsRenderSink;
pub use svg_sink::SvgSink;

use crate::error::TreeResult;
use crate::layout::{Connector, NodePlacement, TreeLayout};

/// Consumer of a computed layout.
pub trait RenderSink {
    /// Size the drawing surface. Called once, before any draw call.
    fn begin(&mut self, width: f64, height: f64) -> TreeResult<()>;

    /// Draw a fixed-size labeled box with its top-left corner at the placement.
    fn draw_node(&mut self, node: &NodePlacement) -> TreeResult<()>;

    /// Draw one straight connector.
    fn draw_line(&mut self, connector: &Connector) -> TreeResult<()>;
}

/// Feed a layout to `sink`: surface size, nodes, then connectors.
pub fn render_layout<S: RenderSink + ?Sized>(layout: &TreeLayout, sink: &mut S) -> TreeResult<()> {
    sink.begin(layout.width, layout.max_height)?;
    for node in &layout.nodes {
        sink.draw_node(node)?;
    }
    for connector in &layout.connectors {
        sink.draw_line(connector)?;
    }
    Ok(())
}
