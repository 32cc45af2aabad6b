//! Render sink backed by a JavaScript object.
//!
//! The object must provide `drawNode(id, x, y)` and
//! `drawLine(x1, y1, x2, y2, stroke, strokeWidth)`; `setSize(width, height)`
//! is called first when present.

use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use super::RenderSink;
use crate::error::{TreeBuilderError, TreeResult};
use crate::layout::{Connector, NodePlacement};

pub struct JsRenderSink {
    target: JsValue,
    draw_node: Function,
    draw_line: Function,
    set_size: Option<Function>,
}

impl JsRenderSink {
    /// Wrap `target`, resolving its methods up front.
    pub fn new(target: &JsValue) -> TreeResult<Self> {
        let required = |name: &str| {
            method(target, name).ok_or_else(|| {
                TreeBuilderError::Sink(format!("render sink has no `{name}` method"))
            })
        };

        Ok(Self {
            target: target.clone(),
            draw_node: required("drawNode")?,
            draw_line: required("drawLine")?,
            set_size: method(target, "setSize"),
        })
    }
}

impl RenderSink for JsRenderSink {
    fn begin(&mut self, width: f64, height: f64) -> TreeResult<()> {
        if let Some(set_size) = &self.set_size {
            set_size
                .call2(&self.target, &width.into(), &height.into())
                .map_err(sink_error)?;
        }
        Ok(())
    }

    fn draw_node(&mut self, node: &NodePlacement) -> TreeResult<()> {
        self.draw_node
            .call3(
                &self.target,
                &JsValue::from_str(&node.id),
                &node.x.into(),
                &node.y.into(),
            )
            .map_err(sink_error)?;
        Ok(())
    }

    fn draw_line(&mut self, connector: &Connector) -> TreeResult<()> {
        let segment = connector.segment;
        let args = Array::new();
        args.push(&segment.x1.into());
        args.push(&segment.y1.into());
        args.push(&segment.x2.into());
        args.push(&segment.y2.into());
        args.push(&JsValue::from_str(&connector.stroke.color));
        args.push(&connector.stroke.width.into());

        self.draw_line
            .apply(&self.target, &args)
            .map_err(sink_error)?;
        Ok(())
    }
}

fn method(target: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn sink_error(error: JsValue) -> TreeBuilderError {
    TreeBuilderError::Sink(error.as_string().unwrap_or_else(|| format!("{error:?}")))
}
