//! Tree Builder - WASM Module
//!
//! Converts flat `{id, parent}` records into a nested hierarchy and computes
//! the pixel geometry needed to draw it as a top-down tree inside a
//! fixed-width container. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `hierarchy`: Records → depth-tagged forest
//! - `layout`: Diapason splitting, node positions and connector geometry
//! - `render`: Render sink trait with JavaScript and SVG implementations
//! - `builder`: Per-instance state tying the stages together

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Float32Array, Promise};
use log::{LevelFilter, debug, warn};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod builder;
pub mod error;
pub mod hierarchy;
pub mod layout;
pub mod logging;
pub mod render;

use builder::TreeBuilder;
use error::{TreeBuilderError, check_width};
use hierarchy::{DataObject, HierarchyConfig, LinkMode};
use layout::{Stroke, TreeLayoutConfig};
use render::JsRenderSink;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(LevelFilter::Info);
}

/// Main entry point for building a tree.
///
/// Accepts either a data object `{ data: [{ id, parent }, ...] }` or a Promise
/// resolving to one. With a Promise the build runs once, after the first
/// resolution; until then `isBuilt()` is false.
#[wasm_bindgen]
pub struct TreeBuilderWasm {
    state: Rc<RefCell<TreeBuilder>>,
}

#[wasm_bindgen]
impl TreeBuilderWasm {
    /// Create a builder with the default 150px nodes and gutter.
    ///
    /// Throws `InvalidInput` when `source` is neither a Promise nor an object,
    /// and `InvalidWidth` for a negative or non-finite width.
    #[wasm_bindgen(constructor)]
    pub fn new(source: JsValue, container_width: f64) -> Result<TreeBuilderWasm, JsValue> {
        let defaults = TreeLayoutConfig::default();
        Self::with_options(
            source,
            container_width,
            defaults.node_width,
            defaults.node_height,
            defaults.vertical_gutter,
            false,
        )
    }

    /// Create a builder with custom node size and gutter.
    ///
    /// # Arguments
    ///
    /// * `source` - Data object or a Promise resolving to one
    /// * `container_width` - Width of the drawing area in pixels
    /// * `node_width` - Width of a node box (default: 150)
    /// * `node_height` - Height of a node box (default: 150)
    /// * `vertical_gutter` - Space between rows (default: 150)
    /// * `resolve_forward_refs` - If true, children may appear before their parents
    ///
    /// Sizes must be finite and non-negative, otherwise this throws `InvalidDimension`.
    #[wasm_bindgen(js_name = withOptions)]
    pub fn with_options(
        source: JsValue,
        container_width: f64,
        node_width: f64,
        node_height: f64,
        vertical_gutter: f64,
        resolve_forward_refs: bool,
    ) -> Result<TreeBuilderWasm, JsValue> {
        let width = check_width(container_width)?;
        let hierarchy = HierarchyConfig {
            link_mode: if resolve_forward_refs {
                LinkMode::TwoPass
            } else {
                LinkMode::SinglePass
            },
        };
        let layout = TreeLayoutConfig {
            node_width,
            node_height,
            vertical_gutter,
            stroke: Stroke::default(),
        };
        layout.validate()?;
        let state = Rc::new(RefCell::new(TreeBuilder::new(hierarchy, layout)));

        if let Some(promise) = source.dyn_ref::<Promise>() {
            // Callbacks are forgotten and may outlive the instance.
            let pending = Rc::downgrade(&state);
            let on_resolve = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
                let Some(state) = pending.upgrade() else {
                    debug!("Data source resolved after the tree was freed");
                    return;
                };
                let mut builder = state.borrow_mut();
                if builder.is_built() {
                    return;
                }
                if let Err(err) = builder.build(decode_resolved(&value), width) {
                    warn!(error:% = err; "Build after data source resolution failed");
                }
            });
            let on_reject = Closure::<dyn FnMut(JsValue)>::new(|reason: JsValue| {
                warn!(reason:? = reason; "Data source rejected; tree stays unbuilt");
            });
            let _ = promise.then2(&on_resolve, &on_reject);
            on_resolve.forget();
            on_reject.forget();

            return Ok(Self { state });
        }

        if !source.is_object() {
            return Err(TreeBuilderError::InvalidInput.into());
        }

        let data: DataObject =
            serde_wasm_bindgen::from_value(source).map_err(TreeBuilderError::from)?;
        state.borrow_mut().build(data, width)?;

        Ok(Self { state })
    }

    /// Whether the hierarchy and layout have been computed.
    #[wasm_bindgen(js_name = isBuilt)]
    pub fn is_built(&self) -> bool {
        self.state.borrow().is_built()
    }

    /// Recompute everything for a new container width.
    pub fn rebuild(&self, container_width: f64) -> Result<(), JsValue> {
        self.state.borrow_mut().rebuild(container_width)?;
        Ok(())
    }

    /// The built forest as nested `{ id, deepLevel, children? }` objects.
    pub fn hierarchy(&self) -> Result<JsValue, JsValue> {
        to_js(self.state.borrow().forest())
    }

    /// Node placements `{ id, deepLevel, x, y, diapason }` in pre-order.
    pub fn nodes(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().layout()?.nodes)
    }

    /// Connectors `{ kind, x1, y1, x2, y2, stroke }` in emission order.
    pub fn connectors(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.borrow().layout()?.connectors)
    }

    /// Node positions as a Float32Array `[x0, y0, x1, y1, ...]` in node order.
    pub fn positions(&self) -> Result<Float32Array, JsValue> {
        let state = self.state.borrow();
        let positions = state.layout()?.positions_flat();
        Ok(Float32Array::from(&positions[..]))
    }

    /// Canvas height needed to show the whole tree.
    #[wasm_bindgen(js_name = maxHeight)]
    pub fn max_height(&self) -> Result<f64, JsValue> {
        Ok(self.state.borrow().layout()?.max_height)
    }

    /// Number of laid out nodes (0 before the build).
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.state
            .borrow()
            .layout()
            .map_or(0, |layout| layout.nodes.len() as u32)
    }

    /// Number of connectors (0 before the build).
    #[wasm_bindgen(js_name = connectorCount)]
    pub fn connector_count(&self) -> u32 {
        self.state
            .borrow()
            .layout()
            .map_or(0, |layout| layout.connectors.len() as u32)
    }

    /// Draw the tree through a JS object with `drawNode`, `drawLine` and
    /// optionally `setSize` methods.
    pub fn render(&self, sink: &JsValue) -> Result<(), JsValue> {
        let mut sink = JsRenderSink::new(sink)?;
        self.state.borrow().render(&mut sink)?;
        Ok(())
    }

    /// The tree as a standalone SVG document.
    #[wasm_bindgen(js_name = toSvg)]
    pub fn to_svg(&self) -> Result<String, JsValue> {
        Ok(self.state.borrow().to_svg()?)
    }
}

/// Read the value a data source resolved to; anything unreadable builds an empty tree.
fn decode_resolved(value: &JsValue) -> DataObject {
    if !value.is_object() {
        return DataObject::default();
    }
    serde_wasm_bindgen::from_value(value.clone()).unwrap_or_else(|err| {
        warn!(error:% = err; "Resolved data could not be decoded; building an empty tree");
        DataObject::default()
    })
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(value.serialize(&serializer)?)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use hierarchy::InputRecord;
    use layout::ConnectorKind;
    use render::RenderSink;

    /// Sink that records everything, standing in for the DOM.
    #[derive(Default)]
    struct Canvas {
        size: Option<(f64, f64)>,
        boxes: Vec<(String, f64, f64)>,
        lines: Vec<(f64, f64, f64, f64)>,
    }

    impl RenderSink for Canvas {
        fn begin(&mut self, width: f64, height: f64) -> error::TreeResult<()> {
            self.size = Some((width, height));
            Ok(())
        }

        fn draw_node(&mut self, node: &layout::NodePlacement) -> error::TreeResult<()> {
            self.boxes.push((node.id.clone(), node.x, node.y));
            Ok(())
        }

        fn draw_line(&mut self, connector: &layout::Connector) -> error::TreeResult<()> {
            let s = connector.segment;
            self.lines.push((s.x1, s.y1, s.x2, s.y2));
            Ok(())
        }
    }

    /// Org chart: one root, two departments, one of them with three teams.
    fn org_chart() -> DataObject {
        DataObject::new(vec![
            InputRecord::root("ceo"),
            InputRecord::child("eng", "ceo"),
            InputRecord::child("ops", "ceo"),
            InputRecord::child("web", "eng"),
            InputRecord::child("infra", "eng"),
            InputRecord::child("data", "eng"),
            InputRecord::child("late", "missing"),
        ])
    }

    #[test]
    fn test_records_to_canvas() {
        let mut builder = TreeBuilder::default();
        builder.build(org_chart(), 1200.0).unwrap();

        let mut canvas = Canvas::default();
        builder.render(&mut canvas).unwrap();

        // "late" is dropped: its parent never appears.
        assert_eq!(canvas.boxes.len(), 6);
        assert!(canvas.boxes.iter().all(|(id, _, _)| id != "late"));
        assert_eq!(canvas.size, Some((1200.0, 900.0)));

        // 5 parent feeds, 2 branches (ceo, eng), 2 child feeds (ceo, eng).
        assert_eq!(canvas.lines.len(), 9);
        let layout = builder.layout().unwrap();
        assert_eq!(layout.connectors_of(ConnectorKind::Branch).count(), 2);

        // Teams split eng's half of the container into thirds.
        let web = &layout.nodes[2];
        assert_eq!(web.id, "web");
        assert_eq!(web.diapason.start, 0.0);
        assert_eq!(web.diapason.end, 200.0);
        assert_eq!(web.x, 25.0);
        assert_eq!(web.y, 600.0);
    }

    #[test]
    fn test_two_roots_render_side_by_side() {
        let mut builder = TreeBuilder::default();
        builder
            .build(
                DataObject::new(vec![
                    InputRecord::root("left"),
                    InputRecord::root("right"),
                    InputRecord::child("leaf", "right"),
                ]),
                1000.0,
            )
            .unwrap();

        let mut canvas = Canvas::default();
        builder.render(&mut canvas).unwrap();

        assert_eq!(
            canvas.boxes,
            vec![
                ("left".to_string(), 175.0, 0.0),
                ("right".to_string(), 675.0, 0.0),
                ("leaf".to_string(), 675.0, 300.0),
            ]
        );
        // leaf's parent feed, right's child feed; no branch for a single child.
        assert_eq!(
            canvas.lines,
            vec![(749.0, 225.0, 749.0, 300.0), (749.0, 150.0, 749.0, 225.0)]
        );
    }
}
