//! Error type shared by the hierarchy, layout and render modules.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors surfaced by the tree builder.
///
/// Unlinkable records are not errors: they are dropped during hierarchy
/// construction and only show up in the debug log.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeBuilderError {
    /// The constructor received something that is neither a Promise nor an object.
    #[error("Invalid input: expected a data object or a Promise resolving to one")]
    InvalidInput,

    /// The `data` field was present but could not be read as records.
    #[error("Failed to decode records: {0}")]
    Decode(String),

    /// The container width is negative or not a finite number.
    #[error("Invalid container width: {0}")]
    InvalidWidth(f64),

    /// A node size or the row gutter is negative or not a finite number.
    #[error("Invalid {name}: {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    /// Results were requested before the data source resolved.
    #[error("Tree has not been built yet")]
    NotBuilt,

    /// A render sink rejected a draw call.
    #[error("Render sink error: {0}")]
    Sink(String),
}

pub type TreeResult<T> = Result<T, TreeBuilderError>;

impl From<serde_wasm_bindgen::Error> for TreeBuilderError {
    fn from(error: serde_wasm_bindgen::Error) -> Self {
        TreeBuilderError::Decode(error.to_string())
    }
}

impl From<TreeBuilderError> for JsValue {
    fn from(error: TreeBuilderError) -> Self {
        wasm_bindgen::JsError::new(&error.to_string()).into()
    }
}

/// Validate a container width before it reaches the layout engine.
pub fn check_width(width: f64) -> TreeResult<f64> {
    if width.is_finite() && width >= 0.0 {
        Ok(width)
    } else {
        Err(TreeBuilderError::InvalidWidth(width))
    }
}

/// Validate a node size or gutter; `name` ends up in the error message.
pub fn check_dimension(name: &'static str, value: f64) -> TreeResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(TreeBuilderError::InvalidDimension { name, value })
    }
}
