//! Input records as supplied by the caller.
//!
//! The data object has the shape `{ data: [{ id, parent }, ...] }`. A missing
//! or null `data` field is an empty input, not an error.

use serde::{Deserialize, Deserializer};

/// The `parent` field of a record.
///
/// `null` and a missing key are different: `null` marks a root, a record
/// without the key cannot be linked and is dropped by the hierarchy builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParentRef {
    #[default]
    Missing,
    Root,
    Node(String),
}

impl ParentRef {
    /// The referenced parent id, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            ParentRef::Node(id) => Some(id),
            ParentRef::Missing | ParentRef::Root => None,
        }
    }
}

// Only reached when the key is present; `#[serde(default)]` covers the missing case.
impl<'de> Deserialize<'de> for ParentRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            Some(id) => ParentRef::Node(id),
            None => ParentRef::Root,
        })
    }
}

/// One flat `{id, parent}` record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputRecord {
    pub id: String,
    #[serde(default)]
    pub parent: ParentRef,
}

impl InputRecord {
    /// A record with `parent: null`.
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: ParentRef::Root,
        }
    }

    /// A record attached to `parent`.
    pub fn child(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: ParentRef::Node(parent.into()),
        }
    }

    /// A record without a `parent` key.
    pub fn unparented(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: ParentRef::Missing,
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent == ParentRef::Root
    }
}

/// The data object handed to the constructor (or produced by its Promise).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DataObject {
    #[serde(default)]
    pub data: Option<Vec<InputRecord>>,
}

impl DataObject {
    pub fn new(records: Vec<InputRecord>) -> Self {
        Self {
            data: Some(records),
        }
    }

    /// The records to build from; empty when `data` is absent.
    pub fn records(&self) -> &[InputRecord] {
        self.data.as_deref().unwrap_or(&[])
    }
}
