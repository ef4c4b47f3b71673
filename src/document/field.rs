//! Typed, weighted fields ready for a search engine document.
//!
//! An [`IndexField`] is what the field factory produces: a name, a typed
//! [`IndexValue`], the storage/index/term-vector modes and a boost.
//!
//! ```
//! use glaive::document::field::{IndexField, IndexValue};
//! use glaive::schema::{IndexMode, StorageMode, VectorMode};
//!
//! let field = IndexField::new(
//!     "title",
//!     IndexValue::Text("Rust Programming".to_string()),
//!     StorageMode::Store,
//!     IndexMode::Analyzed,
//!     VectorMode::None,
//! )
//! .with_boost(2.0);
//!
//! assert_eq!(field.value().as_text(), Some("Rust Programming"));
//! assert_eq!(field.boost(), 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::schema::field::{IndexMode, StorageMode, VectorMode};

/// The typed value of an index field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexValue {
    /// Text value
    Text(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
}

impl IndexValue {
    /// Convert to text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            IndexValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            IndexValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the float if this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            IndexValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Check if this is a numeric value.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, IndexValue::Text(_))
    }
}

/// A single field of an index document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexField {
    name: String,
    value: IndexValue,
    storage: StorageMode,
    index: IndexMode,
    vector: VectorMode,
    boost: f64,
}

impl IndexField {
    /// Create a new field with boost 1.0.
    pub fn new<S: Into<String>>(
        name: S,
        value: IndexValue,
        storage: StorageMode,
        index: IndexMode,
        vector: VectorMode,
    ) -> Self {
        IndexField {
            name: name.into(),
            value,
            storage,
            index,
            vector,
            boost: 1.0,
        }
    }

    /// Create a numeric field. Numeric fields are either analyzed or not
    /// indexed at all, and never carry term vectors.
    pub fn numeric<S: Into<String>>(
        name: S,
        value: IndexValue,
        storage: StorageMode,
        analyzed: bool,
    ) -> Self {
        let index = if analyzed {
            IndexMode::Analyzed
        } else {
            IndexMode::NoIndex
        };
        Self::new(name, value, storage, index, VectorMode::None)
    }

    /// Set the boost.
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &IndexValue {
        &self.value
    }

    pub fn storage(&self) -> StorageMode {
        self.storage
    }

    pub fn index(&self) -> IndexMode {
        self.index
    }

    pub fn vector(&self) -> VectorMode {
        self.vector
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    pub fn is_stored(&self) -> bool {
        self.storage == StorageMode::Store
    }

    pub fn is_analyzed(&self) -> bool {
        self.index == IndexMode::Analyzed
    }
}
