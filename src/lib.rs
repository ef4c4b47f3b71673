//! # Glaive
//!
//! Builds search index documents from application records.
//!
//! ## Features
//!
//! - Per-field storage, analysis and term vector configuration
//! - Conversion of loosely typed values to integer, float and text fields
//! - Aggregate `_content` field for free text
//! - Computed fields, evaluated sequentially or on a worker pool
//! - Item and field boosts

pub mod boosting;
pub mod builder;
pub mod computed;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod formatting;
pub mod indexable;
pub mod schema;

pub mod prelude {
    pub use crate::boosting::{BoostResolver, FixedBoostResolver};
    pub use crate::builder::{BuilderConfig, DocumentBuilder, IndexingContext};
    pub use crate::computed::{ComputedField, FnComputedField};
    pub use crate::document::document::IndexDocument;
    pub use crate::document::field::{IndexField, IndexValue};
    pub use crate::document::field_value::FieldValue;
    pub use crate::error::{GlaiveError, Result};
    pub use crate::indexable::{DataField, DataRecord, Indexable, IndexableField};
    pub use crate::schema::{DeclaredType, FieldConfiguration, FieldMap, Schema};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
