//! Schema module for Glaive.
//!
//! This module provides field configurations and the maps that resolve
//! them for record fields and field names.

pub mod field;
pub mod field_map;
#[allow(clippy::module_inception)]
pub mod schema;

// Re-export commonly used types
pub use field::{
    DeclaredType, FieldConfiguration, FieldConfigurationBuilder, IndexMode, NumericClass,
    StorageMode, VectorMode, WriteFormatter, WriteTransform,
};
pub use field_map::{DefaultFieldNameTranslator, FieldMap, FieldNameTranslator};
pub use schema::Schema;
