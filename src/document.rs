//! Document module.
//!
//! This module provides the values read from records and the fields and
//! documents produced from them.
//!
//! # Core Components
//!
//! - [`field_value::FieldValue`] - Raw, loosely typed record values
//! - [`field::IndexField`] - A typed, weighted field ready for the engine
//! - [`field_queue::FieldQueue`] - Concurrent collection of built fields
//! - [`document::IndexDocument`] - The finished document
//! - [`converter::JsonRecordConverter`] - Builds records from JSON
//!
//! # Examples
//!
//! ```
//! use glaive::document::document::IndexDocument;
//! use glaive::document::field::{IndexField, IndexValue};
//! use glaive::schema::StorageMode;
//!
//! let doc = IndexDocument::new(vec![IndexField::numeric(
//!     "year",
//!     IndexValue::Integer(2024),
//!     StorageMode::Store,
//!     true,
//! )])
//! .with_boost(1.5);
//!
//! assert_eq!(doc.len(), 1);
//! assert!(doc.has_field("year"));
//! ```

pub mod converter;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field;
pub mod field_queue;
pub mod field_value;
