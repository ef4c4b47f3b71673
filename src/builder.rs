//! Document building.
//!
//! This module turns records into index documents: it resolves the
//! configuration of every field, converts values to the declared index
//! types, evaluates computed fields and applies boosts.
//!
//! # Core Components
//!
//! - [`config::BuilderConfig`] - Session configuration
//! - [`context::IndexingContext`] - Collaborators shared by every build
//! - [`field_factory::FieldFactory`] - Typed field creation
//! - [`document_builder::DocumentBuilder`] - Builds one document

pub mod config;
pub mod context;
pub mod document_builder;
pub mod field_factory;

pub use config::{BuilderConfig, DEFAULT_CONTENT_FIELD};
pub use context::{IndexingContext, IndexingContextBuilder};
pub use document_builder::{DATASOURCE_FIELD, DocumentBuilder, UNIQUE_ID_FIELD};
pub use field_factory::FieldFactory;
