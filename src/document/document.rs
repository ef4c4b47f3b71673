//! Finished index documents.

use serde::{Deserialize, Serialize};

use crate::document::field::IndexField;

/// A document ready to be handed to the search engine.
///
/// The item-level boost lives on the document; field-level boosts live on
/// each field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// The fields of this document, in no particular order
    fields: Vec<IndexField>,
    /// Document boost
    boost: f64,
}

impl IndexDocument {
    /// Create a document with boost 1.0.
    pub fn new(fields: Vec<IndexField>) -> Self {
        IndexDocument { fields, boost: 1.0 }
    }

    /// Set the document boost.
    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    pub fn fields(&self) -> &[IndexField] {
        &self.fields
    }

    /// All fields with the given name.
    pub fn get_fields<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a IndexField> + 'a {
        self.fields.iter().filter(move |f| f.name() == name)
    }

    /// The first field with the given name.
    pub fn get_field(&self, name: &str) -> Option<&IndexField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Check if the document has a field with the given name.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the document into its fields.
    pub fn into_fields(self) -> Vec<IndexField> {
        self.fields
    }
}

impl Default for IndexDocument {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
