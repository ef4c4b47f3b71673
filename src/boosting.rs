//! Relevance boosts for records and fields.

use std::collections::HashMap;
use std::fmt::Debug;

use crate::indexable::{Indexable, IndexableField};

/// Resolves boost contributions.
///
/// The item boost is applied once to the document. The field boost is added
/// to the configuration boost of every field built from that record field.
pub trait BoostResolver: Send + Sync + Debug {
    /// Boost for the whole record. Values `<= 0` leave the document boost
    /// unchanged.
    fn resolve_item_boost(&self, indexable: &dyn Indexable) -> f64;

    /// Extra boost for one record field.
    fn resolve_field_boost(&self, field: &dyn IndexableField) -> f64;
}

/// Boost resolver backed by fixed tables.
///
/// Records and fields that are not listed get no boost (0.0).
#[derive(Debug, Clone, Default)]
pub struct FixedBoostResolver {
    /// Item boosts by unique id.
    items: HashMap<String, f64>,
    /// Field boosts by lower-cased field name.
    fields: HashMap<String, f64>,
}

impl FixedBoostResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boost the record with the given unique id.
    pub fn with_item_boost<S: Into<String>>(mut self, unique_id: S, boost: f64) -> Self {
        self.items.insert(unique_id.into(), boost);
        self
    }

    /// Boost every record field with the given name.
    pub fn with_field_boost<S: AsRef<str>>(mut self, field_name: S, boost: f64) -> Self {
        self.fields
            .insert(field_name.as_ref().to_lowercase(), boost);
        self
    }
}

impl BoostResolver for FixedBoostResolver {
    fn resolve_item_boost(&self, indexable: &dyn Indexable) -> f64 {
        self.items
            .get(indexable.unique_id())
            .copied()
            .unwrap_or(0.0)
    }

    fn resolve_field_boost(&self, field: &dyn IndexableField) -> f64 {
        self.fields
            .get(&field.name().to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }
}
