//! Lookup of field configurations and index field names.

use std::fmt::Debug;
use std::sync::Arc;

use crate::indexable::IndexableField;
use crate::schema::field::FieldConfiguration;

/// Resolves the configuration of a field.
///
/// Two lookups are made per field: the formatting configuration (whose
/// write transform is applied to the value) and the storage configuration
/// (which decides how the field is stored and indexed). Both default to the
/// same lookup; maps that keep them apart override the formatting methods.
pub trait FieldMap: Send + Sync + Debug {
    /// Storage configuration by field name.
    fn field_configuration(&self, name: &str) -> Option<Arc<FieldConfiguration>>;

    /// Storage configuration for a record field.
    fn field_configuration_for(&self, field: &dyn IndexableField)
    -> Option<Arc<FieldConfiguration>>;

    /// Formatting configuration by field name.
    fn format_configuration(&self, name: &str) -> Option<Arc<FieldConfiguration>> {
        self.field_configuration(name)
    }

    /// Formatting configuration for a record field.
    fn format_configuration_for(
        &self,
        field: &dyn IndexableField,
    ) -> Option<Arc<FieldConfiguration>> {
        self.field_configuration_for(field)
    }
}

/// Translates logical field names into index field names.
pub trait FieldNameTranslator: Send + Sync + Debug {
    fn index_field_name(&self, name: &str) -> String;
}

/// Replaces spaces with underscores and, optionally, lower-cases names.
///
/// The translation is idempotent, so names may pass through it more than
/// once.
#[derive(Debug, Clone, Default)]
pub struct DefaultFieldNameTranslator {
    lowercase: bool,
}

impl DefaultFieldNameTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower-case translated names.
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = lowercase;
        self
    }
}

impl FieldNameTranslator for DefaultFieldNameTranslator {
    fn index_field_name(&self, name: &str) -> String {
        let name = name.trim().replace(' ', "_");
        if self.lowercase {
            name.to_lowercase()
        } else {
            name
        }
    }
}
