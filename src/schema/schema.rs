//! In-memory field map.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{GlaiveError, Result};
use crate::indexable::IndexableField;
use crate::schema::field::FieldConfiguration;
use crate::schema::field_map::FieldMap;

/// A schema maps field names, and optionally field type keys, to their
/// configurations.
///
/// Names and type keys are matched case-insensitively. A record field is
/// resolved by its name first and by its type key second.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Map of lower-cased field names to their configurations
    fields: HashMap<String, Arc<FieldConfiguration>>,
    /// Map of lower-cased type keys to their configurations
    types: HashMap<String, Arc<FieldConfiguration>>,
    /// Field names in the order they were added
    field_names: Vec<String>,
}

impl Schema {
    /// Create a new empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field configuration, keyed by its field name.
    pub fn add_field(&mut self, configuration: FieldConfiguration) -> Result<()> {
        let name = configuration.field_name().to_string();

        if name.is_empty() {
            return Err(GlaiveError::schema("Field name cannot be empty"));
        }

        let key = name.to_lowercase();
        if self.fields.contains_key(&key) {
            return Err(GlaiveError::schema(format!("Field '{name}' already exists")));
        }

        self.fields.insert(key, Arc::new(configuration));
        self.field_names.push(name);

        Ok(())
    }

    /// Add a configuration used for record fields of the given type key.
    pub fn add_type_configuration<S: Into<String>>(
        &mut self,
        type_key: S,
        configuration: FieldConfiguration,
    ) -> Result<()> {
        let type_key = type_key.into();

        if type_key.is_empty() {
            return Err(GlaiveError::schema("Type key cannot be empty"));
        }

        let key = type_key.to_lowercase();
        if self.types.contains_key(&key) {
            return Err(GlaiveError::schema(format!(
                "Type '{type_key}' already has a configuration"
            )));
        }

        self.types.insert(key, Arc::new(configuration));

        Ok(())
    }

    /// Get a field configuration by name.
    pub fn get_field(&self, name: &str) -> Option<&Arc<FieldConfiguration>> {
        self.fields.get(&name.to_lowercase())
    }

    /// Check if a field exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_lowercase())
    }

    /// Get all field names in the order they were added.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Get the number of field configurations.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldMap for Schema {
    fn field_configuration(&self, name: &str) -> Option<Arc<FieldConfiguration>> {
        self.get_field(name).cloned()
    }

    fn field_configuration_for(
        &self,
        field: &dyn IndexableField,
    ) -> Option<Arc<FieldConfiguration>> {
        self.get_field(field.name())
            .or_else(|| self.types.get(&field.type_key().to_lowercase()))
            .cloned()
    }
}
