//! Records that can be turned into index documents.
//!
//! The document builder only reads from a record: its unique id, its data
//! source name and its named fields. [`DataRecord`] is an in-memory
//! implementation for hosts that have nothing more specific.

use std::collections::HashMap;
use std::fmt::Debug;

use uuid::Uuid;

use crate::document::field_value::FieldValue;

/// Type keys treated as free text by [`IndexableField::is_text_field`].
pub const TEXT_TYPE_KEYS: [&str; 6] = [
    "text",
    "single-line text",
    "multi-line text",
    "rich text",
    "memo",
    "html",
];

/// A named field of a record.
pub trait IndexableField: Send + Sync + Debug {
    /// Stable identifier of the field.
    fn id(&self) -> &str;

    /// Logical name of the field.
    fn name(&self) -> &str;

    /// Key naming the field's type (e.g. "single-line text", "integer").
    fn type_key(&self) -> &str;

    /// The raw value of the field.
    fn value(&self) -> &FieldValue;

    /// Whether the field holds free text that also belongs in the
    /// aggregate content field.
    fn is_text_field(&self) -> bool {
        let key = self.type_key();
        TEXT_TYPE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
    }
}

/// A record to be indexed.
pub trait Indexable: Send + Sync + Debug {
    /// Unique identifier, used for diagnostics and the `_uniqueid` field.
    fn unique_id(&self) -> &str;

    /// Name of the source the record came from.
    fn data_source(&self) -> &str;

    /// All fields of the record.
    fn fields(&self) -> Vec<&dyn IndexableField>;

    /// Look up a field by name, ignoring case.
    fn field(&self, name: &str) -> Option<&dyn IndexableField> {
        self.fields()
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

/// Reads the raw value of a record field.
pub trait FieldReader: Send + Sync + Debug {
    fn field_value(&self, field: &dyn IndexableField) -> FieldValue;
}

/// Field reader that returns the field's own value.
#[derive(Debug, Clone, Default)]
pub struct DefaultFieldReader;

impl FieldReader for DefaultFieldReader {
    fn field_value(&self, field: &dyn IndexableField) -> FieldValue {
        field.value().clone()
    }
}

/// An in-memory record field.
#[derive(Debug, Clone, PartialEq)]
pub struct DataField {
    id: String,
    name: String,
    type_key: String,
    value: FieldValue,
}

impl DataField {
    /// Create a field whose id is its name.
    pub fn new<N, T, V>(name: N, type_key: T, value: V) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        V: Into<FieldValue>,
    {
        let name = name.into();
        DataField {
            id: name.clone(),
            name,
            type_key: type_key.into(),
            value: value.into(),
        }
    }

    /// Set an explicit id.
    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = id.into();
        self
    }
}

impl IndexableField for DataField {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_key(&self) -> &str {
        &self.type_key
    }

    fn value(&self) -> &FieldValue {
        &self.value
    }
}

/// An in-memory record.
#[derive(Debug, Clone)]
pub struct DataRecord {
    unique_id: String,
    data_source: String,
    fields: Vec<DataField>,
    positions: HashMap<String, usize>,
}

impl DataRecord {
    /// Create an empty record with the given id.
    pub fn new<S: Into<String>>(unique_id: S) -> Self {
        DataRecord {
            unique_id: unique_id.into(),
            data_source: String::new(),
            fields: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Create an empty record with a generated id.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Set the data source name.
    pub fn with_data_source<S: Into<String>>(mut self, data_source: S) -> Self {
        self.data_source = data_source.into();
        self
    }

    /// Add a field, replacing any field with the same name.
    pub fn add_field(&mut self, field: DataField) {
        let key = field.name.to_lowercase();
        match self.positions.get(&key) {
            Some(&pos) => self.fields[pos] = field,
            None => {
                self.positions.insert(key, self.fields.len());
                self.fields.push(field);
            }
        }
    }

    /// Builder-style [`DataRecord::add_field`].
    pub fn with_field<N, T, V>(mut self, name: N, type_key: T, value: V) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        V: Into<FieldValue>,
    {
        self.add_field(DataField::new(name, type_key, value));
        self
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Indexable for DataRecord {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn data_source(&self) -> &str {
        &self.data_source
    }

    fn fields(&self) -> Vec<&dyn IndexableField> {
        self.fields
            .iter()
            .map(|f| f as &dyn IndexableField)
            .collect()
    }

    fn field(&self, name: &str) -> Option<&dyn IndexableField> {
        self.positions
            .get(&name.to_lowercase())
            .map(|&pos| &self.fields[pos] as &dyn IndexableField)
    }
}
