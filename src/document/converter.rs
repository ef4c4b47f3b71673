//! JSON record converter.
//!
//! Converts JSON objects into [`DataRecord`]s. Each top-level key becomes a
//! record field:
//! ```json
//! {"id": "item-1", "title": "Rust Programming", "year": 2024, "tags": ["a", "b"]}
//! ```
//!
//! Type keys are inferred from the JSON type: strings are `text`, integers
//! `integer`, other numbers `number`, booleans `checkbox`, arrays
//! `multilist`, and nested objects are kept as their JSON text.

use std::io::BufRead;

use serde_json::Value;

use crate::document::field_value::FieldValue;
use crate::error::{GlaiveError, Result};
use crate::indexable::{DataField, DataRecord};

/// A record converter for JSON objects.
#[derive(Debug, Clone)]
pub struct JsonRecordConverter {
    /// Key holding the record's unique id.
    id_field: String,
    /// Data source name given to converted records.
    data_source: String,
}

impl Default for JsonRecordConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonRecordConverter {
    /// Create a converter reading the id from the `id` key.
    pub fn new() -> Self {
        JsonRecordConverter {
            id_field: "id".to_string(),
            data_source: String::new(),
        }
    }

    /// Read the id from a different key.
    pub fn with_id_field<S: Into<String>>(mut self, id_field: S) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Set the data source name of converted records.
    pub fn with_data_source<S: Into<String>>(mut self, data_source: S) -> Self {
        self.data_source = data_source.into();
        self
    }

    /// Convert a JSON value into a field value.
    pub fn to_field_value(value: &Value) -> FieldValue {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    FieldValue::Text(n.to_string())
                }
            }
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(values) => {
                FieldValue::List(values.iter().map(Self::to_field_value).collect())
            }
            Value::Object(_) => FieldValue::Text(value.to_string()),
        }
    }

    fn type_key(value: &Value) -> &'static str {
        match value {
            Value::Null | Value::String(_) | Value::Object(_) => "text",
            Value::Bool(_) => "checkbox",
            Value::Number(n) if n.is_i64() => "integer",
            Value::Number(_) => "number",
            Value::Array(_) => "multilist",
        }
    }

    /// Convert a JSON object into a record.
    ///
    /// Records without the id key get a generated id.
    pub fn convert_value(&self, value: &Value) -> Result<DataRecord> {
        let map = value
            .as_object()
            .ok_or_else(|| GlaiveError::invalid_argument("JSON record must be an object"))?;

        let mut record = match map.get(&self.id_field) {
            Some(Value::String(id)) => DataRecord::new(id.clone()),
            Some(Value::Number(id)) => DataRecord::new(id.to_string()),
            Some(other) => {
                return Err(GlaiveError::invalid_argument(format!(
                    "Id field '{}' must be a string or number, got {other}",
                    self.id_field
                )));
            }
            None => DataRecord::with_generated_id(),
        }
        .with_data_source(self.data_source.clone());

        for (key, val) in map {
            record.add_field(DataField::new(
                key.clone(),
                Self::type_key(val),
                Self::to_field_value(val),
            ));
        }

        Ok(record)
    }

    /// Parse and convert a single JSON object.
    pub fn convert_str(&self, json: &str) -> Result<DataRecord> {
        let value: Value = serde_json::from_str(json)?;
        self.convert_value(&value)
    }

    /// Convert JSON Lines input, one record per non-empty line.
    pub fn convert_lines<R: BufRead>(&self, reader: R) -> Result<Vec<DataRecord>> {
        let mut records = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|e| GlaiveError::other(format!("Failed to read line: {e}")))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record = self.convert_str(line).map_err(|e| {
                GlaiveError::other(format!("Line {}: {e}", line_num + 1))
            })?;
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexable::Indexable;

    #[test]
    fn test_convert_object() {
        let converter = JsonRecordConverter::new().with_data_source("web");
        let record = converter
            .convert_str(
                r#"{"id": "item-1", "title": "Rust", "year": 2024, "price": 19.99,
                    "active": true, "tags": ["a", "b"], "meta": {"k": 1}, "gone": null}"#,
            )
            .unwrap();

        assert_eq!(record.unique_id(), "item-1");
        assert_eq!(record.data_source(), "web");

        let year = record.field("year").unwrap();
        assert_eq!(year.type_key(), "integer");
        assert_eq!(year.value(), &FieldValue::Integer(2024));

        let price = record.field("price").unwrap();
        assert_eq!(price.type_key(), "number");
        assert_eq!(price.value(), &FieldValue::Float(19.99));

        assert_eq!(record.field("active").unwrap().type_key(), "checkbox");
        assert_eq!(
            record.field("tags").unwrap().value(),
            &FieldValue::from(vec!["a", "b"])
        );
        assert_eq!(
            record.field("meta").unwrap().value(),
            &FieldValue::from(r#"{"k":1}"#)
        );
        assert!(record.field("gone").unwrap().value().is_null());
    }

    #[test]
    fn test_custom_id_and_generated_id() {
        let converter = JsonRecordConverter::new().with_id_field("sku");
        let record = converter.convert_str(r#"{"sku": 42}"#).unwrap();
        assert_eq!(record.unique_id(), "42");

        let record = converter.convert_str(r#"{"title": "x"}"#).unwrap();
        assert!(!record.unique_id().is_empty());
    }

    #[test]
    fn test_rejects_non_objects() {
        let converter = JsonRecordConverter::new();
        assert!(converter.convert_str("[1, 2]").is_err());
        assert!(converter.convert_str(r#"{"id": [1]}"#).is_err());
        assert!(matches!(
            converter.convert_str("{").unwrap_err(),
            GlaiveError::Json(_)
        ));
    }

    #[test]
    fn test_convert_lines() {
        let input = "{\"id\": \"1\"}\n\n{\"id\": \"2\", \"title\": \"b\"}\n";
        let records = JsonRecordConverter::new()
            .convert_lines(input.as_bytes())
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].unique_id(), "2");

        let err = JsonRecordConverter::new()
            .convert_lines("{\"id\": \"1\"}\nnot json\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }
}
