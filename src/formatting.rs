//! Conversion of values into their stored representation.

use std::fmt::Debug;

use crate::document::field_value::FieldValue;

/// Date layout used for stored dates; sorts lexically in time order.
pub const STORAGE_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Converts a value into the canonical form stored in the index.
pub trait ValueFormatter: Send + Sync + Debug {
    fn format_for_index_storage(&self, value: &FieldValue, field_name: &str) -> FieldValue;
}

/// The formatter used when the host does not supply one.
///
/// Dates become [`STORAGE_DATE_FORMAT`] text, booleans `"true"`/`"false"`,
/// binary data lowercase hex. Lists are formatted element by element and
/// every other value is returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct DefaultValueFormatter;

impl ValueFormatter for DefaultValueFormatter {
    fn format_for_index_storage(&self, value: &FieldValue, field_name: &str) -> FieldValue {
        match value {
            FieldValue::DateTime(dt) => FieldValue::Text(dt.format(STORAGE_DATE_FORMAT).to_string()),
            FieldValue::Boolean(_) | FieldValue::Binary(_) => FieldValue::Text(value.to_string()),
            FieldValue::List(values) => FieldValue::List(
                values
                    .iter()
                    .map(|v| self.format_for_index_storage(v, field_name))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}
