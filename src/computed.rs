//! Computed fields.
//!
//! A computed field derives one value from a record instead of reading a
//! field directly. Providers must not mutate the record; they may run
//! concurrently with each other.
//!
//! ```
//! use glaive::computed::{ComputedField, FnComputedField};
//! use glaive::document::field_value::FieldValue;
//! use glaive::indexable::{DataRecord, Indexable};
//!
//! let id_length = FnComputedField::new("id_length", |record: &dyn Indexable| {
//!     Ok(FieldValue::Integer(record.unique_id().len() as i64))
//! });
//!
//! let value = id_length.compute_value(&DataRecord::new("item-1")).unwrap();
//! assert_eq!(value, FieldValue::Integer(6));
//! ```

use std::fmt;

use crate::document::field_value::FieldValue;
use crate::indexable::Indexable;

/// Produces the value of one derived field.
pub trait ComputedField: Send + Sync + fmt::Debug {
    /// Name of the field the value is indexed under.
    fn field_name(&self) -> &str;

    /// Compute the value for a record.
    fn compute_value(&self, indexable: &dyn Indexable) -> anyhow::Result<FieldValue>;
}

type ComputeFn = dyn Fn(&dyn Indexable) -> anyhow::Result<FieldValue> + Send + Sync;

/// A computed field backed by a closure.
pub struct FnComputedField {
    field_name: String,
    compute: Box<ComputeFn>,
}

impl FnComputedField {
    pub fn new<S, F>(field_name: S, compute: F) -> Self
    where
        S: Into<String>,
        F: Fn(&dyn Indexable) -> anyhow::Result<FieldValue> + Send + Sync + 'static,
    {
        FnComputedField {
            field_name: field_name.into(),
            compute: Box::new(compute),
        }
    }
}

impl fmt::Debug for FnComputedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComputedField")
            .field("field_name", &self.field_name)
            .finish()
    }
}

impl ComputedField for FnComputedField {
    fn field_name(&self) -> &str {
        &self.field_name
    }

    fn compute_value(&self, indexable: &dyn Indexable) -> anyhow::Result<FieldValue> {
        (self.compute)(indexable)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use super::*;
    use crate::indexable::DataRecord;

    #[test]
    fn test_failing_provider() {
        let provider = FnComputedField::new("broken", |_: &dyn Indexable| bail!("no data"));
        assert_eq!(provider.field_name(), "broken");

        let err = provider
            .compute_value(&DataRecord::new("item-1"))
            .unwrap_err();
        assert_eq!(err.to_string(), "no data");
    }

    #[test]
    fn test_provider_reads_record() {
        let provider = FnComputedField::new("title_upper", |record: &dyn Indexable| {
            Ok(record
                .field("title")
                .map(|f| FieldValue::Text(f.value().to_string().to_uppercase()))
                .unwrap_or(FieldValue::Null))
        });

        let record = DataRecord::new("item-1").with_field("title", "text", "hello");
        assert_eq!(
            provider.compute_value(&record).unwrap(),
            FieldValue::from("HELLO")
        );
        assert!(
            provider
                .compute_value(&DataRecord::new("item-2"))
                .unwrap()
                .is_null()
        );
    }
}
