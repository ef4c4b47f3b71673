//! Creation of typed index fields from raw values.
//!
//! The declared type of a field's configuration selects the representation:
//!
//! - **Integral** types parse the value's text as an `i64`.
//! - **Floating-point** types parse it as an `f64` after replacing every
//!   `,` with `.`, so `"3,14"` and `"3.14"` store the same number
//!   whatever the host locale.
//! - Everything else, and numeric values that do not parse, becomes a text
//!   field holding the formatter's storage representation.
//!
//! Null values, and empty strings on numeric types, produce no field.

use crate::diagnostics::Diagnostics;
use crate::document::field::{IndexField, IndexValue};
use crate::document::field_value::FieldValue;
use crate::formatting::ValueFormatter;
use crate::schema::field::FieldConfiguration;

/// Builds [`IndexField`]s from raw values and their configuration.
#[derive(Debug, Clone, Default)]
pub struct FieldFactory {
    diagnostics: Diagnostics,
}

impl FieldFactory {
    pub fn new(diagnostics: Diagnostics) -> Self {
        FieldFactory { diagnostics }
    }

    /// Create the field for one value, or `None` if the value produces no
    /// field.
    ///
    /// The field's boost is the configuration boost plus `boost`.
    pub fn create_field(
        &self,
        name: &str,
        value: &FieldValue,
        configuration: &FieldConfiguration,
        formatter: &dyn ValueFormatter,
        boost: f64,
    ) -> Option<IndexField> {
        if value.is_null() {
            self.diagnostics
                .debug(|| format!("Skipping field {name} - value null"));
            return None;
        }

        self.diagnostics
            .debug(|| describe(name, value, configuration));

        let class = configuration.numeric_class();
        let boost = configuration.boost() + boost;

        if (class.is_integral() || class.is_floating_point()) && value.is_empty_text() {
            self.diagnostics
                .debug(|| format!("Skipping field {name} - value null or empty"));
            return None;
        }

        if class.is_integral() {
            if let Some(number) = parse_integer(value) {
                return Some(
                    IndexField::numeric(
                        name,
                        IndexValue::Integer(number),
                        configuration.storage(),
                        configuration.is_analyzed(),
                    )
                    .with_boost(boost),
                );
            }
            self.diagnostics.debug(|| {
                format!("Field {name} - value '{value}' is not an integer, trying next representation")
            });
        }

        if class.is_floating_point() {
            if let Some(number) = parse_float(value) {
                return Some(
                    IndexField::numeric(
                        name,
                        IndexValue::Float(number),
                        configuration.storage(),
                        configuration.is_analyzed(),
                    )
                    .with_boost(boost),
                );
            }
            self.diagnostics.debug(|| {
                format!("Field {name} - value '{value}' is not a number, indexing as text")
            });
        }

        let formatted = formatter.format_for_index_storage(value, name);
        if formatted.is_null() {
            self.diagnostics
                .debug(|| format!("Skipping field {name} - formatted value null"));
            return None;
        }
        let text = formatted.to_string();

        self.diagnostics
            .debug(|| format!("Field: {name}\n - formattedValue: {text}"));

        Some(
            IndexField::new(
                name,
                IndexValue::Text(text),
                configuration.storage(),
                configuration.index(),
                configuration.vector(),
            )
            .with_boost(boost),
        )
    }
}

/// Parse the value's text as a 64-bit integer.
pub fn parse_integer(value: &FieldValue) -> Option<i64> {
    match value {
        FieldValue::Integer(i) => Some(*i),
        other => other.to_string().trim().parse::<i64>().ok(),
    }
}

/// Parse the value's text as a 64-bit float, treating `,` as the decimal
/// separator too.
pub fn parse_float(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Float(f) => Some(*f),
        FieldValue::Integer(i) => Some(*i as f64),
        other => other
            .to_string()
            .replace(',', ".")
            .trim()
            .parse::<f64>()
            .ok(),
    }
}

fn describe(name: &str, value: &FieldValue, configuration: &FieldConfiguration) -> String {
    format!(
        "Field: {name}\n - value type: {}\n - value: {value}\n - configuration fieldName: {}\n - configuration boost: {}\n - configuration declaredType: {:?} ({:?})\n - configuration storage: {:?}\n - configuration index: {:?}\n - configuration vector: {:?}",
        value.type_name(),
        configuration.field_name(),
        configuration.boost(),
        configuration.declared_type(),
        configuration.numeric_class(),
        configuration.storage(),
        configuration.index(),
        configuration.vector(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use parking_lot::Mutex;

    use super::*;
    use crate::diagnostics::DiagnosticSink;
    use crate::formatting::DefaultValueFormatter;
    use crate::schema::field::{DeclaredType, IndexMode, StorageMode, VectorMode};

    fn config(declared_type: DeclaredType) -> FieldConfiguration {
        FieldConfiguration::builder("field")
            .declared_type(declared_type)
            .build()
    }

    fn create(value: FieldValue, configuration: &FieldConfiguration) -> Option<IndexField> {
        FieldFactory::default().create_field(
            "field",
            &value,
            configuration,
            &DefaultValueFormatter,
            0.0,
        )
    }

    #[test]
    fn test_null_produces_nothing() {
        for declared in [DeclaredType::Text, DeclaredType::Int32, DeclaredType::Double] {
            assert!(create(FieldValue::Null, &config(declared)).is_none());
        }
    }

    #[test]
    fn test_empty_string_on_numeric_produces_nothing() {
        assert!(create(FieldValue::from(""), &config(DeclaredType::Int64)).is_none());
        assert!(create(FieldValue::from(""), &config(DeclaredType::Single)).is_none());

        // Empty text on a text field is still a field.
        let field = create(FieldValue::from(""), &config(DeclaredType::Text)).unwrap();
        assert_eq!(field.value().as_text(), Some(""));
    }

    #[test]
    fn test_integer_parsing() {
        for declared in [
            DeclaredType::Byte,
            DeclaredType::Int16,
            DeclaredType::UInt32,
            DeclaredType::Int64,
        ] {
            let field = create(FieldValue::from("  -42 "), &config(declared)).unwrap();
            assert_eq!(field.value(), &IndexValue::Integer(-42), "{declared:?}");
        }

        let field = create(FieldValue::Integer(i64::MAX), &config(DeclaredType::Int64)).unwrap();
        assert_eq!(field.value(), &IndexValue::Integer(i64::MAX));
    }

    #[test]
    fn test_integer_analysis_follows_index_mode() {
        let analyzed = FieldConfiguration::builder("n")
            .declared_type(DeclaredType::Int32)
            .index(IndexMode::Analyzed)
            .build();
        let field = create(FieldValue::from("7"), &analyzed).unwrap();
        assert!(field.is_analyzed());

        let not_analyzed = FieldConfiguration::builder("n")
            .declared_type(DeclaredType::Int32)
            .index(IndexMode::NotAnalyzed)
            .storage(StorageMode::DoNotStore)
            .build();
        let field = create(FieldValue::from("7"), &not_analyzed).unwrap();
        assert!(!field.is_analyzed());
        assert_eq!(field.storage(), StorageMode::DoNotStore);
        assert_eq!(field.value(), &IndexValue::Integer(7));
    }

    #[test]
    fn test_unparseable_integer_falls_back_to_text() {
        let configuration = FieldConfiguration::builder("n")
            .declared_type(DeclaredType::Int32)
            .vector(VectorMode::WithPositionsAndOffsets)
            .build();
        let field = create(FieldValue::from("twelve"), &configuration).unwrap();
        assert_eq!(field.value(), &IndexValue::Text("twelve".to_string()));
        assert_eq!(field.vector(), VectorMode::WithPositionsAndOffsets);

        // Fractional values are not integers either.
        let field = create(FieldValue::Float(2.5), &configuration).unwrap();
        assert_eq!(field.value(), &IndexValue::Text("2.5".to_string()));
    }

    #[test]
    fn test_comma_and_period_decimals_match() {
        let configuration = config(DeclaredType::Double);
        let comma = create(FieldValue::from("3,14"), &configuration).unwrap();
        let period = create(FieldValue::from("3.14"), &configuration).unwrap();
        assert_eq!(comma.value(), &IndexValue::Float(3.14));
        assert_eq!(comma.value(), period.value());

        let price = create(FieldValue::from("19,99"), &config(DeclaredType::Single)).unwrap();
        assert_eq!(price.value(), &IndexValue::Float(19.99));
    }

    #[test]
    fn test_float_accepts_numeric_values() {
        let configuration = config(DeclaredType::Double);
        let field = create(FieldValue::Integer(3), &configuration).unwrap();
        assert_eq!(field.value(), &IndexValue::Float(3.0));

        let field = create(FieldValue::Float(0.25), &configuration).unwrap();
        assert_eq!(field.value(), &IndexValue::Float(0.25));
    }

    #[test]
    fn test_unparseable_float_falls_back_to_text() {
        let field = create(FieldValue::from("1,234.5"), &config(DeclaredType::Double)).unwrap();
        assert_eq!(field.value(), &IndexValue::Text("1,234.5".to_string()));
    }

    #[test]
    fn test_root_type_tries_integer_then_float() {
        let configuration = config(DeclaredType::Any);
        let field = create(FieldValue::from("12"), &configuration).unwrap();
        assert_eq!(field.value(), &IndexValue::Integer(12));

        let field = create(FieldValue::from("1,5"), &configuration).unwrap();
        assert_eq!(field.value(), &IndexValue::Float(1.5));

        let field = create(FieldValue::from("abc"), &configuration).unwrap();
        assert_eq!(field.value(), &IndexValue::Text("abc".to_string()));
    }

    #[test]
    fn test_text_uses_formatter_and_modes() {
        let configuration = FieldConfiguration::builder("updated")
            .storage(StorageMode::Store)
            .index(IndexMode::NotAnalyzed)
            .build();
        let dt = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        let field = create(FieldValue::DateTime(dt), &configuration).unwrap();

        assert_eq!(field.value(), &IndexValue::Text("20200102T030405Z".to_string()));
        assert_eq!(field.index(), IndexMode::NotAnalyzed);
        assert!(field.is_stored());
    }

    #[test]
    fn test_decimal_is_text() {
        let field = create(FieldValue::from("9.5"), &config(DeclaredType::Decimal)).unwrap();
        assert_eq!(field.value(), &IndexValue::Text("9.5".to_string()));
    }

    #[test]
    fn test_boost_adds_configuration_and_caller() {
        let configuration = FieldConfiguration::builder("title").boost(2.0).build();
        let field = FieldFactory::default()
            .create_field(
                "title",
                &FieldValue::from("x"),
                &configuration,
                &DefaultValueFormatter,
                0.5,
            )
            .unwrap();
        assert_eq!(field.boost(), 2.5);

        let numeric = FieldConfiguration::builder("n")
            .declared_type(DeclaredType::Int32)
            .boost(3.0)
            .build();
        let field = create(FieldValue::from("1"), &numeric).unwrap();
        assert_eq!(field.boost(), 3.0);
    }

    #[test]
    fn test_building_twice_yields_equal_fields() {
        let configuration = config(DeclaredType::Double);
        let first = create(FieldValue::from("2,5"), &configuration).unwrap();
        let second = create(FieldValue::from("2,5"), &configuration).unwrap();
        assert_eq!(first, second);
    }

    #[derive(Debug, Default)]
    struct Recorder {
        messages: Mutex<Vec<String>>,
    }

    impl DiagnosticSink for Recorder {
        fn trace(&self, message: String) {
            self.messages.lock().push(message);
        }
    }

    #[test]
    fn test_diagnostics_do_not_change_result() {
        let recorder = Arc::new(Recorder::default());
        let verbose = FieldFactory::new(Diagnostics::with_sink(true, recorder.clone()));
        let quiet = FieldFactory::default();
        let configuration = config(DeclaredType::Int32);

        for value in [FieldValue::from("5"), FieldValue::from("five"), FieldValue::Null] {
            assert_eq!(
                verbose.create_field("field", &value, &configuration, &DefaultValueFormatter, 0.0),
                quiet.create_field("field", &value, &configuration, &DefaultValueFormatter, 0.0),
            );
        }

        let messages = recorder.messages.lock();
        assert!(messages.iter().any(|m| m == "Skipping field field - value null"));
        assert!(messages.iter().any(|m| m.contains("declaredType: Int32")));
    }
}
