//! Field configurations for index fields.
//!
//! A [`FieldConfiguration`] describes how one logical field is stored,
//! indexed, analyzed and boosted, and which type its values are declared
//! as. Configurations are immutable once built and shared through `Arc`
//! by every field that uses them.

use std::fmt::{Debug, Write};
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;

/// Whether the original value is kept in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageMode {
    Store,
    DoNotStore,
}

/// How the value is indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexMode {
    /// Tokenized by the analyzer.
    Analyzed,
    /// Indexed as a single term.
    NotAnalyzed,
    /// Not searchable.
    NoIndex,
}

/// Term vector settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorMode {
    None,
    WithPositionsAndOffsets,
}

/// The type a field's values are declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclaredType {
    Text,
    Boolean,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    DateTime,
    /// A value-type root that every numeric type converts to.
    ValueType,
    /// The root of all types.
    Any,
}

/// Numeric classification of a declared type.
///
/// A declared type is integer-like when a value of any of the eight
/// integral types (i8..u64) can be stored in it without narrowing, and
/// floating-point-like when a `Single` or `Double` can. The root types
/// accept both, in which case the integer parse is attempted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericClass {
    Integral,
    FloatingPoint,
    IntegralOrFloatingPoint,
    NonNumeric,
}

impl NumericClass {
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            NumericClass::Integral | NumericClass::IntegralOrFloatingPoint
        )
    }

    pub fn is_floating_point(self) -> bool {
        matches!(
            self,
            NumericClass::FloatingPoint | NumericClass::IntegralOrFloatingPoint
        )
    }
}

impl DeclaredType {
    /// The integral source types probed by [`DeclaredType::numeric_class`].
    const INTEGRAL_SOURCES: [DeclaredType; 8] = [
        DeclaredType::Int32,
        DeclaredType::UInt32,
        DeclaredType::Int16,
        DeclaredType::UInt16,
        DeclaredType::Int64,
        DeclaredType::UInt64,
        DeclaredType::Byte,
        DeclaredType::SByte,
    ];

    const FLOATING_POINT_SOURCES: [DeclaredType; 2] = [DeclaredType::Double, DeclaredType::Single];

    /// Returns true if a value of type `source` can be held by this type
    /// as-is. Only identity and the root types qualify; widening numeric
    /// conversions (`Int16` into `Int64`) are not assignments.
    pub fn is_assignable_from(self, source: DeclaredType) -> bool {
        match self {
            DeclaredType::Any => true,
            DeclaredType::ValueType => !matches!(source, DeclaredType::Text | DeclaredType::Any),
            _ => self == source,
        }
    }

    /// Classify this type for numeric parsing.
    pub fn numeric_class(self) -> NumericClass {
        let integral = Self::INTEGRAL_SOURCES
            .iter()
            .any(|source| self.is_assignable_from(*source));
        let floating = Self::FLOATING_POINT_SOURCES
            .iter()
            .any(|source| self.is_assignable_from(*source));

        match (integral, floating) {
            (true, true) => NumericClass::IntegralOrFloatingPoint,
            (true, false) => NumericClass::Integral,
            (false, true) => NumericClass::FloatingPoint,
            (false, false) => NumericClass::NonNumeric,
        }
    }
}

/// A write-time transform supplied by the host.
pub trait WriteFormatter: Send + Sync + Debug {
    /// Transform one value before it is turned into an index field.
    fn format_for_writing(&self, value: FieldValue) -> FieldValue;
}

/// Transform applied to values before they reach the field factory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum WriteTransform {
    #[default]
    None,
    Lowercase,
    Trim,
    /// Format date values with a chrono pattern. Text values that parse as
    /// RFC 3339 or `%Y-%m-%dT%H:%M:%S` are reformatted too. Values are left
    /// unchanged if the pattern is not a valid chrono format.
    DateFormat(String),
    #[serde(skip)]
    Custom(Arc<dyn WriteFormatter>),
}

impl WriteTransform {
    /// Apply the transform. Lists are transformed element by element.
    pub fn apply(&self, value: FieldValue) -> FieldValue {
        match (self, value) {
            (WriteTransform::None, value) => value,
            (WriteTransform::Custom(formatter), value) => formatter.format_for_writing(value),
            (_, FieldValue::List(values)) => {
                FieldValue::List(values.into_iter().map(|v| self.apply(v)).collect())
            }
            (WriteTransform::Lowercase, FieldValue::Text(s)) => FieldValue::Text(s.to_lowercase()),
            (WriteTransform::Trim, FieldValue::Text(s)) => FieldValue::Text(s.trim().to_string()),
            (WriteTransform::DateFormat(pattern), FieldValue::DateTime(dt)) => {
                match format_date(&dt, pattern) {
                    Some(text) => FieldValue::Text(text),
                    None => FieldValue::DateTime(dt),
                }
            }
            (WriteTransform::DateFormat(pattern), FieldValue::Text(s)) => {
                match parse_date(&s).and_then(|dt| format_date(&dt, pattern)) {
                    Some(text) => FieldValue::Text(text),
                    None => FieldValue::Text(s),
                }
            }
            (_, value) => value,
        }
    }
}

fn format_date(dt: &DateTime<Utc>, pattern: &str) -> Option<String> {
    let mut text = String::new();
    if write!(text, "{}", dt.format(pattern)).is_err() {
        log::warn!("Invalid date format pattern: {pattern:?}");
        return None;
    }
    Some(text)
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Describes how one field is stored, indexed and boosted.
#[derive(Debug, Clone)]
pub struct FieldConfiguration {
    field_name: String,
    storage: StorageMode,
    index: IndexMode,
    vector: VectorMode,
    boost: f64,
    declared_type: DeclaredType,
    numeric_class: NumericClass,
    transform: WriteTransform,
}

impl FieldConfiguration {
    /// Create a builder for a configuration with the given field name.
    pub fn builder<S: Into<String>>(field_name: S) -> FieldConfigurationBuilder {
        FieldConfigurationBuilder::new(field_name)
    }

    /// The default configuration for free text: not stored, analyzed, no
    /// term vectors, boost 1.0.
    pub fn default_text<S: Into<String>>(field_name: S) -> Self {
        Self::builder(field_name)
            .storage(StorageMode::DoNotStore)
            .index(IndexMode::Analyzed)
            .vector(VectorMode::None)
            .boost(1.0)
            .build()
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn storage(&self) -> StorageMode {
        self.storage
    }

    pub fn index(&self) -> IndexMode {
        self.index
    }

    pub fn vector(&self) -> VectorMode {
        self.vector
    }

    pub fn boost(&self) -> f64 {
        self.boost
    }

    pub fn declared_type(&self) -> DeclaredType {
        self.declared_type
    }

    /// Numeric classification of the declared type, computed at build time.
    pub fn numeric_class(&self) -> NumericClass {
        self.numeric_class
    }

    pub fn is_analyzed(&self) -> bool {
        self.index == IndexMode::Analyzed
    }

    pub fn transform(&self) -> &WriteTransform {
        &self.transform
    }

    /// Apply this configuration's write-time transform to a value.
    pub fn format_for_writing(&self, value: FieldValue) -> FieldValue {
        self.transform.apply(value)
    }
}

/// Builder for [`FieldConfiguration`].
#[derive(Debug, Clone)]
pub struct FieldConfigurationBuilder {
    field_name: String,
    storage: StorageMode,
    index: IndexMode,
    vector: VectorMode,
    boost: f64,
    declared_type: DeclaredType,
    transform: WriteTransform,
}

impl FieldConfigurationBuilder {
    /// Create a new builder with default settings (stored, analyzed, text).
    pub fn new<S: Into<String>>(field_name: S) -> Self {
        FieldConfigurationBuilder {
            field_name: field_name.into(),
            storage: StorageMode::Store,
            index: IndexMode::Analyzed,
            vector: VectorMode::None,
            boost: 1.0,
            declared_type: DeclaredType::Text,
            transform: WriteTransform::None,
        }
    }

    pub fn storage(mut self, storage: StorageMode) -> Self {
        self.storage = storage;
        self
    }

    pub fn index(mut self, index: IndexMode) -> Self {
        self.index = index;
        self
    }

    pub fn vector(mut self, vector: VectorMode) -> Self {
        self.vector = vector;
        self
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    pub fn declared_type(mut self, declared_type: DeclaredType) -> Self {
        self.declared_type = declared_type;
        self
    }

    pub fn transform(mut self, transform: WriteTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> FieldConfiguration {
        FieldConfiguration {
            numeric_class: self.declared_type.numeric_class(),
            field_name: self.field_name,
            storage: self.storage,
            index: self.index,
            vector: self.vector,
            boost: self.boost,
            declared_type: self.declared_type,
            transform: self.transform,
        }
    }
}
