//! Error types for the Glaive library.
//!
//! All errors are represented by the [`GlaiveError`] enum. Conditions that
//! only cause a field to be skipped (missing configuration, absent values,
//! numeric values that do not parse) are not errors; they surface as `None`
//! from the builders.
//!
//! # Examples
//!
//! ```
//! use glaive::error::{GlaiveError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(GlaiveError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for Glaive operations.
#[derive(Error, Debug)]
pub enum GlaiveError {
    /// Field-related errors
    #[error("Field error: {0}")]
    Field(String),

    /// Schema-related errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// A computed field provider failed to produce a value.
    #[error("Could not compute value for computed field: {field_name} for indexable: {unique_id}")]
    ComputedField {
        /// Name of the field the provider populates.
        field_name: String,
        /// Unique id of the record being indexed.
        unique_id: String,
        /// The provider's failure.
        #[source]
        source: anyhow::Error,
    },

    /// Several failures collected from concurrent work.
    #[error("{} errors occurred: [{}]", .0.len(), join_messages(.0))]
    Aggregate(Vec<GlaiveError>),

    /// Thread pool errors
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

fn join_messages(errors: &[GlaiveError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for operations that may fail with GlaiveError.
pub type Result<T> = std::result::Result<T, GlaiveError>;

impl GlaiveError {
    /// Create a new field error.
    pub fn field<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Field(msg.into())
    }

    /// Create a new schema error.
    pub fn schema<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Schema(msg.into())
    }

    /// Create a new computed field error.
    pub fn computed_field<F, U>(field_name: F, unique_id: U, source: anyhow::Error) -> Self
    where
        F: Into<String>,
        U: Into<String>,
    {
        GlaiveError::ComputedField {
            field_name: field_name.into(),
            unique_id: unique_id.into(),
            source,
        }
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Other(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Other(format!("Invalid configuration: {}", msg.into()))
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Other(format!("Internal error: {}", msg.into()))
    }

    /// Returns true if this error wraps more than one cause.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, GlaiveError::Aggregate(_))
    }

    /// The individual causes of this error.
    ///
    /// An [`GlaiveError::Aggregate`] yields each collected error, any other
    /// variant yields itself.
    pub fn causes(&self) -> Vec<&GlaiveError> {
        match self {
            GlaiveError::Aggregate(errors) => errors.iter().collect(),
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = GlaiveError::field("Test field error");
        assert_eq!(error.to_string(), "Field error: Test field error");

        let error = GlaiveError::schema("Test schema error");
        assert_eq!(error.to_string(), "Schema error: Test schema error");

        let error = GlaiveError::invalid_config("max_parallelism must be > 0");
        assert_eq!(
            error.to_string(),
            "Error: Invalid configuration: max_parallelism must be > 0"
        );
    }

    #[test]
    fn test_computed_field_error_keeps_source() {
        let error =
            GlaiveError::computed_field("tags", "item-1", anyhow::anyhow!("provider exploded"));
        assert_eq!(
            error.to_string(),
            "Could not compute value for computed field: tags for indexable: item-1"
        );

        let source = std::error::Error::source(&error).expect("source should be set");
        assert_eq!(source.to_string(), "provider exploded");
    }

    #[test]
    fn test_causes() {
        let single = GlaiveError::other("one");
        assert!(!single.is_aggregate());
        assert_eq!(single.causes().len(), 1);

        let aggregate = GlaiveError::Aggregate(vec![
            GlaiveError::other("first"),
            GlaiveError::other("second"),
        ]);
        assert!(aggregate.is_aggregate());
        assert_eq!(aggregate.causes().len(), 2);
        assert_eq!(
            aggregate.to_string(),
            "2 errors occurred: [Error: first; Error: second]"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        match GlaiveError::from(json_error) {
            GlaiveError::Json(_) => {}
            _ => panic!("Expected JSON error variant"),
        }
    }
}
