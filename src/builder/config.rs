//! Configuration for document building.

use serde::{Deserialize, Serialize};

/// Name of the aggregate field all free text is copied into.
pub const DEFAULT_CONTENT_FIELD: &str = "_content";

/// Configuration for a document building session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Whether verbose diagnostics are produced.
    pub verbose: bool,

    /// Whether computed fields are evaluated on a worker pool.
    pub parallel: bool,

    /// Worker pool size for parallel evaluation.
    /// If None, uses the number of CPU cores.
    pub max_parallelism: Option<usize>,

    /// Whether a failing computed field fails the whole document.
    pub stop_on_error: bool,

    /// Name of the aggregate text field.
    pub content_field_name: String,

    /// Whether every record field is indexed, or only `included_fields`.
    pub index_all_fields: bool,

    /// Fields indexed when `index_all_fields` is off.
    pub included_fields: Vec<String>,

    /// Fields never indexed.
    pub excluded_fields: Vec<String>,

    /// Whether the `_uniqueid` and `_datasource` fields are added.
    pub add_special_fields: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            parallel: false,
            max_parallelism: None,
            stop_on_error: false,
            content_field_name: DEFAULT_CONTENT_FIELD.to_string(),
            index_all_fields: true,
            included_fields: Vec::new(),
            excluded_fields: Vec::new(),
            add_special_fields: true,
        }
    }
}

impl BuilderConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable verbose diagnostics.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Evaluate computed fields in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the worker pool size.
    pub fn with_max_parallelism(mut self, max_parallelism: usize) -> Self {
        self.max_parallelism = Some(max_parallelism);
        self
    }

    /// Fail the document on the first computed field error.
    pub fn with_stop_on_error(mut self, stop_on_error: bool) -> Self {
        self.stop_on_error = stop_on_error;
        self
    }

    /// Set the aggregate text field name.
    pub fn with_content_field_name<S: Into<String>>(mut self, name: S) -> Self {
        self.content_field_name = name.into();
        self
    }

    /// Index only the named fields.
    pub fn with_included_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_all_fields = false;
        self.included_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Never index the named fields.
    pub fn with_excluded_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable the special fields.
    pub fn with_special_fields(mut self, add_special_fields: bool) -> Self {
        self.add_special_fields = add_special_fields;
        self
    }

    /// Worker pool size, falling back to the number of CPU cores.
    pub fn parallelism(&self) -> usize {
        self.max_parallelism.unwrap_or_else(num_cpus::get)
    }

    /// Whether a record field with this name is indexed.
    pub fn should_index_field(&self, name: &str) -> bool {
        if self
            .excluded_fields
            .iter()
            .any(|f| f.eq_ignore_ascii_case(name))
        {
            return false;
        }
        self.index_all_fields
            || self
                .included_fields
                .iter()
                .any(|f| f.eq_ignore_ascii_case(name))
    }
}
