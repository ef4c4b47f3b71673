//! Session-wide collaborators shared by every document build.

use std::fmt;
use std::sync::Arc;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::boosting::{BoostResolver, FixedBoostResolver};
use crate::builder::config::BuilderConfig;
use crate::computed::ComputedField;
use crate::diagnostics::{DiagnosticSink, Diagnostics};
use crate::error::{GlaiveError, Result};
use crate::formatting::{DefaultValueFormatter, ValueFormatter};
use crate::indexable::{DefaultFieldReader, FieldReader};
use crate::schema::field::FieldConfiguration;
use crate::schema::field_map::{DefaultFieldNameTranslator, FieldMap, FieldNameTranslator};

/// Everything a document build reads but never mutates: the field map and
/// other collaborators, the computed field providers, the configuration and
/// the worker pool.
///
/// One context is created per indexing session and shared by all documents
/// built in it.
pub struct IndexingContext {
    config: BuilderConfig,
    field_map: Arc<dyn FieldMap>,
    translator: Arc<dyn FieldNameTranslator>,
    value_formatter: Arc<dyn ValueFormatter>,
    field_reader: Arc<dyn FieldReader>,
    boost_resolver: Arc<dyn BoostResolver>,
    computed_fields: Vec<Arc<dyn ComputedField>>,
    diagnostics: Diagnostics,
    default_text_configuration: Arc<FieldConfiguration>,
    thread_pool: Option<Arc<ThreadPool>>,
}

impl fmt::Debug for IndexingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexingContext")
            .field("config", &self.config)
            .field("field_map", &self.field_map)
            .field("computed_fields", &self.computed_fields)
            .field(
                "thread_pool",
                &self
                    .thread_pool
                    .as_ref()
                    .map(|pool| pool.current_num_threads()),
            )
            .finish()
    }
}

impl IndexingContext {
    /// Start building a context around a field map.
    pub fn builder(field_map: Arc<dyn FieldMap>) -> IndexingContextBuilder {
        IndexingContextBuilder::new(field_map)
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn field_map(&self) -> &dyn FieldMap {
        self.field_map.as_ref()
    }

    pub fn translator(&self) -> &dyn FieldNameTranslator {
        self.translator.as_ref()
    }

    pub fn value_formatter(&self) -> &dyn ValueFormatter {
        self.value_formatter.as_ref()
    }

    pub fn field_reader(&self) -> &dyn FieldReader {
        self.field_reader.as_ref()
    }

    pub fn boost_resolver(&self) -> &dyn BoostResolver {
        self.boost_resolver.as_ref()
    }

    pub fn computed_fields(&self) -> &[Arc<dyn ComputedField>] {
        &self.computed_fields
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Configuration for aggregate text when the field map has none.
    pub fn default_text_configuration(&self) -> &Arc<FieldConfiguration> {
        &self.default_text_configuration
    }

    /// The worker pool, present when the configuration enables parallel
    /// evaluation.
    pub fn thread_pool(&self) -> Option<&ThreadPool> {
        self.thread_pool.as_deref()
    }
}

/// Builder for [`IndexingContext`].
pub struct IndexingContextBuilder {
    config: BuilderConfig,
    field_map: Arc<dyn FieldMap>,
    translator: Arc<dyn FieldNameTranslator>,
    value_formatter: Arc<dyn ValueFormatter>,
    field_reader: Arc<dyn FieldReader>,
    boost_resolver: Arc<dyn BoostResolver>,
    computed_fields: Vec<Arc<dyn ComputedField>>,
    diagnostic_sink: Option<Arc<dyn DiagnosticSink>>,
}

impl IndexingContextBuilder {
    /// Create a builder with default collaborators.
    pub fn new(field_map: Arc<dyn FieldMap>) -> Self {
        IndexingContextBuilder {
            config: BuilderConfig::default(),
            field_map,
            translator: Arc::new(DefaultFieldNameTranslator::new()),
            value_formatter: Arc::new(DefaultValueFormatter),
            field_reader: Arc::new(DefaultFieldReader),
            boost_resolver: Arc::new(FixedBoostResolver::new()),
            computed_fields: Vec::new(),
            diagnostic_sink: None,
        }
    }

    pub fn config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn translator(mut self, translator: Arc<dyn FieldNameTranslator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn value_formatter(mut self, value_formatter: Arc<dyn ValueFormatter>) -> Self {
        self.value_formatter = value_formatter;
        self
    }

    pub fn field_reader(mut self, field_reader: Arc<dyn FieldReader>) -> Self {
        self.field_reader = field_reader;
        self
    }

    pub fn boost_resolver(mut self, boost_resolver: Arc<dyn BoostResolver>) -> Self {
        self.boost_resolver = boost_resolver;
        self
    }

    /// Register a computed field provider.
    pub fn computed_field(mut self, computed_field: Arc<dyn ComputedField>) -> Self {
        self.computed_fields.push(computed_field);
        self
    }

    /// Send verbose diagnostics to a custom sink instead of the `log` facade.
    pub fn diagnostic_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostic_sink = Some(sink);
        self
    }

    /// Build the context, creating the worker pool if parallel evaluation
    /// is enabled.
    pub fn build(self) -> Result<IndexingContext> {
        if self.config.max_parallelism == Some(0) {
            return Err(GlaiveError::invalid_config(
                "max_parallelism must be greater than 0",
            ));
        }

        if self.config.content_field_name.is_empty() {
            return Err(GlaiveError::invalid_config(
                "content_field_name cannot be empty",
            ));
        }

        let thread_pool = if self.config.parallel {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.config.parallelism())
                .thread_name(|i| format!("glaive-computed-{i}"))
                .build()
                .map_err(|e| {
                    GlaiveError::ThreadPool(format!("Failed to create thread pool: {e}"))
                })?;
            Some(Arc::new(pool))
        } else {
            None
        };

        let diagnostics = match self.diagnostic_sink {
            Some(sink) => Diagnostics::with_sink(self.config.verbose, sink),
            None => Diagnostics::new(self.config.verbose),
        };

        let default_text_configuration = Arc::new(FieldConfiguration::default_text(
            self.config.content_field_name.clone(),
        ));

        Ok(IndexingContext {
            config: self.config,
            field_map: self.field_map,
            translator: self.translator,
            value_formatter: self.value_formatter,
            field_reader: self.field_reader,
            boost_resolver: self.boost_resolver,
            computed_fields: self.computed_fields,
            diagnostics,
            default_text_configuration,
            thread_pool,
        })
    }
}
