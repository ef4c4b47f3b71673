//! Building one index document from one record.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rayon::prelude::*;

use crate::builder::context::IndexingContext;
use crate::builder::field_factory::FieldFactory;
use crate::computed::ComputedField;
use crate::document::document::IndexDocument;
use crate::document::field::{IndexField, IndexValue};
use crate::document::field_queue::FieldQueue;
use crate::document::field_value::FieldValue;
use crate::error::{GlaiveError, Result};
use crate::indexable::{Indexable, IndexableField};
use crate::schema::field::{FieldConfiguration, IndexMode, StorageMode, VectorMode};

/// Field holding the record's unique id.
pub const UNIQUE_ID_FIELD: &str = "_uniqueid";

/// Field holding the record's data source name.
pub const DATASOURCE_FIELD: &str = "_datasource";

/// Builds the fields of one record into an [`IndexDocument`].
///
/// All `add_*` methods take `&self`: fields are appended to a concurrent
/// queue, so computed fields can be added from worker threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use glaive::builder::{DocumentBuilder, IndexingContext};
/// use glaive::indexable::DataRecord;
/// use glaive::schema::{FieldConfiguration, Schema};
///
/// let mut schema = Schema::new();
/// schema.add_field(FieldConfiguration::builder("title").boost(2.0).build()).unwrap();
/// let context = IndexingContext::builder(Arc::new(schema)).build().unwrap();
///
/// let record = DataRecord::new("item-1").with_field("title", "single-line text", "Hello World");
/// let document = DocumentBuilder::new(&record, &context).build().unwrap();
///
/// assert_eq!(document.get_field("title").unwrap().boost(), 2.0);
/// assert!(document.has_field("_content"));
/// ```
pub struct DocumentBuilder<'a> {
    indexable: &'a dyn Indexable,
    context: &'a IndexingContext,
    factory: FieldFactory,
    fields: FieldQueue,
    boost: f64,
}

impl<'a> DocumentBuilder<'a> {
    /// Create a builder for one record.
    pub fn new(indexable: &'a dyn Indexable, context: &'a IndexingContext) -> Self {
        DocumentBuilder {
            indexable,
            context,
            factory: FieldFactory::new(context.diagnostics().clone()),
            fields: FieldQueue::new(),
            boost: 1.0,
        }
    }

    /// The record being built.
    pub fn indexable(&self) -> &dyn Indexable {
        self.indexable
    }

    /// Fields collected so far.
    pub fn collected_fields(&self) -> &FieldQueue {
        &self.fields
    }

    /// The document boost applied so far.
    pub fn document_boost(&self) -> f64 {
        self.boost
    }

    /// Run every build step and return the finished document.
    ///
    /// Special fields, record fields and computed fields are added in that
    /// order, then the item boost is applied. Fails only when computed
    /// field evaluation fails.
    pub fn build(mut self) -> Result<IndexDocument> {
        if self.context.config().add_special_fields {
            self.add_special_fields();
        }
        self.add_item_fields();
        self.add_computed_fields()?;
        self.add_boost();
        Ok(self.into_document())
    }

    /// Drain the collected fields into a document.
    pub fn into_document(self) -> IndexDocument {
        IndexDocument::new(self.fields.into_fields()).with_boost(self.boost)
    }

    /// Apply the item boost to the document if it is positive.
    pub fn add_boost(&mut self) {
        let boost = self
            .context
            .boost_resolver()
            .resolve_item_boost(self.indexable);
        if boost > 0.0 {
            self.boost = boost;
        }
    }

    /// Add the `_uniqueid` and `_datasource` fields.
    pub fn add_special_fields(&self) {
        self.add_named_field(
            UNIQUE_ID_FIELD,
            FieldValue::from(self.indexable.unique_id()),
        );

        let data_source = self.indexable.data_source();
        if !data_source.is_empty() {
            self.add_named_field(DATASOURCE_FIELD, FieldValue::from(data_source));
        }
    }

    /// Add every record field that the configuration lets through.
    pub fn add_item_fields(&self) {
        let config = self.context.config();
        for field in self.indexable.fields() {
            if !config.should_index_field(field.name()) {
                self.context
                    .diagnostics()
                    .debug(|| format!("Skipping field {} - excluded by configuration", field.name()));
                continue;
            }
            self.add_field(field);
        }
    }

    /// Add a record field.
    ///
    /// The field is skipped when the field map has no configuration for it.
    /// Text-like fields are also copied into the aggregate content field.
    pub fn add_field(&self, field: &dyn IndexableField) {
        let field_map = self.context.field_map();
        let format_configuration = field_map.format_configuration_for(field);

        let Some(configuration) = field_map.field_configuration_for(field) else {
            self.context.diagnostics().debug(|| {
                format!(
                    "Cannot resolve field settings for field id:{}, name:{}, typeKey:{} - The field will not be added to the index.",
                    field.id(),
                    field.name(),
                    field.type_key()
                )
            });
            return;
        };

        let mut value = self.context.field_reader().field_value(field);
        if let Some(format_configuration) = &format_configuration {
            value = format_configuration.format_for_writing(value);
        }

        let boost = self.context.boost_resolver().resolve_field_boost(field);

        if field.is_text_field() {
            let content_name = self.context.config().content_field_name.as_str();
            let content_configuration = field_map
                .field_configuration(content_name)
                .unwrap_or_else(|| Arc::clone(self.context.default_text_configuration()));
            self.add_configured_field(content_name, value.clone(), &content_configuration, 0.0);
        }

        self.add_configured_field(field.name(), value, &configuration, boost);
    }

    /// Add a value under a field name.
    ///
    /// If the field map configures the name, the value goes through
    /// [`DocumentBuilder::add_configured_field`]. Otherwise every element
    /// (or the single value) is stored as analyzed text with positions and
    /// offsets, so no value is dropped for lack of configuration.
    ///
    /// There is no append flag: adding a value always adds new fields and
    /// never replaces earlier ones, so such a flag would have no effect.
    pub fn add_named_field(&self, name: &str, value: FieldValue) {
        let field_map = self.context.field_map();
        let format_configuration = field_map.format_configuration(name);
        let index_name = self.context.translator().index_field_name(name);

        if let Some(configuration) = field_map.field_configuration(&index_name) {
            let value = match &format_configuration {
                Some(format_configuration) => format_configuration.format_for_writing(value),
                None => value,
            };
            self.add_configured_field(&index_name, value, &configuration, 0.0);
            return;
        }

        self.context.diagnostics().debug(|| {
            format!(
                "Field: {index_name} (Adding field with no field configuration)\n - value type: {}\n - value: {value}",
                value.type_name()
            )
        });

        let format_configuration = format_configuration.as_deref();
        match value {
            FieldValue::List(values) => {
                for element in &values {
                    self.add_unconfigured_value(&index_name, name, element, format_configuration);
                }
            }
            scalar => self.add_unconfigured_value(&index_name, name, &scalar, format_configuration),
        }
    }

    fn add_unconfigured_value(
        &self,
        index_name: &str,
        name: &str,
        value: &FieldValue,
        format_configuration: Option<&FieldConfiguration>,
    ) {
        let mut formatted = self
            .context
            .value_formatter()
            .format_for_index_storage(value, name);
        if let Some(format_configuration) = format_configuration {
            formatted = format_configuration.format_for_writing(formatted);
        }
        if formatted.is_null() {
            return;
        }

        self.fields.push(IndexField::new(
            index_name,
            IndexValue::Text(formatted.to_string()),
            StorageMode::Store,
            IndexMode::Analyzed,
            VectorMode::WithPositionsAndOffsets,
        ));
    }

    /// Add a value with an explicit configuration.
    ///
    /// Lists are expanded into one field per element; each element is
    /// formatted for writing and built separately. Every field's boost is
    /// `boost` plus the configuration boost.
    pub fn add_configured_field(
        &self,
        name: &str,
        value: FieldValue,
        configuration: &FieldConfiguration,
        boost: f64,
    ) {
        let index_name = self.context.translator().index_field_name(name);

        match value {
            FieldValue::List(values) => {
                for element in values {
                    self.add_built_field(&index_name, element, configuration, boost);
                }
            }
            scalar => self.add_built_field(&index_name, scalar, configuration, boost),
        }
    }

    fn add_built_field(
        &self,
        index_name: &str,
        value: FieldValue,
        configuration: &FieldConfiguration,
        boost: f64,
    ) {
        let value = configuration.format_for_writing(value);
        if let Some(field) = self.factory.create_field(
            index_name,
            &value,
            configuration,
            self.context.value_formatter(),
            boost,
        ) {
            self.fields.push(field);
        }
    }

    /// Evaluate the context's computed fields using the configured mode.
    pub fn add_computed_fields(&self) -> Result<()> {
        let config = self.context.config();
        self.add_computed_fields_with(
            self.context.computed_fields(),
            config.parallel,
            config.stop_on_error,
        )
    }

    /// Evaluate computed fields and add their values.
    ///
    /// Every failure is logged as a warning. Sequentially, a failure stops
    /// evaluation and is returned when `stop_on_error` is set, and is
    /// skipped otherwise. In parallel, with `stop_on_error` set, a failure
    /// keeps providers that have not started from running and every
    /// collected failure is returned as [`GlaiveError::Aggregate`] once all
    /// workers are done; values computed in the meantime are still added.
    ///
    /// Parallel evaluation runs on the context's worker pool. A context
    /// built without `parallel` has no pool, so `parallel = true` then runs
    /// on rayon's global pool, which `max_parallelism` does not bound.
    pub fn add_computed_fields_with(
        &self,
        providers: &[Arc<dyn ComputedField>],
        parallel: bool,
        stop_on_error: bool,
    ) -> Result<()> {
        let diagnostics = self.context.diagnostics();
        diagnostics.debug(|| "AddComputedIndexFields Start".to_string());

        let result = if parallel {
            self.add_computed_fields_parallel(providers, stop_on_error)
        } else {
            self.add_computed_fields_sequential(providers, stop_on_error)
        };

        diagnostics.debug(|| "AddComputedIndexFields End".to_string());
        result
    }

    fn add_computed_fields_sequential(
        &self,
        providers: &[Arc<dyn ComputedField>],
        stop_on_error: bool,
    ) -> Result<()> {
        for provider in providers {
            let value = match self.compute_value(provider.as_ref()) {
                Ok(value) => value,
                Err(error) if stop_on_error => return Err(error),
                Err(_) => continue,
            };
            self.add_computed_field_value(provider.as_ref(), value);
        }
        Ok(())
    }

    fn add_computed_fields_parallel(
        &self,
        providers: &[Arc<dyn ComputedField>],
        stop_on_error: bool,
    ) -> Result<()> {
        let stop = AtomicBool::new(false);
        let errors = Mutex::new(Vec::new());

        let evaluate = || {
            providers.par_iter().for_each(|provider| {
                if stop.load(Ordering::Acquire) {
                    return;
                }
                match self.compute_value(provider.as_ref()) {
                    Ok(value) => self.add_computed_field_value(provider.as_ref(), value),
                    Err(error) => {
                        if stop_on_error {
                            errors.lock().push(error);
                            stop.store(true, Ordering::Release);
                        }
                    }
                }
            });
        };

        // Without a session pool the global rayon pool is used.
        match self.context.thread_pool() {
            Some(pool) => pool.install(evaluate),
            None => evaluate(),
        }

        let errors = errors.into_inner();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(GlaiveError::Aggregate(errors))
        }
    }

    fn compute_value(&self, provider: &dyn ComputedField) -> Result<FieldValue> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            provider.compute_value(self.indexable)
        }))
        .unwrap_or_else(|payload| {
            Err(anyhow::anyhow!(
                "computed field panicked: {}",
                panic_message(payload.as_ref())
            ))
        });

        outcome.map_err(|source| {
            log::warn!(
                "Could not compute value for computed field: {} for indexable: {}: {source:#}",
                provider.field_name(),
                self.indexable.unique_id()
            );
            GlaiveError::computed_field(provider.field_name(), self.indexable.unique_id(), source)
        })
    }

    /// Add the value computed by a provider under the provider's field name.
    ///
    /// Lists are added element by element, with the field map's
    /// configuration when it has one and as unconfigured fields otherwise.
    pub fn add_computed_field_value(&self, provider: &dyn ComputedField, value: FieldValue) {
        let name = provider.field_name();
        let configuration = self.context.field_map().field_configuration(name);

        let add = |value: FieldValue| match &configuration {
            Some(configuration) => self.add_configured_field(name, value, configuration, 0.0),
            None => self.add_named_field(name, value),
        };

        match value {
            FieldValue::List(values) => values.into_iter().for_each(add),
            scalar => add(scalar),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
