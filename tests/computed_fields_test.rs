//! Integration tests for computed field evaluation

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use anyhow::{anyhow, bail};
use glaive::builder::{BuilderConfig, DocumentBuilder, IndexingContext};
use glaive::computed::{ComputedField, FnComputedField};
use glaive::document::field::IndexValue;
use glaive::document::field_value::FieldValue;
use glaive::error::{GlaiveError, Result};
use glaive::indexable::{DataRecord, Indexable};
use glaive::schema::{DeclaredType, FieldConfiguration, Schema};

fn constant(name: &str, value: &'static str) -> Arc<dyn ComputedField> {
    Arc::new(FnComputedField::new(name, move |_: &dyn Indexable| {
        Ok(FieldValue::from(value))
    }))
}

fn failing(name: &str) -> Arc<dyn ComputedField> {
    Arc::new(FnComputedField::new(name, |indexable: &dyn Indexable| {
        Err(anyhow!("no value for {}", indexable.unique_id()))
    }))
}

fn context(config: BuilderConfig, providers: Vec<Arc<dyn ComputedField>>) -> IndexingContext {
    let mut schema = Schema::new();
    schema
        .add_field(
            FieldConfiguration::builder("word_count")
                .declared_type(DeclaredType::Int32)
                .build(),
        )
        .unwrap();

    providers
        .into_iter()
        .fold(
            IndexingContext::builder(Arc::new(schema))
                .config(config.with_special_fields(false)),
            |builder, provider| builder.computed_field(provider),
        )
        .build()
        .unwrap()
}

#[test]
fn test_configured_computed_field_is_typed() -> Result<()> {
    let word_count: Arc<dyn ComputedField> =
        Arc::new(FnComputedField::new("word_count", |indexable: &dyn Indexable| {
            let words = indexable
                .fields()
                .iter()
                .filter_map(|f| f.value().as_text())
                .map(|text| text.split_whitespace().count())
                .sum::<usize>();
            Ok(FieldValue::Integer(words as i64))
        }));
    let context = context(BuilderConfig::new(), vec![word_count]);

    let record = DataRecord::new("item-1").with_field("Body", "memo", "one two three");
    let document = DocumentBuilder::new(&record, &context).build()?;

    assert_eq!(
        document.get_field("word_count").unwrap().value(),
        &IndexValue::Integer(3)
    );
    Ok(())
}

#[test]
fn test_sequential_failures_are_skipped() -> Result<()> {
    let context = context(
        BuilderConfig::new(),
        vec![constant("before", "x"), failing("broken"), constant("after", "y")],
    );

    let record = DataRecord::new("item-1");
    let document = DocumentBuilder::new(&record, &context).build()?;

    assert!(document.has_field("before"));
    assert!(!document.has_field("broken"));
    assert!(document.has_field("after"));
    Ok(())
}

#[test]
fn test_sequential_stop_on_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted: Arc<dyn ComputedField> = {
        let calls = Arc::clone(&calls);
        Arc::new(FnComputedField::new("counted", move |_: &dyn Indexable| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(FieldValue::from("ran"))
        }))
    };

    let context = context(
        BuilderConfig::new().with_stop_on_error(true),
        vec![constant("first", "x"), failing("broken"), counted],
    );

    let record = DataRecord::new("item-1");
    let error = DocumentBuilder::new(&record, &context).build().unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    match error {
        GlaiveError::ComputedField {
            field_name,
            unique_id,
            source,
        } => {
            assert_eq!(field_name, "broken");
            assert_eq!(unique_id, "item-1");
            assert_eq!(source.to_string(), "no value for item-1");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parallel_evaluation_adds_every_value() -> Result<()> {
    let providers = (0..16)
        .map(|i| constant(&format!("field_{i}"), "value"))
        .collect();
    let context = context(
        BuilderConfig::new()
            .with_parallel(true)
            .with_max_parallelism(4),
        providers,
    );

    let record = DataRecord::new("item-1");
    let document = DocumentBuilder::new(&record, &context).build()?;

    assert_eq!(document.len(), 16);
    for i in 0..16 {
        assert!(document.has_field(&format!("field_{i}")));
    }
    Ok(())
}

#[test]
fn test_parallel_failures_ignored_without_stop() -> Result<()> {
    let context = context(
        BuilderConfig::new().with_parallel(true).with_max_parallelism(2),
        vec![failing("broken"), constant("ok", "fine")],
    );

    let record = DataRecord::new("item-1");
    let document = DocumentBuilder::new(&record, &context).build()?;

    assert!(document.has_field("ok"));
    assert!(!document.has_field("broken"));
    Ok(())
}

#[test]
fn test_parallel_failures_are_aggregated() {
    // Both providers must be running before either fails, so neither can be
    // skipped by the other's failure.
    let barrier = Arc::new(Barrier::new(2));
    let blocking = |name: &str| -> Arc<dyn ComputedField> {
        let barrier = Arc::clone(&barrier);
        let field_name = name.to_string();
        Arc::new(FnComputedField::new(name, move |_: &dyn Indexable| {
            barrier.wait();
            bail!("{field_name} failed")
        }))
    };

    let context = context(
        BuilderConfig::new()
            .with_parallel(true)
            .with_max_parallelism(2)
            .with_stop_on_error(true),
        vec![blocking("left"), blocking("right")],
    );

    let record = DataRecord::new("item-1");
    let error = DocumentBuilder::new(&record, &context).build().unwrap_err();

    assert!(error.is_aggregate());
    let mut names: Vec<String> = error
        .causes()
        .into_iter()
        .map(|cause| match cause {
            GlaiveError::ComputedField { field_name, .. } => field_name.clone(),
            other => panic!("unexpected cause: {other}"),
        })
        .collect();
    names.sort();
    assert_eq!(names, vec!["left", "right"]);
    assert!(error.to_string().starts_with("2 errors occurred"));
}

#[test]
fn test_add_computed_fields_with_explicit_providers() -> Result<()> {
    let context = context(BuilderConfig::new(), Vec::new());
    let record = DataRecord::new("item-1");
    let builder = DocumentBuilder::new(&record, &context);

    builder.add_computed_fields_with(&[constant("a", "1"), constant("b", "2")], true, true)?;

    let document = builder.into_document();
    assert!(document.has_field("a"));
    assert!(document.has_field("b"));
    Ok(())
}

#[test]
fn test_parallel_stop_on_error_skips_pending_providers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut providers = vec![constant("early", "kept"), failing("broken")];
    for i in 0..50 {
        let calls = Arc::clone(&calls);
        providers.push(Arc::new(FnComputedField::new(
            format!("pending_{i}"),
            move |_: &dyn Indexable| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(FieldValue::from("ran"))
            },
        )) as Arc<dyn ComputedField>);
    }

    // A single worker runs providers in order, so everything after the
    // failure is still pending when the stop flag is raised.
    let context = context(
        BuilderConfig::new()
            .with_parallel(true)
            .with_max_parallelism(1),
        Vec::new(),
    );
    let record = DataRecord::new("item-1");
    let builder = DocumentBuilder::new(&record, &context);

    let error = builder
        .add_computed_fields_with(&providers, true, true)
        .unwrap_err();

    assert!(error.is_aggregate());
    assert_eq!(error.causes().len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let document = builder.into_document();
    assert_eq!(document.len(), 1);
    assert_eq!(
        document.get_field("early").unwrap().value().as_text(),
        Some("kept")
    );
}
