mod common;
use common::*;

use bson::doc;
use shale_doc::MutableDocument;
use shale_query::{MockCollator, MockKind};
use shale_update::{ErrorKind, LogBuilder, UpdateConfig, parse_update};

#[test]
fn applies_every_field_and_merges_the_log() {
    let plan = parse_update(
        &doc! { "$pull": { "a": { "$lt": 1 }, "b.c": "x" }, "$pullAll": { "d": [1, 2] } },
        None,
    )
    .unwrap();
    let config = UpdateConfig {
        indexes: vec!["b".into()],
        ..Default::default()
    };
    let indexed = config.indexed_paths().unwrap();
    let immutable = config.immutable_paths().unwrap();

    let mut doc = MutableDocument::new(doc! {
        "_id": 1,
        "a": [0, 1],
        "b": { "c": ["x", "y"] },
        "d": [1, 2, 3],
    });
    let mut log = LogBuilder::new();
    let result = plan
        .apply(&mut doc, Some(&indexed), &immutable, Some(&mut log))
        .unwrap();

    assert!(!result.noop);
    assert!(result.indexes_affected);
    assert_eq!(
        doc.root(),
        &doc! { "_id": 1, "a": [1], "b": { "c": ["y"] }, "d": [3] }
    );
    assert!(!doc.is_in_place_mode_enabled());
    assert_eq!(
        log.serialize(),
        doc! { "$set": { "a": [1], "b.c": ["y"], "d": [3] } }
    );
}

#[test]
fn noop_when_every_field_is_noop() {
    let plan = parse_update(&doc! { "$pull": { "a": 5, "missing": 1 } }, None).unwrap();
    let mut doc = MutableDocument::new(doc! { "a": [1, 2] });
    let mut log = LogBuilder::new();
    let result = plan
        .apply(&mut doc, None, &Default::default(), Some(&mut log))
        .unwrap();
    assert!(result.noop);
    assert!(!result.indexes_affected);
    assert!(doc.is_in_place_mode_enabled());
    assert!(log.is_empty());
}

#[test]
fn failure_leaves_document_and_log_untouched() {
    let plan = parse_update(&doc! { "$pull": { "a": 1, "b": 1 } }, None).unwrap();
    let original = doc! { "a": [1, 2], "b": "not an array" };
    let mut doc = MutableDocument::new(original.clone());
    let mut log = LogBuilder::new();

    let err = plan
        .apply(&mut doc, None, &Default::default(), Some(&mut log))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadValue);
    assert_eq!(doc.root(), &original);
    assert!(doc.is_in_place_mode_enabled());
    assert!(log.is_empty());
}

#[test]
fn immutable_fields_from_config() {
    let config = UpdateConfig::default();
    let plan = parse_update(&doc! { "$pull": { "_id.tags": "x" } }, None).unwrap();
    let mut doc = MutableDocument::new(doc! { "_id": { "tags": ["x"] } });
    let err = plan
        .apply(&mut doc, None, &config.immutable_paths().unwrap(), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ImmutableField);
}

#[test]
fn non_viable_path_through_plan() {
    let plan = parse_update(&doc! { "$pull": { "a.b": 1 } }, None).unwrap();
    let mut doc = MutableDocument::new(doc! { "a": 1 });
    let err = plan
        .apply(&mut doc, None, &Default::default(), None)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PathNotViable);
}

#[test]
fn plan_collation_and_clone_independence() {
    let collator = MockCollator::new(MockKind::AlwaysEqual);
    let mut plan = parse_update(&doc! { "$pull": { "a": "c" } }, None).unwrap();
    let cloned = plan.clone();
    plan.set_collator(Some(&collator));

    let mut doc = MutableDocument::new(doc! { "a": ["a", "c"] });
    plan.apply(&mut doc, None, &Default::default(), None).unwrap();
    assert_eq!(doc.root(), &doc! { "a": [] });

    let mut doc = MutableDocument::new(doc! { "a": ["a", "c"] });
    cloned.apply(&mut doc, None, &Default::default(), None).unwrap();
    assert_eq!(doc.root(), &doc! { "a": ["a"] });
}

#[test]
fn collator_from_config() {
    let config =
        UpdateConfig::from_json(r#"{ "collation": { "locale": "en", "strength": 1 } }"#).unwrap();
    let collator = config.collator().unwrap();
    let plan = parse_update(&doc! { "$pull": { "tags": "RED" } }, collator.as_deref()).unwrap();

    let mut doc = MutableDocument::new(doc! { "tags": ["red", "Red", "blue"] });
    plan.apply(&mut doc, None, &Default::default(), None).unwrap();
    assert_eq!(doc.root(), &doc! { "tags": ["blue"] });
}

#[test]
fn plan_reports_its_fields() {
    let plan = parse_update(&doc! { "$pullAll": { "x.y": [1] } }, None).unwrap();
    assert_eq!(plan.len(), 1);
    let (field, op) = plan.fields().next().unwrap();
    assert_eq!(field, &path("x.y"));
    assert_eq!(op, "$pullAll");
}
