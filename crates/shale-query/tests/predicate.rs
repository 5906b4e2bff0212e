use bson::{Bson, bson, doc};
use shale_query::{CollationSpec, Predicate, compare_values, parse_filter};

fn inventory() -> Vec<Bson> {
    vec![
        bson!({ "sku": "A-1", "qty": 5, "tags": ["red", "Blue"] }),
        bson!({ "sku": "a-2", "qty": 0, "tags": [] }),
        bson!({ "sku": "B-7", "qty": 12, "dims": { "w": 3, "h": 4 } }),
        bson!({ "sku": "b-9" }),
    ]
}

fn skus(pred: &Predicate<'_>) -> Vec<String> {
    inventory()
        .iter()
        .filter(|item| pred.matches(item))
        .map(|item| item.as_document().unwrap().get_str("sku").unwrap().to_string())
        .collect()
}

#[test]
fn compound_filter() {
    let pred = Predicate::compile(
        &doc! { "$or": [{ "qty": { "$gte": 10 } }, { "tags": "red" }], "sku": { "$ne": "x" } },
        None,
    )
    .unwrap();
    assert_eq!(skus(&pred), vec!["A-1", "B-7"]);
}

#[test]
fn missing_fields() {
    let absent = Predicate::compile(&doc! { "qty": { "$exists": false } }, None).unwrap();
    assert_eq!(skus(&absent), vec!["b-9"]);

    let null = Predicate::compile(&doc! { "qty": null }, None).unwrap();
    assert_eq!(skus(&null), vec!["b-9"]);
}

#[test]
fn nested_paths() {
    let pred = Predicate::compile(&doc! { "dims.h": { "$gt": 3 } }, None).unwrap();
    assert_eq!(skus(&pred), vec!["B-7"]);
}

#[test]
fn case_insensitive_collation_from_spec() {
    let spec: CollationSpec = serde_json::from_str(r#"{ "locale": "en", "strength": 2 }"#).unwrap();
    let collator = spec.build().unwrap();

    let filter = doc! { "sku": { "$in": ["a-1", "A-2"] } };
    let raw = Predicate::compile(&filter, None).unwrap();
    assert!(skus(&raw).is_empty());

    let folded = raw.with_collator(collator.as_deref());
    assert_eq!(skus(&folded), vec!["A-1", "a-2"]);
}

#[test]
fn regex_filter_ignores_collation() {
    let spec = CollationSpec {
        locale: "en".into(),
        strength: 1,
    };
    let collator = spec.build().unwrap();
    let pred = Predicate::compile(&doc! { "sku": { "$regex": "^b" } }, collator.as_deref()).unwrap();
    assert_eq!(skus(&pred), vec!["b-9"]);
}

#[test]
fn sort_order_follows_type_brackets() {
    let mut values = vec![bson!("a"), bson!(true), bson!(null), bson!(2), bson!({ "x": 1 }), bson!([1])];
    values.sort_by(|a, b| compare_values(a, b, None));
    assert_eq!(
        values,
        vec![bson!(null), bson!(2), bson!("a"), bson!({ "x": 1 }), bson!([1]), bson!(true)]
    );
}

#[test]
fn malformed_filters() {
    for filter in [
        doc! { "$and": [] },
        doc! { "a": { "$in": 1 } },
        doc! { "a": { "$size": "x" } },
        doc! { "$lt": 1, "a": 2 },
    ] {
        assert!(parse_filter(&filter).is_err(), "{filter} should not parse");
    }
}
