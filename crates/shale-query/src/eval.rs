use std::cmp::Ordering;

use bson::Bson;
use regex::Regex;
use shale_doc::array_index;

use crate::collation::Collator;
use crate::compare::{canonical_rank, compare_values, values_equal};
use crate::expression::{Expression, InList};

/// Evaluate whether `value` matches the given expression.
pub fn matches(expr: &Expression, value: &Bson, collator: Option<&dyn Collator>) -> bool {
    match expr {
        Expression::And(children) => children.iter().all(|c| matches(c, value, collator)),
        Expression::Or(children) => children.iter().any(|c| matches(c, value, collator)),
        Expression::Nor(children) => !children.iter().any(|c| matches(c, value, collator)),
        Expression::Not(inner) => !matches(inner, value, collator),
        Expression::Eq(path, query) => {
            let found = candidates(value, path.parts());
            // $eq: null matches both missing fields and explicit null values
            if matches!(query, Bson::Null) && found.is_empty() {
                return true;
            }
            any_leaf(&found, |v| values_equal(v, query, collator))
        }
        Expression::Ne(path, query) => {
            !matches(&Expression::Eq(path.clone(), query.clone()), value, collator)
        }
        Expression::Gt(path, query)
        | Expression::Gte(path, query)
        | Expression::Lt(path, query)
        | Expression::Lte(path, query) => {
            let accept: fn(Ordering) -> bool = match expr {
                Expression::Gt(..) => |o| o == Ordering::Greater,
                Expression::Gte(..) => |o| o != Ordering::Less,
                Expression::Lt(..) => |o| o == Ordering::Less,
                _ => |o| o != Ordering::Greater,
            };
            let found = candidates(value, path.parts());
            any_leaf(&found, |v| {
                // Ordering operators only compare values of the same type bracket
                canonical_rank(v) == canonical_rank(query)
                    && accept(compare_values(v, query, collator))
            })
        }
        Expression::In(path, list) => in_list(list, value, path.parts(), collator),
        Expression::Nin(path, list) => !in_list(list, value, path.parts(), collator),
        Expression::Exists(path, expected) => {
            // $exists checks presence; a null value counts as present
            let present = !candidates(value, path.parts()).is_empty();
            *expected == present
        }
        Expression::Regex(path, re) => {
            any_leaf(&candidates(value, path.parts()), |v| regex_matches(re, v))
        }
        Expression::Size(path, size) => candidates(value, path.parts())
            .iter()
            .any(|v| matches!(v, Bson::Array(items) if items.len() == *size)),
        Expression::ElemMatch(path, inner) => {
            candidates(value, path.parts()).iter().any(|v| match v {
                Bson::Array(items) => items.iter().any(|item| matches(inner, item, collator)),
                _ => false,
            })
        }
    }
}

fn in_list(
    list: &InList,
    value: &Bson,
    parts: &[String],
    collator: Option<&dyn Collator>,
) -> bool {
    let found = candidates(value, parts);
    if found.is_empty() {
        return list.contains_null();
    }
    any_leaf(&found, |v| {
        list.values.iter().any(|q| values_equal(v, q, collator))
            || list.regexes.iter().any(|re| regex_matches(re, v))
    })
}

/// Regex matching never consults the collator.
fn regex_matches(re: &Regex, value: &Bson) -> bool {
    match value {
        Bson::String(s) | Bson::Symbol(s) => re.is_match(s),
        _ => false,
    }
}

/// A candidate satisfies `test` itself, or one of its elements does when it is an array.
fn any_leaf(found: &[&Bson], test: impl Fn(&Bson) -> bool) -> bool {
    found.iter().any(|&v| {
        test(v)
            || match v {
                Bson::Array(items) => items.iter().any(&test),
                _ => false,
            }
    })
}

/// Every value reachable from `value` along `parts`.
///
/// Arrays are traversed implicitly: a component is looked up in every
/// embedded document of the array, and a numeric component also addresses
/// the array position.
fn candidates<'a>(value: &'a Bson, parts: &[String]) -> Vec<&'a Bson> {
    let mut out = Vec::new();
    collect(value, parts, &mut out);
    out
}

fn collect<'a>(value: &'a Bson, parts: &[String], out: &mut Vec<&'a Bson>) {
    let Some((first, rest)) = parts.split_first() else {
        out.push(value);
        return;
    };
    match value {
        Bson::Document(doc) => {
            if let Some(child) = doc.get(first) {
                collect(child, rest, out);
            }
        }
        Bson::Array(items) => {
            if let Some(child) = array_index(first).and_then(|i| items.get(i)) {
                collect(child, rest, out);
            }
            for item in items {
                if matches!(item, Bson::Document(_)) {
                    collect(item, parts, out);
                }
            }
        }
        _ => {}
    }
}
