use bson::{Bson, Document};
use regex::Regex;
use shale_doc::FieldPath;
use thiserror::Error;

use crate::expression::{Expression, InList};

/// Parse error for filter documents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("filter parse error: {0}")]
pub struct FilterParseError(pub String);

/// Operators that test the value at a path, as opposed to combining sub-filters.
const VALUE_OPERATORS: &[&str] = &[
    "$eq", "$ne", "$gt", "$gte", "$lt", "$lte", "$in", "$nin", "$exists", "$regex", "$options",
    "$size", "$elemMatch", "$not",
];

pub(crate) fn is_value_operator(key: &str) -> bool {
    VALUE_OPERATORS.contains(&key)
}

/// Parse a BSON filter document into an Expression tree.
///
/// Follows MongoDB query semantics:
/// - Top-level document is an implicit AND of all entries
/// - `{ "field": value }` is implicit `$eq`; a regex literal is a `$regex` match
/// - `{ "field": { "$gt": v } }` uses operator sub-documents
/// - `{ "$or": [...] }` / `{ "$and": [...] }` / `{ "$nor": [...] }` for logical ops
/// - `{ "field": { "$regex": "pattern", "$options": "i" } }` for regex
/// - `{ "field": { "$exists": true } }` for field existence checks
///
/// Top-level value operators (`{ "$lt": 1 }`) test the matched value itself.
/// They cannot share a level with plain field conditions.
pub fn parse_filter(doc: &Document) -> Result<Expression, FilterParseError> {
    let mut children = Vec::new();
    let mut value_ops = Document::new();
    let mut has_fields = false;

    for (key, value) in doc {
        match key.as_str() {
            "$and" => children.push(parse_logical_array(key, value, Expression::And)?),
            "$or" => children.push(parse_logical_array(key, value, Expression::Or)?),
            "$nor" => children.push(parse_logical_array(key, value, Expression::Nor)?),
            k if is_value_operator(k) => {
                value_ops.insert(key.clone(), value.clone());
            }
            k if k.starts_with('$') => {
                return Err(FilterParseError(format!("unknown top-level operator: {k}")));
            }
            _ => {
                has_fields = true;
                children.push(parse_field_condition(parse_path(key)?, value)?);
            }
        }
    }

    if !value_ops.is_empty() {
        if has_fields {
            return Err(FilterParseError(
                "value operators cannot be combined with field conditions at the same level"
                    .into(),
            ));
        }
        children.push(parse_operator_doc(FieldPath::default(), &value_ops)?);
    }

    collapse(children, "empty filter document")
}

fn parse_path(key: &str) -> Result<FieldPath, FilterParseError> {
    FieldPath::parse(key).map_err(|e| FilterParseError(e.to_string()))
}

fn collapse(mut children: Vec<Expression>, empty: &str) -> Result<Expression, FilterParseError> {
    match children.len() {
        0 => Err(FilterParseError(empty.into())),
        1 => Ok(children.swap_remove(0)),
        _ => Ok(Expression::And(children)),
    }
}

/// Parse a `$and`, `$or` or `$nor` array value into a logical expression.
fn parse_logical_array(
    op: &str,
    value: &Bson,
    make: fn(Vec<Expression>) -> Expression,
) -> Result<Expression, FilterParseError> {
    let arr = match value {
        Bson::Array(a) => a,
        _ => return Err(FilterParseError(format!("{op} value must be an array"))),
    };

    let mut children = Vec::with_capacity(arr.len());
    for elem in arr {
        match elem {
            Bson::Document(sub_doc) => children.push(parse_filter(sub_doc)?),
            _ => {
                return Err(FilterParseError(format!(
                    "{op} array elements must be documents"
                )));
            }
        }
    }

    if children.is_empty() {
        return Err(FilterParseError(format!("{op} array must not be empty")));
    }

    Ok(make(children))
}

/// Parse a field condition: implicit $eq, a regex literal, or an operator sub-document.
fn parse_field_condition(field: FieldPath, value: &Bson) -> Result<Expression, FilterParseError> {
    match value {
        // A document whose first key starts with $ is an operator doc
        Bson::Document(sub_doc) if starts_with_operator(sub_doc) => {
            parse_operator_doc(field, sub_doc)
        }
        Bson::RegularExpression(re) => Ok(Expression::Regex(
            field,
            compile_regex(re.pattern.as_str(), re.options.as_str())?,
        )),
        _ => Ok(Expression::Eq(field, value.clone())),
    }
}

fn starts_with_operator(doc: &Document) -> bool {
    doc.keys().next().is_some_and(|k| k.starts_with('$'))
}

/// Parse an operator sub-document like `{ "$gt": 21, "$lte": 100 }`.
fn parse_operator_doc(field: FieldPath, doc: &Document) -> Result<Expression, FilterParseError> {
    // $regex consumes its $options sibling wherever it sits
    if doc.contains_key("$regex") {
        return parse_regex(field, doc);
    }

    let mut conditions = Vec::new();
    for (op_key, op_value) in doc {
        let expr = match op_key.as_str() {
            "$eq" => Expression::Eq(field.clone(), op_value.clone()),
            "$ne" => Expression::Ne(field.clone(), op_value.clone()),
            "$gt" => Expression::Gt(field.clone(), op_value.clone()),
            "$gte" => Expression::Gte(field.clone(), op_value.clone()),
            "$lt" => Expression::Lt(field.clone(), op_value.clone()),
            "$lte" => Expression::Lte(field.clone(), op_value.clone()),
            "$in" => Expression::In(field.clone(), parse_in_list(op_key, op_value)?),
            "$nin" => Expression::Nin(field.clone(), parse_in_list(op_key, op_value)?),
            "$exists" => Expression::Exists(field.clone(), truthy(op_value)),
            "$size" => Expression::Size(field.clone(), parse_size(op_value)?),
            "$elemMatch" => match op_value {
                Bson::Document(sub) => {
                    Expression::ElemMatch(field.clone(), Box::new(parse_filter(sub)?))
                }
                _ => return Err(FilterParseError("$elemMatch needs a document".into())),
            },
            "$not" => Expression::Not(Box::new(parse_not(field.clone(), op_value)?)),
            "$options" => {
                return Err(FilterParseError("$options without $regex".into()));
            }
            k => return Err(FilterParseError(format!("unknown field operator: {k}"))),
        };
        conditions.push(expr);
    }

    collapse(conditions, "empty operator document")
}

fn parse_not(field: FieldPath, value: &Bson) -> Result<Expression, FilterParseError> {
    match value {
        Bson::RegularExpression(re) => Ok(Expression::Regex(
            field,
            compile_regex(re.pattern.as_str(), re.options.as_str())?,
        )),
        Bson::Document(sub) if starts_with_operator(sub) => parse_operator_doc(field, sub),
        _ => Err(FilterParseError("$not needs a regex or a document".into())),
    }
}

fn parse_in_list(op: &str, value: &Bson) -> Result<InList, FilterParseError> {
    let items = match value {
        Bson::Array(items) => items,
        _ => return Err(FilterParseError(format!("{op} needs an array"))),
    };
    let mut list = InList::default();
    for item in items {
        match item {
            Bson::RegularExpression(re) => list
                .regexes
                .push(compile_regex(re.pattern.as_str(), re.options.as_str())?),
            Bson::Document(sub) if starts_with_operator(sub) => {
                return Err(FilterParseError(format!("cannot nest $ under {op}")));
            }
            _ => list.values.push(item.clone()),
        }
    }
    Ok(list)
}

fn parse_size(value: &Bson) -> Result<usize, FilterParseError> {
    let size = match value {
        Bson::Int32(n) => Some(*n as i64),
        Bson::Int64(n) => Some(*n),
        Bson::Double(f) if f.fract() == 0.0 => Some(*f as i64),
        _ => None,
    };
    size.and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| FilterParseError("$size needs a non-negative whole number".into()))
}

fn truthy(value: &Bson) -> bool {
    match value {
        Bson::Boolean(b) => *b,
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(f) => *f != 0.0,
        Bson::Null | Bson::Undefined => false,
        _ => true,
    }
}

/// Parse a `$regex` + optional `$options` sub-document.
fn parse_regex(field: FieldPath, doc: &Document) -> Result<Expression, FilterParseError> {
    let mut pattern: Option<String> = None;
    let mut options: Option<String> = None;

    for (key, value) in doc {
        match key.as_str() {
            "$regex" => match value {
                Bson::String(s) => pattern = Some(s.clone()),
                Bson::RegularExpression(re) => {
                    pattern = Some(re.pattern.as_str().to_string());
                    if options.is_none() && !re.options.as_str().is_empty() {
                        options = Some(re.options.as_str().to_string());
                    }
                }
                _ => return Err(FilterParseError("$regex value must be a string".into())),
            },
            "$options" => match value {
                Bson::String(s) => options = Some(s.clone()),
                _ => return Err(FilterParseError("$options value must be a string".into())),
            },
            k => {
                return Err(FilterParseError(format!(
                    "unexpected key alongside $regex: {k}"
                )));
            }
        }
    }

    let pat = pattern.ok_or_else(|| FilterParseError("missing $regex pattern".into()))?;
    let re = compile_regex(&pat, options.as_deref().unwrap_or(""))?;
    Ok(Expression::Regex(field, re))
}

/// Compile a pattern with BSON-style option letters.
///
/// `i`, `m`, `s` and `x` map to inline flags. `u` and `l` are accepted and
/// ignored: matching is always Unicode-aware.
pub fn compile_regex(pattern: &str, options: &str) -> Result<Regex, FilterParseError> {
    let mut full_pattern = String::with_capacity(4 + options.len() + pattern.len());
    let mut flags = String::new();
    for ch in options.chars() {
        match ch {
            'i' | 's' | 'm' | 'x' => flags.push(ch),
            'u' | 'l' => {}
            c => return Err(FilterParseError(format!("unknown regex option: {c}"))),
        }
    }
    if !flags.is_empty() {
        full_pattern.push_str("(?");
        full_pattern.push_str(&flags);
        full_pattern.push(')');
    }
    full_pattern.push_str(pattern);

    Regex::new(&full_pattern).map_err(|e| FilterParseError(format!("invalid regex pattern: {e}")))
}
