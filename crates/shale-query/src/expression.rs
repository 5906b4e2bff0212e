use bson::Bson;
use regex::Regex;
use shale_doc::FieldPath;

/// A compiled query predicate.
///
/// Every leaf carries the path it reads, relative to the value being matched.
/// An empty path means the value itself.
#[derive(Debug, Clone)]
pub enum Expression {
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Nor(Vec<Expression>),
    /// Negation of a condition on a single path (`$not`).
    Not(Box<Expression>),
    Eq(FieldPath, Bson),
    Ne(FieldPath, Bson),
    Gt(FieldPath, Bson),
    Gte(FieldPath, Bson),
    Lt(FieldPath, Bson),
    Lte(FieldPath, Bson),
    In(FieldPath, InList),
    Nin(FieldPath, InList),
    Exists(FieldPath, bool),
    Regex(FieldPath, Regex),
    Size(FieldPath, usize),
    /// Some element of the array at the path matches the inner expression.
    ElemMatch(FieldPath, Box<Expression>),
}

/// Operand of `$in` / `$nin`: literal values plus regex alternatives.
#[derive(Debug, Clone, Default)]
pub struct InList {
    pub values: Vec<Bson>,
    pub regexes: Vec<Regex>,
}

impl InList {
    pub fn contains_null(&self) -> bool {
        self.values.iter().any(|v| matches!(v, Bson::Null))
    }
}
