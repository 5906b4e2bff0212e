use bson::{Bson, Document};

use crate::collation::Collator;
use crate::eval;
use crate::expression::Expression;
use crate::parse_filter::{FilterParseError, parse_filter};

/// A compiled filter bound to the collator it compares strings with.
///
/// The collator is borrowed for `'c`; rebinding builds a new predicate
/// rather than mutating the one a caller may still hold.
#[derive(Debug, Clone)]
pub struct Predicate<'c> {
    expr: Expression,
    collator: Option<&'c dyn Collator>,
}

impl<'c> Predicate<'c> {
    pub fn compile(
        filter: &Document,
        collator: Option<&'c dyn Collator>,
    ) -> Result<Self, FilterParseError> {
        Ok(Self::new(parse_filter(filter)?, collator))
    }

    pub fn new(expr: Expression, collator: Option<&'c dyn Collator>) -> Self {
        Self { expr, collator }
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    pub fn collator(&self) -> Option<&'c dyn Collator> {
        self.collator
    }

    pub fn matches(&self, value: &Bson) -> bool {
        eval::matches(&self.expr, value, self.collator)
    }

    pub fn with_collator(&self, collator: Option<&'c dyn Collator>) -> Predicate<'c> {
        Self::new(self.expr.clone(), collator)
    }
}
