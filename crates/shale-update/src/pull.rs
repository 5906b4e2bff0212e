use bson::{Bson, Document};
use regex::Regex;
use shale_query::{Collator, Expression, Predicate, compile_regex, values_equal};

use crate::context::{ApplyParams, ApplyResult};
use crate::culling::cull_array;
use crate::error::UpdateError;
use crate::node::UpdateNode;

/// `$pull`: removes every array element matching a condition.
///
/// The operand picks a strategy at `init`:
/// - a document led by a value operator (`{$gt: 6}`, `{$in: [1, 2]}`) is a
///   query over each element itself;
/// - any other document (`{y: {$exists: true}}`, `{x: 'foo'}`, `{$or: [..]}`)
///   is a query over the fields of document elements, so `{y: 2}` removes
///   `{y: 2, z: 1}` and never touches scalars;
/// - a regex matches strings;
/// - scalars and arrays match elements equal to them as a whole.
#[derive(Debug, Clone, Default)]
pub struct PullNode<'c> {
    matcher: Option<Matcher<'c>>,
    collator_set: bool,
}

#[derive(Debug, Clone)]
enum Matcher<'c> {
    Value(Predicate<'c>),
    /// Only document elements can match.
    Object(Predicate<'c>),
    Equality {
        value: Bson,
        collator: Option<&'c dyn Collator>,
    },
    /// Never collation-sensitive.
    Regex(Regex),
}

impl<'c> Matcher<'c> {
    fn build(operand: &Bson, collator: Option<&'c dyn Collator>) -> Result<Self, UpdateError> {
        match operand {
            Bson::Document(doc) if leads_with_value_operator(doc) => {
                Ok(Matcher::Value(Predicate::compile(doc, collator)?))
            }
            // `{}` matches every document element.
            Bson::Document(doc) if doc.is_empty() => Ok(Matcher::Object(Predicate::new(
                Expression::And(Vec::new()),
                collator,
            ))),
            Bson::Document(doc) => Ok(Matcher::Object(Predicate::compile(doc, collator)?)),
            Bson::RegularExpression(re) => Ok(Matcher::Regex(compile_regex(
                re.pattern.as_str(),
                re.options.as_str(),
            )?)),
            value => Ok(Matcher::Equality {
                value: value.clone(),
                collator,
            }),
        }
    }

    fn matches(&self, element: &Bson) -> bool {
        match self {
            Matcher::Value(predicate) => predicate.matches(element),
            Matcher::Object(predicate) => {
                matches!(element, Bson::Document(_)) && predicate.matches(element)
            }
            Matcher::Equality { value, collator } => values_equal(element, value, *collator),
            Matcher::Regex(re) => match element {
                Bson::String(s) | Bson::Symbol(s) => re.is_match(s),
                _ => false,
            },
        }
    }

    /// Rebuild the comparison state around a new collator.
    fn rebind(&self, collator: Option<&'c dyn Collator>) -> Self {
        match self {
            Matcher::Value(predicate) => Matcher::Value(predicate.with_collator(collator)),
            Matcher::Object(predicate) => Matcher::Object(predicate.with_collator(collator)),
            Matcher::Equality { value, .. } => Matcher::Equality {
                value: value.clone(),
                collator,
            },
            Matcher::Regex(re) => Matcher::Regex(re.clone()),
        }
    }
}

/// The first key decides: `$and`, `$or` and `$nor` combine field conditions,
/// any other `$` key tests the element itself.
fn leads_with_value_operator(doc: &Document) -> bool {
    doc.keys()
        .next()
        .is_some_and(|k| k.starts_with('$') && !matches!(k.as_str(), "$and" | "$or" | "$nor"))
}

impl<'c> PullNode<'c> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'c> UpdateNode<'c> for PullNode<'c> {
    fn init(
        &mut self,
        operand: &Bson,
        collator: Option<&'c dyn Collator>,
    ) -> Result<(), UpdateError> {
        self.matcher = Some(Matcher::build(operand, collator)?);
        Ok(())
    }

    fn apply(&self, params: ApplyParams<'_>) -> Result<ApplyResult, UpdateError> {
        let matcher = self
            .matcher
            .as_ref()
            .ok_or(UpdateError::Uninitialized(self.operator_name()))?;
        cull_array(self.operator_name(), params, |element| matcher.matches(element))
    }

    fn clone_node(&self) -> Box<dyn UpdateNode<'c> + 'c> {
        Box::new(self.clone())
    }

    fn set_collator(&mut self, collator: Option<&'c dyn Collator>) {
        debug_assert!(!self.collator_set, "collator already set on $pull node");
        self.collator_set = true;
        if let Some(matcher) = &self.matcher {
            self.matcher = Some(matcher.rebind(collator));
        }
    }

    fn operator_name(&self) -> &'static str {
        "$pull"
    }
}
