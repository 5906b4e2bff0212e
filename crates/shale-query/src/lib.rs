mod collation;
mod compare;
mod eval;
mod expression;
mod parse_filter;
mod predicate;

pub use collation::{
    CaseFoldingCollator, CollationError, CollationSpec, Collator, MockCollator, MockKind,
    compare_strings,
};
pub use compare::{canonical_rank, compare_values, values_equal};
pub use eval::matches;
pub use expression::{Expression, InList};
pub use parse_filter::{FilterParseError, compile_regex, parse_filter};
pub use predicate::Predicate;
