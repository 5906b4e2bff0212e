use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// String ordering override. Only string-vs-string comparisons consult it.
///
/// Callers pass `Option<&dyn Collator>`; `None` means plain byte-wise comparison.
pub trait Collator: fmt::Debug + Send + Sync {
    fn compare(&self, left: &str, right: &str) -> Ordering;
}

/// Compare two strings under `collator`, or byte-wise when there is none.
pub fn compare_strings(left: &str, right: &str, collator: Option<&dyn Collator>) -> Ordering {
    match collator {
        Some(c) => c.compare(left, right),
        None => left.cmp(right),
    }
}

/// Case-insensitive comparison by Unicode lowercase folding.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFoldingCollator;

impl Collator for CaseFoldingCollator {
    fn compare(&self, left: &str, right: &str) -> Ordering {
        fold(left).cmp(fold(right))
    }
}

fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockKind {
    /// Compare the reversed strings.
    ReverseString,
    /// Compare the lowercased strings.
    ToLowerString,
    /// Every pair of strings is equal.
    AlwaysEqual,
}

/// Deterministic collators for exercising collation-sensitive code paths.
#[derive(Debug, Clone, Copy)]
pub struct MockCollator {
    kind: MockKind,
}

impl MockCollator {
    pub fn new(kind: MockKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> MockKind {
        self.kind
    }
}

impl Collator for MockCollator {
    fn compare(&self, left: &str, right: &str) -> Ordering {
        match self.kind {
            MockKind::ReverseString => left.chars().rev().cmp(right.chars().rev()),
            MockKind::ToLowerString => fold(left).cmp(fold(right)),
            MockKind::AlwaysEqual => Ordering::Equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollationError {
    #[error("collation strength must be between 1 and 5, got {0}")]
    InvalidStrength(u8),
}

/// User-facing collation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollationSpec {
    pub locale: String,
    #[serde(default = "default_strength")]
    pub strength: u8,
}

fn default_strength() -> u8 {
    3
}

impl CollationSpec {
    pub fn simple() -> Self {
        Self {
            locale: "simple".into(),
            strength: default_strength(),
        }
    }

    /// Build the collator these settings describe. `Ok(None)` means binary comparison.
    ///
    /// Strengths 1 and 2 ignore case; 3 and above distinguish it, which for
    /// the supported locales is plain binary order.
    pub fn build(&self) -> Result<Option<Box<dyn Collator>>, CollationError> {
        if !(1..=5).contains(&self.strength) {
            return Err(CollationError::InvalidStrength(self.strength));
        }
        if self.locale == "simple" || self.strength >= 3 {
            return Ok(None);
        }
        Ok(Some(Box::new(CaseFoldingCollator)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_collator_is_bytewise() {
        assert_eq!(compare_strings("B", "a", None), Ordering::Less);
    }

    #[test]
    fn case_folding() {
        let c = CaseFoldingCollator;
        assert_eq!(c.compare("ABC", "abc"), Ordering::Equal);
        assert_eq!(compare_strings("B", "a", Some(&c)), Ordering::Greater);
    }

    #[test]
    fn reverse_string_mock() {
        let c = MockCollator::new(MockKind::ReverseString);
        // "cba" < "ccz"
        assert_eq!(c.compare("abc", "zcc"), Ordering::Less);
        // "aaz" < "cba"
        assert_eq!(c.compare("zaa", "abc"), Ordering::Less);
    }

    #[test]
    fn always_equal_mock() {
        let c = MockCollator::new(MockKind::AlwaysEqual);
        assert_eq!(c.compare("x", "completely different"), Ordering::Equal);
    }

    #[test]
    fn spec_build() {
        assert!(CollationSpec::simple().build().unwrap().is_none());
        let ci = CollationSpec {
            locale: "en".into(),
            strength: 2,
        };
        let collator = ci.build().unwrap().unwrap();
        assert_eq!(collator.compare("Hello", "hELLO"), Ordering::Equal);
        let bad = CollationSpec {
            locale: "en".into(),
            strength: 9,
        };
        assert_eq!(bad.build().unwrap_err(), CollationError::InvalidStrength(9));
    }

    #[test]
    fn spec_deserializes_with_default_strength() {
        let spec: CollationSpec = serde_json::from_str(r#"{ "locale": "en" }"#).unwrap();
        assert_eq!(spec.strength, 3);
    }
}
