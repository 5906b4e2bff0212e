use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// A dotted field path split into its components.
///
/// `"a.b.0"` has three components. The empty string parses to the empty
/// path, which addresses the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    parts: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path. Empty components (`"a..b"`, `".a"`, `"a."`) are rejected.
    pub fn parse(dotted: &str) -> Result<Self, PathError> {
        if dotted.is_empty() {
            return Ok(Self::default());
        }
        let mut parts = Vec::new();
        for part in dotted.split('.') {
            if part.is_empty() {
                return Err(PathError::EmptyComponent(dotted.to_string()));
            }
            parts.push(part.to_string());
        }
        Ok(Self { parts })
    }

    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn part(&self, i: usize) -> Option<&str> {
        self.parts.get(i).map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    /// The first `n` components (all of them if `n` exceeds the length).
    pub fn prefix(&self, n: usize) -> FieldPath {
        Self {
            parts: self.parts[..n.min(self.parts.len())].to_vec(),
        }
    }

    /// Components from `n` onward.
    pub fn suffix(&self, n: usize) -> FieldPath {
        Self {
            parts: self.parts[n.min(self.parts.len())..].to_vec(),
        }
    }

    pub fn join(&self, other: &FieldPath) -> FieldPath {
        let mut parts = self.parts.clone();
        parts.extend(other.parts.iter().cloned());
        Self { parts }
    }

    pub fn push(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }

    /// Number of leading components shared with `other`.
    pub fn common_prefix_len(&self, other: &FieldPath) -> usize {
        self.parts
            .iter()
            .zip(other.parts.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Strict prefix: `a` is a prefix of `a.b` but not of `a`.
    pub fn is_prefix_of(&self, other: &FieldPath) -> bool {
        self.len() < other.len() && self.common_prefix_len(other) == self.len()
    }

    pub fn is_prefix_of_or_equal_to(&self, other: &FieldPath) -> bool {
        self == other || self.is_prefix_of(other)
    }

    pub fn dotted(&self) -> String {
        self.parts.join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(part)?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse a path component as an array position. Leading zeros are not positions.
pub fn array_index(part: &str) -> Option<usize> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok()
}
