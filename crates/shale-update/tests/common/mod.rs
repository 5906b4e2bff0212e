#![allow(dead_code)]

use bson::{Bson, Document};
use shale_doc::{FieldPath, MutableDocument};
use shale_query::Collator;
use shale_update::{
    ApplyParams, ApplyResult, ImmutablePaths, IndexedPaths, LogBuilder, PullAllNode, PullNode,
    UpdateError, UpdateNode,
};

pub fn path(s: &str) -> FieldPath {
    FieldPath::parse(s).unwrap()
}

pub fn regex(pattern: &str, options: &str) -> Bson {
    Bson::RegularExpression(bson::Regex {
        pattern: pattern.to_string().try_into().unwrap(),
        options: options.to_string().try_into().unwrap(),
    })
}

/// A positive Decimal128 `coefficient * 10^exponent`.
pub fn decimal(coefficient: u128, exponent: i32) -> Bson {
    let biased = (exponent + 6176) as u128;
    let bits = (biased << 113) | coefficient;
    Bson::Decimal128(bson::Decimal128::from_bytes(bits.to_le_bytes()))
}

pub fn pull<'c>(operand: Bson, collator: Option<&'c dyn Collator>) -> PullNode<'c> {
    let mut node = PullNode::new();
    node.init(&operand, collator).unwrap();
    node
}

pub fn pull_all<'c>(operand: Bson, collator: Option<&'c dyn Collator>) -> PullAllNode<'c> {
    let mut node = PullAllNode::new();
    node.init(&operand, collator).unwrap();
    node
}

/// Apply context for one node call, built the way a caller would:
/// `path_taken` is the longest prefix of the operator's path present in the
/// document.
pub struct Harness {
    pub doc: MutableDocument,
    pub indexed: IndexedPaths,
    pub immutable: ImmutablePaths,
    pub log: LogBuilder,
}

impl Harness {
    pub fn new(doc: Document) -> Self {
        Self {
            doc: MutableDocument::new(doc),
            indexed: IndexedPaths::new(),
            immutable: ImmutablePaths::new(),
            log: LogBuilder::new(),
        }
    }

    pub fn indexed(mut self, p: &str) -> Self {
        self.indexed.add(path(p));
        self
    }

    pub fn immutable(mut self, p: &str) -> Self {
        self.immutable.add(path(p));
        self
    }

    pub fn apply<'c>(
        &mut self,
        node: &dyn UpdateNode<'c>,
        field: &str,
    ) -> Result<ApplyResult, UpdateError> {
        let full = path(field);
        let matched = self.doc.find_longest_prefix(&full);
        self.apply_split(node, &full.prefix(matched), &full.suffix(matched))
    }

    /// Apply with an explicit resolved prefix and unresolved remainder.
    pub fn apply_split<'c>(
        &mut self,
        node: &dyn UpdateNode<'c>,
        taken: &FieldPath,
        to_create: &FieldPath,
    ) -> Result<ApplyResult, UpdateError> {
        node.apply(ApplyParams {
            document: &mut self.doc,
            path_taken: taken.clone(),
            path_to_create: to_create.clone(),
            indexed_paths: Some(&self.indexed),
            immutable_paths: &self.immutable,
            log_builder: Some(&mut self.log),
        })
    }

    pub fn root(&self) -> &Document {
        self.doc.root()
    }

    pub fn log_doc(&self) -> Document {
        self.log.serialize()
    }

    pub fn in_place(&self) -> bool {
        self.doc.is_in_place_mode_enabled()
    }
}
