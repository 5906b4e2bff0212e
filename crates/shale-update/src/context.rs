use shale_doc::{FieldPath, MutableDocument};

use crate::log_builder::LogBuilder;
use crate::paths::{ImmutablePaths, IndexedPaths};

/// Everything one `apply` call needs.
///
/// `path_taken` is the deepest prefix of the operator's path that the caller
/// found in `document`; `path_to_create` is the remainder. A non-empty
/// remainder means the target field does not exist yet.
#[derive(Debug)]
pub struct ApplyParams<'a> {
    pub document: &'a mut MutableDocument,
    pub path_taken: FieldPath,
    pub path_to_create: FieldPath,
    pub indexed_paths: Option<&'a IndexedPaths>,
    pub immutable_paths: &'a ImmutablePaths,
    pub log_builder: Option<&'a mut LogBuilder>,
}

impl ApplyParams<'_> {
    /// The operator's full path.
    pub fn full_path(&self) -> FieldPath {
        self.path_taken.join(&self.path_to_create)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyResult {
    pub noop: bool,
    /// Only ever set when `noop` is false.
    pub indexes_affected: bool,
}

impl ApplyResult {
    pub fn noop() -> Self {
        Self {
            noop: true,
            indexes_affected: false,
        }
    }

    pub fn changed(indexes_affected: bool) -> Self {
        Self {
            noop: false,
            indexes_affected,
        }
    }
}
