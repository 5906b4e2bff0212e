use shale_doc::{FieldPath, array_index};

/// Paths declared as covered by a secondary index.
///
/// Stored in canonical form: positional (numeric) components are dropped,
/// since an index on `a.b` covers `a.0.b` as well.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedPaths {
    paths: Vec<FieldPath>,
}

impl IndexedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: FieldPath) {
        let path = canonicalize(&path);
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// True if a write to `path` could change the keys of some registered index:
    /// the canonical path equals, is a prefix of, or extends a registered path.
    pub fn might_be_indexed(&self, path: &FieldPath) -> bool {
        let path = canonicalize(path);
        self.paths
            .iter()
            .any(|indexed| indexed.is_prefix_of_or_equal_to(&path) || path.is_prefix_of(indexed))
    }
}

impl FromIterator<FieldPath> for IndexedPaths {
    fn from_iter<I: IntoIterator<Item = FieldPath>>(iter: I) -> Self {
        let mut paths = Self::new();
        for path in iter {
            paths.add(path);
        }
        paths
    }
}

fn canonicalize(path: &FieldPath) -> FieldPath {
    FieldPath::from_parts(
        path.parts()
            .iter()
            .filter(|part| array_index(part).is_none()),
    )
}

/// Paths that no update may modify.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImmutablePaths {
    paths: Vec<FieldPath>,
}

impl ImmutablePaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: FieldPath) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The first registered path equal to `path` or an ancestor of it.
    pub fn conflict(&self, path: &FieldPath) -> Option<&FieldPath> {
        self.paths
            .iter()
            .find(|immutable| immutable.is_prefix_of_or_equal_to(path))
    }
}

impl FromIterator<FieldPath> for ImmutablePaths {
    fn from_iter<I: IntoIterator<Item = FieldPath>>(iter: I) -> Self {
        let mut paths = Self::new();
        for path in iter {
            paths.add(path);
        }
        paths
    }
}
