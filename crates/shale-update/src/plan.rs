use shale_doc::{FieldPath, MutableDocument};
use shale_query::Collator;

use crate::context::{ApplyParams, ApplyResult};
use crate::error::UpdateError;
use crate::log_builder::LogBuilder;
use crate::node::UpdateNode;
use crate::paths::{ImmutablePaths, IndexedPaths};

/// One operator bound to one field path.
#[derive(Debug)]
pub(crate) struct FieldUpdate<'c> {
    pub(crate) path: FieldPath,
    pub(crate) node: Box<dyn UpdateNode<'c> + 'c>,
}

/// A parsed update document: field updates in document order.
#[derive(Debug)]
pub struct UpdatePlan<'c> {
    updates: Vec<FieldUpdate<'c>>,
}

impl<'c> UpdatePlan<'c> {
    pub(crate) fn new(updates: Vec<FieldUpdate<'c>>) -> Self {
        Self { updates }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Target paths paired with their operator names.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldPath, &'static str)> {
        self.updates
            .iter()
            .map(|update| (&update.path, update.node.operator_name()))
    }

    /// Apply every field update to `document`.
    ///
    /// All-or-nothing: updates run against a scratch copy which replaces
    /// `document`, and whose log entries are appended to `log`, only if every
    /// update succeeds.
    pub fn apply(
        &self,
        document: &mut MutableDocument,
        indexed_paths: Option<&IndexedPaths>,
        immutable_paths: &ImmutablePaths,
        log: Option<&mut LogBuilder>,
    ) -> Result<ApplyResult, UpdateError> {
        let mut scratch = document.clone();
        let mut scratch_log = LogBuilder::new();
        let mut result = ApplyResult::noop();

        for update in &self.updates {
            let matched = scratch.find_longest_prefix(&update.path);
            let params = ApplyParams {
                document: &mut scratch,
                path_taken: update.path.prefix(matched),
                path_to_create: update.path.suffix(matched),
                indexed_paths,
                immutable_paths,
                log_builder: Some(&mut scratch_log),
            };
            let outcome = update.node.apply(params)?;
            result.noop &= outcome.noop;
            result.indexes_affected |= outcome.indexes_affected;
        }

        if result.noop {
            return Ok(result);
        }
        *document = scratch;
        if let Some(log) = log {
            log.merge(scratch_log);
        }
        Ok(result)
    }

    /// Rebind every node to `collator`. At most once per plan.
    pub fn set_collator(&mut self, collator: Option<&'c dyn Collator>) {
        for update in &mut self.updates {
            update.node.set_collator(collator);
        }
    }
}

impl Clone for UpdatePlan<'_> {
    fn clone(&self) -> Self {
        Self {
            updates: self
                .updates
                .iter()
                .map(|update| FieldUpdate {
                    path: update.path.clone(),
                    node: update.node.clone_node(),
                })
                .collect(),
        }
    }
}
