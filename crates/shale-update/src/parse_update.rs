use bson::{Bson, Document};
use shale_doc::FieldPath;
use shale_query::Collator;
use tracing::debug;

use crate::error::UpdateError;
use crate::node::UpdateNode;
use crate::plan::{FieldUpdate, UpdatePlan};
use crate::pull::PullNode;
use crate::pull_all::PullAllNode;

/// Parse an update document into an [`UpdatePlan`].
///
/// Recognizes `$pull` and `$pullAll`, each mapping field paths to operands.
/// Every operand is compiled against `collator` up front.
///
/// # Errors
///
/// Unknown operators, bare (non-operator) fields, operator values that are
/// not documents, empty operator documents, empty or malformed paths, operands
/// the operator rejects, and paths that overlap another path in the same
/// document.
pub fn parse_update<'c>(
    doc: &Document,
    collator: Option<&'c dyn Collator>,
) -> Result<UpdatePlan<'c>, UpdateError> {
    let mut updates: Vec<FieldUpdate<'c>> = Vec::new();

    for (key, value) in doc {
        let operator = match key.as_str() {
            "$pull" => Operator::Pull,
            "$pullAll" => Operator::PullAll,
            k if k.starts_with('$') => {
                return Err(UpdateError::FailedToParse(format!("Unknown modifier: {k}")));
            }
            k => {
                return Err(UpdateError::FailedToParse(format!(
                    "bare field '{k}' is not allowed in an update; use an update operator"
                )));
            }
        };

        let Bson::Document(fields) = value else {
            return Err(UpdateError::FailedToParse(format!(
                "Modifiers operate on fields but we found type {:?} instead",
                value.element_type()
            )));
        };
        if fields.is_empty() {
            return Err(UpdateError::FailedToParse(format!(
                "'{key}' is empty. You must specify a field like so: {{{key}: {{<field>: ...}}}}"
            )));
        }

        for (field, operand) in fields {
            let path = FieldPath::parse(field)?;
            if path.is_empty() {
                return Err(UpdateError::FailedToParse(
                    "An empty update path is not valid.".into(),
                ));
            }
            if let Some(existing) = updates.iter().find(|u| overlaps(&u.path, &path)) {
                return Err(UpdateError::Conflict {
                    path: path.dotted(),
                    other: existing.path.dotted(),
                });
            }
            let mut node = operator.node();
            node.init(operand, collator)?;
            updates.push(FieldUpdate { path, node });
        }
    }

    if updates.is_empty() {
        return Err(UpdateError::FailedToParse("empty update document".into()));
    }

    debug!(fields = updates.len(), "parsed update plan");
    Ok(UpdatePlan::new(updates))
}

#[derive(Debug, Clone, Copy)]
enum Operator {
    Pull,
    PullAll,
}

impl Operator {
    fn node<'c>(self) -> Box<dyn UpdateNode<'c> + 'c> {
        match self {
            Operator::Pull => Box::new(PullNode::new()),
            Operator::PullAll => Box::new(PullAllNode::new()),
        }
    }
}

fn overlaps(a: &FieldPath, b: &FieldPath) -> bool {
    a.is_prefix_of_or_equal_to(b) || b.is_prefix_of(a)
}
