use bson::Bson;
use shale_doc::Resolution;
use tracing::{debug, trace};

use crate::context::{ApplyParams, ApplyResult};
use crate::error::UpdateError;

/// Remove every element of the target array for which `matches` holds.
///
/// Shared by the array-culling operators. All preconditions (path viability,
/// target type, immutability) are checked before the document is touched.
pub(crate) fn cull_array(
    operator: &str,
    params: ApplyParams<'_>,
    matches: impl Fn(&Bson) -> bool,
) -> Result<ApplyResult, UpdateError> {
    let path = params.full_path();

    let target = match params
        .document
        .resolve(&params.path_taken, &params.path_to_create)
    {
        Resolution::Found(element) => element,
        Resolution::Absent => {
            trace!(%path, operator, "target absent");
            return Ok(ApplyResult::noop());
        }
        Resolution::Blocked { part, element } => {
            let blocking = params
                .path_taken
                .join(&params.path_to_create.prefix(part));
            return Err(UpdateError::PathNotViable(format!(
                "Cannot use the part ({}) of ({}) to traverse the element ({{{}: {}}})",
                params.path_to_create.part(part).unwrap_or_default(),
                path,
                blocking.last().unwrap_or_default(),
                element.to_bson(),
            )));
        }
    };

    let Some(items) = target.as_array() else {
        return Err(UpdateError::BadValue(format!(
            "Cannot apply {operator} to a non-array value"
        )));
    };

    if let Some(field) = params.immutable_paths.conflict(&path) {
        return Err(UpdateError::ImmutableField {
            path: path.dotted(),
            field: field.dotted(),
        });
    }

    let kept: Vec<Bson> = items.iter().filter(|item| !matches(*item)).cloned().collect();
    let removed = items.len() - kept.len();
    if removed == 0 {
        trace!(%path, operator, "no elements matched");
        return Ok(ApplyResult::noop());
    }

    let ApplyParams {
        document,
        indexed_paths,
        log_builder,
        ..
    } = params;

    document.set_value(&path, Bson::Array(kept.clone()))?;
    if let Some(log) = log_builder {
        log.log_set(&path, Bson::Array(kept));
    }

    let indexes_affected = indexed_paths.is_some_and(|indexed| indexed.might_be_indexed(&path));
    debug!(
        %path,
        operator,
        removed,
        in_place = document.is_in_place_mode_enabled(),
        indexes_affected,
        "culled array elements"
    );
    Ok(ApplyResult::changed(indexes_affected))
}
