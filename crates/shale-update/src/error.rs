use shale_doc::PathError;
use shale_query::FilterParseError;
use thiserror::Error;

/// Coarse classification of an [`UpdateError`], for callers that translate
/// failures into command-level rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadValue,
    FailedToParse,
    PathNotViable,
    ImmutableField,
    InvalidPath,
    IllegalOperation,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpdateError {
    /// The operand could not be compiled into a predicate.
    #[error(transparent)]
    MalformedPredicate(#[from] FilterParseError),
    #[error("{0}")]
    BadValue(String),
    /// The update document itself is malformed.
    #[error("{0}")]
    FailedToParse(String),
    #[error("{0}")]
    PathNotViable(String),
    #[error("Performing an update on the path '{path}' would modify the immutable field '{field}'")]
    ImmutableField { path: String, field: String },
    #[error(transparent)]
    InvalidPath(#[from] PathError),
    #[error("Updating the path '{path}' would create a conflict at '{other}'")]
    Conflict { path: String, other: String },
    #[error("{0} node applied before init")]
    Uninitialized(&'static str),
}

impl UpdateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UpdateError::MalformedPredicate(_) | UpdateError::BadValue(_) => ErrorKind::BadValue,
            UpdateError::FailedToParse(_) => ErrorKind::FailedToParse,
            UpdateError::PathNotViable(_) => ErrorKind::PathNotViable,
            UpdateError::ImmutableField { .. } => ErrorKind::ImmutableField,
            UpdateError::InvalidPath(_) => ErrorKind::InvalidPath,
            UpdateError::Conflict { .. } | UpdateError::Uninitialized(_) => {
                ErrorKind::IllegalOperation
            }
        }
    }
}
