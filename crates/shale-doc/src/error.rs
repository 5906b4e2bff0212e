use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("field path '{0}' contains an empty component")]
    EmptyComponent(String),
    #[error("no element at path '{0}'")]
    NotFound(String),
    #[error("cannot replace the document root")]
    Root,
}
