mod document;
mod error;
mod path;

pub use document::{Element, MutableDocument, Resolution};
pub use error::PathError;
pub use path::{FieldPath, array_index};
