use bson::{Bson, Document, RawDocumentBuf, doc};

use crate::error::PathError;
use crate::path::{FieldPath, array_index};

/// A borrowed element of a [`MutableDocument`]: either the root or a nested value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element<'a> {
    Root(&'a Document),
    Value(&'a Bson),
}

impl<'a> Element<'a> {
    pub fn as_bson(&self) -> Option<&'a Bson> {
        match self {
            Element::Root(_) => None,
            Element::Value(v) => Some(v),
        }
    }

    pub fn as_array(&self) -> Option<&'a Vec<Bson>> {
        match self {
            Element::Value(Bson::Array(items)) => Some(items),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        self.as_array().is_some()
    }

    /// Documents and arrays can be descended into; the root is a document.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Element::Root(_) | Element::Value(Bson::Document(_)) | Element::Value(Bson::Array(_))
        )
    }

    pub fn to_bson(&self) -> Bson {
        match self {
            Element::Root(doc) => Bson::Document((*doc).clone()),
            Element::Value(v) => (*v).clone(),
        }
    }
}

/// Outcome of descending from a resolved element through an unresolved suffix.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Found(Element<'a>),
    /// Some component of the suffix does not exist.
    Absent,
    /// `element` cannot be descended into by suffix component `part`.
    Blocked { part: usize, element: Element<'a> },
}

enum Step<'a> {
    Child(&'a Bson),
    Missing,
    Blocked,
}

fn step<'a>(element: Element<'a>, part: &str) -> Step<'a> {
    match element {
        Element::Root(doc) | Element::Value(Bson::Document(doc)) => {
            doc.get(part).map_or(Step::Missing, Step::Child)
        }
        Element::Value(Bson::Array(items)) => match array_index(part) {
            Some(i) => items.get(i).map_or(Step::Missing, Step::Child),
            None => Step::Blocked,
        },
        Element::Value(_) => Step::Blocked,
    }
}

/// An owned document tree that tracks whether every replacement so far kept
/// each element's type and encoded width, i.e. whether the stored bytes could
/// have been patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct MutableDocument {
    root: Document,
    in_place: bool,
}

impl MutableDocument {
    pub fn new(root: Document) -> Self {
        Self {
            root,
            in_place: true,
        }
    }

    pub fn root(&self) -> &Document {
        &self.root
    }

    pub fn into_document(self) -> Document {
        self.root
    }

    pub fn is_in_place_mode_enabled(&self) -> bool {
        self.in_place
    }

    /// Once disabled, in-place mode stays off for the life of the document.
    pub fn disable_in_place_updates(&mut self) {
        self.in_place = false;
    }

    /// The element at `path`, or `None` if any component is missing or blocked.
    pub fn element(&self, path: &FieldPath) -> Option<Element<'_>> {
        let mut current = Element::Root(&self.root);
        for part in path.parts() {
            match step(current, part) {
                Step::Child(v) => current = Element::Value(v),
                Step::Missing | Step::Blocked => return None,
            }
        }
        Some(current)
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Bson> {
        self.element(path).and_then(|e| e.as_bson())
    }

    /// Descend from the element at `base` through every component of `suffix`.
    pub fn resolve(&self, base: &FieldPath, suffix: &FieldPath) -> Resolution<'_> {
        let Some(mut current) = self.element(base) else {
            return Resolution::Absent;
        };
        for (i, part) in suffix.parts().iter().enumerate() {
            match step(current, part) {
                Step::Child(v) => current = Element::Value(v),
                Step::Missing => return Resolution::Absent,
                Step::Blocked => {
                    return Resolution::Blocked {
                        part: i,
                        element: current,
                    };
                }
            }
        }
        Resolution::Found(current)
    }

    /// Number of leading components of `path` that exist in the document.
    pub fn find_longest_prefix(&self, path: &FieldPath) -> usize {
        let mut current = Element::Root(&self.root);
        let mut matched = 0;
        for part in path.parts() {
            match step(current, part) {
                Step::Child(v) => {
                    current = Element::Value(v);
                    matched += 1;
                }
                Step::Missing | Step::Blocked => break,
            }
        }
        matched
    }

    /// Replace the existing element at `path`.
    ///
    /// A replacement that changes the element's type or encoded width turns
    /// in-place mode off.
    pub fn set_value(&mut self, path: &FieldPath, value: Bson) -> Result<(), PathError> {
        if path.is_empty() {
            return Err(PathError::Root);
        }
        let slot = get_mut(&mut self.root, path).ok_or_else(|| PathError::NotFound(path.dotted()))?;
        let same_shape = slot.element_type() == value.element_type()
            && encoded_width(slot).is_some_and(|w| Some(w) == encoded_width(&value));
        *slot = value;
        if !same_shape {
            self.in_place = false;
        }
        Ok(())
    }
}

impl From<Document> for MutableDocument {
    fn from(root: Document) -> Self {
        Self::new(root)
    }
}

/// Encoded size of `value` as the sole field of a document. The fixed
/// overhead cancels when two widths are compared.
fn encoded_width(value: &Bson) -> Option<usize> {
    RawDocumentBuf::try_from(&doc! { "": value.clone() })
        .ok()
        .map(|raw| raw.as_bytes().len())
}

fn get_mut<'a>(root: &'a mut Document, path: &FieldPath) -> Option<&'a mut Bson> {
    let (first, rest) = path.parts().split_first()?;
    let mut current = root.get_mut(first.as_str())?;
    for part in rest {
        current = match current {
            Bson::Document(doc) => doc.get_mut(part.as_str())?,
            Bson::Array(items) => items.get_mut(array_index(part)?)?,
            _ => return None,
        };
    }
    Some(current)
}
