use bson::{Bson, Document};
use shale_doc::FieldPath;

/// Append-only recorder of the minimal change-log for an update.
///
/// Serializes to `{ $set: {..} }`, or `{}` when nothing was recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogBuilder {
    sets: Document,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_set(&mut self, path: &FieldPath, value: Bson) {
        self.sets.insert(path.dotted(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Append every entry of `other`; later entries win on the same path.
    pub fn merge(&mut self, other: LogBuilder) {
        for (key, value) in other.sets {
            self.sets.insert(key, value);
        }
    }

    pub fn serialize(&self) -> Document {
        let mut out = Document::new();
        if !self.sets.is_empty() {
            out.insert("$set", self.sets.clone());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn path(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn empty_builder_serializes_to_empty_document() {
        assert_eq!(LogBuilder::new().serialize(), doc! {});
    }

    #[test]
    fn set_section_uses_dotted_paths() {
        let mut log = LogBuilder::new();
        log.log_set(&path("a.b"), Bson::Array(vec![]));
        log.log_set(&path("c"), Bson::Array(vec![Bson::Int32(1)]));
        assert!(!log.is_empty());
        assert_eq!(log.serialize(), doc! { "$set": { "a.b": [], "c": [1] } });
    }

    #[test]
    fn merge_keeps_latest_entry_per_path() {
        let mut first = LogBuilder::new();
        first.log_set(&path("a"), Bson::Int32(1));

        let mut second = LogBuilder::new();
        second.log_set(&path("b"), Bson::Int32(2));
        second.log_set(&path("a"), Bson::Int32(3));

        first.merge(second);
        assert_eq!(first.serialize(), doc! { "$set": { "a": 3, "b": 2 } });
    }
}
