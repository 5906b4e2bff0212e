use serde::{Deserialize, Serialize};
use shale_doc::{FieldPath, PathError};
use shale_query::{CollationError, CollationSpec, Collator};
use thiserror::Error;

use crate::paths::{ImmutablePaths, IndexedPaths};

/// Per-collection settings an update runs under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateConfig {
    #[serde(default)]
    pub indexes: Vec<String>,
    #[serde(default = "default_immutable_fields")]
    pub immutable_fields: Vec<String>,
    #[serde(default)]
    pub collation: Option<CollationSpec>,
}

fn default_immutable_fields() -> Vec<String> {
    vec!["_id".into()]
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            indexes: Vec::new(),
            immutable_fields: default_immutable_fields(),
            collation: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Collation(#[from] CollationError),
}

impl UpdateConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn indexed_paths(&self) -> Result<IndexedPaths, ConfigError> {
        Ok(parse_paths(&self.indexes)?.into_iter().collect())
    }

    pub fn immutable_paths(&self) -> Result<ImmutablePaths, ConfigError> {
        Ok(parse_paths(&self.immutable_fields)?.into_iter().collect())
    }

    /// The collator for this config; `None` means binary comparison.
    pub fn collator(&self) -> Result<Option<Box<dyn Collator>>, ConfigError> {
        match &self.collation {
            Some(spec) => Ok(spec.build()?),
            None => Ok(None),
        }
    }
}

fn parse_paths(paths: &[String]) -> Result<Vec<FieldPath>, PathError> {
    paths.iter().map(|p| FieldPath::parse(p)).collect()
}
