//! Routing resource model.
//!
//! Only the metadata the annotation parsers read is modelled; the rest of a
//! manifest is ignored on deserialization.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Read access to resource annotations.
pub trait Annotated {
    fn annotation(&self, key: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    pub annotations: BTreeMap<String, String>,
}

impl Annotated for ObjectMeta {
    fn annotation(&self, key: &str) -> Option<&str> {
        self.annotations.get(key).map(String::as_str)
    }
}

/// An ingress (routing) resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Ingress {
    pub metadata: ObjectMeta,
}

impl Ingress {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                namespace: namespace.into(),
                annotations: BTreeMap::new(),
            },
        }
    }

    /// `namespace/name`, used in log fields.
    pub fn key(&self) -> String {
        format!("{}/{}", self.metadata.namespace, self.metadata.name)
    }

    pub fn set_annotation(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.annotations.insert(key.into(), value.into());
    }

    /// Load an ingress from a JSON manifest.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Annotated for Ingress {
    fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata.annotation(key)
    }
}

/// Error loading a manifest from disk.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
