//! Configmap stores backing header references.
//!
//! # Data Flow
//! ```text
//! manifests on disk (<name>.json | <name>.toml)
//!     → directory.rs (read on every fetch)
//!     → memory.rs (loaded once, refreshed by the host)
//!     → ConfigMap::header_set
//!     → RawHeaderSet handed to the resolver
//! ```
//!
//! # Design Decisions
//! - Missing objects and undecodable objects are distinct errors
//! - `binaryData` never becomes a header value

pub mod directory;
pub mod memory;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::ingress::ObjectMeta;
use crate::resolver::RawHeaderSet;

pub use directory::DirectoryStore;
pub use memory::MemoryStore;

/// A configmap manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigMap {
    pub metadata: ObjectMeta,
    pub data: BTreeMap<String, String>,
    /// Base64 payloads, kept opaque.
    pub binary_data: BTreeMap<String, String>,
}

impl ConfigMap {
    pub fn new<I, K, V>(name: impl Into<String>, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                ..ObjectMeta::default()
            },
            data: data.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            binary_data: BTreeMap::new(),
        }
    }

    /// The `data` entries as candidate headers.
    pub fn header_set(&self, name: &str) -> Result<RawHeaderSet, StoreError> {
        if !self.binary_data.is_empty() {
            let keys: Vec<&str> = self.binary_data.keys().map(String::as_str).collect();
            return Err(StoreError::unreadable(
                name,
                format!("binaryData entries cannot be used as header values: {}", keys.join(", ")),
            ));
        }
        Ok(self.data.clone())
    }
}

/// Manifest encodings a store understands, by file extension, highest precedence first.
pub(crate) const EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Decode a manifest file according to its extension.
pub(crate) fn decode_manifest(path: &Path) -> Result<ConfigMap, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("IO error: {}", e))?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| format!("Parse error: {}", e)),
        Some("toml") => toml::from_str(&content).map_err(|e| format!("Parse error: {}", e)),
        other => Err(format!("unsupported manifest extension {:?}", other)),
    }
}

/// A store object name must be a single path component.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
