//! Directory-backed configmap store.
//!
//! Every fetch reads from disk, so edits are visible on the next
//! configuration build without any refresh step.

use std::path::PathBuf;

use crate::error::StoreError;
use crate::resolver::{RawHeaderSet, StoreFetcher};
use crate::store::{decode_manifest, is_valid_name, EXTENSIONS};

/// Reads `<root>/<name>.json` or `<root>/<name>.toml`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        if !is_valid_name(name) {
            return None;
        }
        EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{}.{}", name, ext)))
            .find(|path| path.is_file())
    }
}

impl StoreFetcher for DirectoryStore {
    fn fetch(&self, name: &str) -> Result<RawHeaderSet, StoreError> {
        let Some(path) = self.locate(name) else {
            tracing::debug!(name, root = ?self.root, "Configmap not found");
            return Err(StoreError::NotFound { name: name.to_string() });
        };

        let config_map = decode_manifest(&path).map_err(|reason| {
            tracing::warn!(name, path = ?path, %reason, "Failed to decode configmap");
            StoreError::unreadable(name, reason)
        })?;

        config_map.header_set(name)
    }
}
