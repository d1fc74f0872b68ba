//! In-memory configmap store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::StoreError;
use crate::resolver::{RawHeaderSet, StoreFetcher};
use crate::store::{decode_manifest, is_valid_name, ConfigMap, EXTENSIONS};

/// A stored object, or the reason it could not be decoded when loaded.
type Entry = Result<ConfigMap, String>;

/// A thread-safe configmap store the host keeps fresh.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a configmap, keyed by `metadata.name`.
    ///
    /// Returns `false` and stores nothing when the name could never be fetched.
    pub fn upsert(&self, config_map: ConfigMap) -> bool {
        let name = config_map.metadata.name.clone();
        if !is_valid_name(&name) {
            tracing::warn!(name = %name, "Ignoring configmap without a usable metadata.name");
            return false;
        }
        self.inner.insert(name, Ok(config_map));
        true
    }

    /// Record an object that exists but failed to decode.
    pub fn mark_unreadable(&self, name: impl Into<String>, reason: impl Into<String>) {
        self.inner.insert(name.into(), Err(reason.into()));
    }

    pub fn remove(&self, name: &str) -> bool {
        self.inner.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Load every manifest in `dir`, keyed by file stem.
    ///
    /// When several files share a stem, only the one whose extension comes
    /// first in `EXTENSIONS` is loaded, the same file `DirectoryStore` reads.
    /// Files that fail to decode are kept as unreadable entries so fetches
    /// report them as such instead of as missing.
    pub fn load_dir(dir: &Path) -> std::io::Result<Self> {
        let mut manifests: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(rank) = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(|ext| EXTENSIONS.iter().position(|known| *known == ext))
            else {
                continue;
            };
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_valid_name(name) {
                continue;
            }

            match manifests.get(name) {
                Some((kept, shadowed)) if *kept < rank => {
                    tracing::debug!(path = ?path, kept = ?shadowed, "Skipping shadowed manifest");
                }
                _ => {
                    manifests.insert(name.to_string(), (rank, path));
                }
            }
        }

        let store = Self::new();
        for (name, (_, path)) in manifests {
            match decode_manifest(&path) {
                Ok(mut config_map) => {
                    config_map.metadata.name = name;
                    store.upsert(config_map);
                }
                Err(reason) => {
                    tracing::warn!(name = %name, path = ?path, %reason, "Failed to decode configmap");
                    store.mark_unreadable(name, reason);
                }
            }
        }
        tracing::info!("Loaded {} configmaps from {}", store.len(), dir.display());
        Ok(store)
    }
}

impl StoreFetcher for MemoryStore {
    fn fetch(&self, name: &str) -> Result<RawHeaderSet, StoreError> {
        match self.inner.get(name) {
            Some(entry) => match entry.value() {
                Ok(config_map) => config_map.header_set(name),
                Err(reason) => Err(StoreError::unreadable(name, reason)),
            },
            None => Err(StoreError::NotFound { name: name.to_string() }),
        }
    }
}
