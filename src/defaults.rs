//! Backend defaults.
//!
//! # Responsibilities
//! - Hold the operator-configured defaults every backend inherits
//! - Serve the response-header allow-list to the resolver
//! - Swap in new defaults on config reload without blocking readers

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::resolver::{AllowList, AllowListProvider};

/// Defaults applied to every backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Backend {
    /// Response headers an ingress may override (`global-allowed-response-headers`).
    pub allowed_response_headers: Vec<String>,
}

impl Backend {
    pub fn allow_list(&self) -> AllowList {
        AllowList::new(self.allowed_response_headers.iter().cloned())
    }
}

/// Process-wide backend defaults, replaced atomically on reload.
#[derive(Debug)]
pub struct SharedBackend {
    inner: ArcSwap<Backend>,
}

impl SharedBackend {
    pub fn new(backend: Backend) -> Self {
        Self {
            inner: ArcSwap::from_pointee(backend),
        }
    }

    pub fn store(&self, backend: Backend) {
        self.inner.store(Arc::new(backend));
    }
}

impl Default for SharedBackend {
    fn default() -> Self {
        Self::new(Backend::default())
    }
}

impl AllowListProvider for SharedBackend {
    fn allow_list(&self) -> AllowList {
        self.inner.load().allow_list()
    }
}
