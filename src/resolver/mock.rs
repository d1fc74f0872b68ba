//! In-memory collaborator for tests and dry runs.

use std::collections::HashMap;

use crate::defaults::Backend;
use crate::error::StoreError;
use crate::resolver::{AllowList, AllowListProvider, RawHeaderSet, StoreFetcher};

/// Serves configmaps and a default backend from plain maps.
#[derive(Debug, Clone, Default)]
pub struct Mock {
    /// Configmap name -> data.
    pub config_maps: HashMap<String, RawHeaderSet>,
    /// Names that exist but fail to decode.
    pub unreadable: Vec<String>,
    pub default_backend: Backend,
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_allowed_headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_backend.allowed_response_headers = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_config_map<I, K, V>(mut self, name: &str, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let data = data.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.config_maps.insert(name.to_string(), data);
        self
    }

    pub fn with_unreadable(mut self, name: &str) -> Self {
        self.unreadable.push(name.to_string());
        self
    }
}

impl StoreFetcher for Mock {
    fn fetch(&self, name: &str) -> Result<RawHeaderSet, StoreError> {
        if self.unreadable.iter().any(|n| n == name) {
            return Err(StoreError::unreadable(name, "mock: undecodable object"));
        }
        self.config_maps
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { name: name.to_string() })
    }
}

impl AllowListProvider for Mock {
    fn allow_list(&self) -> AllowList {
        self.default_backend.allow_list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fetch() {
        let mock = Mock::new()
            .with_config_map("hdrs-cm", [("Content-Type", "application/json")])
            .with_unreadable("broken");

        assert_eq!(mock.fetch("hdrs-cm").unwrap().len(), 1);
        assert!(matches!(mock.fetch("other"), Err(StoreError::NotFound { .. })));
        assert!(matches!(mock.fetch("broken"), Err(StoreError::Unreadable { .. })));
    }
}
