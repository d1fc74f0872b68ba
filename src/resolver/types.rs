//! Value types flowing through header resolution.

use std::collections::BTreeMap;

use serde::Serialize;

/// Header name to header value, as fetched from a store object.
///
/// Ordered so two resolutions of the same store produce identical output.
pub type RawHeaderSet = BTreeMap<String, String>;

/// Name of an external key/value object holding header overrides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreReference(String);

impl StoreReference {
    /// Surrounding whitespace is dropped. Returns `None` for blank names.
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Header names a backend permits to be overridden.
///
/// Keeps first-seen order, drops duplicates. Matching is case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    names: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for name in names {
            let name = name.into();
            if !list.names.contains(&name) {
                list.names.push(name);
            }
        }
        list
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Validated response-header overrides for one routing resource.
///
/// Every key is a member of the allow-list it was validated against. There is
/// no way to mutate a `Config` after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    headers: BTreeMap<String, String>,
}

impl Config {
    pub(crate) fn new(headers: BTreeMap<String, String>) -> Self {
        Self { headers }
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// An explicit "override nothing" state, distinct from a disabled feature.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}
