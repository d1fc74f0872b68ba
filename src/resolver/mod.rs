//! Header override resolution.
//!
//! # Data Flow
//! ```text
//! store reference (annotation value)
//!     → StoreFetcher::fetch (collaborator)
//!     → RawHeaderSet
//!     → validate against AllowListProvider::allow_list (collaborator)
//!     → Config (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Stateless and synchronous: safe to call from many threads as long as the
//!   collaborators are
//! - Reject on any violation: a single disallowed header fails the whole
//!   resolution, and every offending name is reported
//! - No logging and no retries here; callers own both
//! - Terminal outcomes: disabled `Ok(None)`, fetch failure, validation
//!   failure, or `Ok(Some(config))`

pub mod mock;
pub mod types;

use std::sync::Arc;

use crate::error::{ResolveError, StoreError};

pub use mock::Mock;
pub use types::{AllowList, Config, RawHeaderSet, StoreReference};

/// Fetches the key/value object a [`StoreReference`] names.
pub trait StoreFetcher {
    /// Must distinguish [`StoreError::NotFound`] from [`StoreError::Unreadable`].
    fn fetch(&self, name: &str) -> Result<RawHeaderSet, StoreError>;
}

/// Supplies the process-wide allow-list from backend defaults.
pub trait AllowListProvider {
    fn allow_list(&self) -> AllowList;
}

impl<F> StoreFetcher for F
where
    F: Fn(&str) -> Result<RawHeaderSet, StoreError>,
{
    fn fetch(&self, name: &str) -> Result<RawHeaderSet, StoreError> {
        self(name)
    }
}

impl<F> AllowListProvider for F
where
    F: Fn() -> AllowList,
{
    fn allow_list(&self) -> AllowList {
        self()
    }
}

/// Pairs a store with a defaults provider so both capabilities travel as one
/// value.
#[derive(Debug)]
pub struct Context<S, A> {
    pub store: Arc<S>,
    pub defaults: Arc<A>,
}

impl<S, A> Context<S, A> {
    pub fn new(store: Arc<S>, defaults: Arc<A>) -> Self {
        Self { store, defaults }
    }
}

impl<S, A> Clone for Context<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            defaults: Arc::clone(&self.defaults),
        }
    }
}

impl<S: StoreFetcher, A> StoreFetcher for Context<S, A> {
    fn fetch(&self, name: &str) -> Result<RawHeaderSet, StoreError> {
        self.store.fetch(name)
    }
}

impl<S, A: AllowListProvider> AllowListProvider for Context<S, A> {
    fn allow_list(&self) -> AllowList {
        self.defaults.allow_list()
    }
}

/// Resolve a store reference into validated header overrides.
///
/// Returns `Ok(None)` when `reference` is absent or blank.
pub fn resolve<F, A>(
    reference: Option<&str>,
    fetcher: &F,
    allow: &A,
) -> Result<Option<Config>, ResolveError>
where
    F: StoreFetcher + ?Sized,
    A: AllowListProvider + ?Sized,
{
    let Some(reference) = reference.and_then(StoreReference::new) else {
        return Ok(None);
    };

    let raw = fetcher.fetch(reference.as_str())?;
    let allow_list = allow.allow_list();

    validate(&raw, &allow_list)?;

    Ok(Some(Config::new(raw)))
}

/// Check every key of `raw` against `allow_list`.
pub fn validate(raw: &RawHeaderSet, allow_list: &AllowList) -> Result<(), ResolveError> {
    // BTreeMap iteration keeps `names` sorted.
    let names: Vec<String> = raw
        .keys()
        .filter(|name| !allow_list.contains(name))
        .cloned()
        .collect();

    if names.is_empty() {
        return Ok(());
    }

    Err(ResolveError::HeaderNotAllowed {
        names,
        allowed: allow_list.names().to_vec(),
    })
}
