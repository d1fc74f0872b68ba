//! Error types for header resolution.
//!
//! # Design Decisions
//! - Store collaborators report only two outcomes: the object is missing, or
//!   it exists but cannot be used as a header set
//! - The resolver maps those onto its own taxonomy so callers never match on
//!   collaborator internals
//! - Allow-list violations are aggregated into a single error

use thiserror::Error;

/// Error reported by a [`StoreFetcher`](crate::resolver::StoreFetcher).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store object {name:?} not found")]
    NotFound { name: String },

    #[error("store object {name:?} could not be read: {reason}")]
    Unreadable { name: String, reason: String },
}

impl StoreError {
    pub fn unreadable(name: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::Unreadable {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Fieldless discriminant of [`ResolveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ReferenceNotFound,
    ReferenceUnreadable,
    HeaderNotAllowed,
}

/// Why a header reference failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unable to find configMap {name:?}")]
    ReferenceNotFound { name: String },

    #[error("unable to read configMap {name:?}: {reason}")]
    ReferenceUnreadable { name: String, reason: String },

    /// `names` is sorted and holds every rejected header.
    #[error(
        "header(s) {} not allowed, defined allowed headers inside global-allowed-response-headers [{}]",
        .names.join(", "),
        .allowed.join(", ")
    )]
    HeaderNotAllowed { names: Vec<String>, allowed: Vec<String> },
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::ReferenceNotFound { .. } => ErrorKind::ReferenceNotFound,
            ResolveError::ReferenceUnreadable { .. } => ErrorKind::ReferenceUnreadable,
            ResolveError::HeaderNotAllowed { .. } => ErrorKind::HeaderNotAllowed,
        }
    }
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { name } => ResolveError::ReferenceNotFound { name },
            StoreError::Unreadable { name, reason } => {
                ResolveError::ReferenceUnreadable { name, reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let err: ResolveError = StoreError::NotFound { name: "cm".into() }.into();
        assert_eq!(err.kind(), ErrorKind::ReferenceNotFound);

        let err: ResolveError = StoreError::unreadable("cm", "bad toml").into();
        assert_eq!(
            err,
            ResolveError::ReferenceUnreadable {
                name: "cm".into(),
                reason: "bad toml".into()
            }
        );
    }

    #[test]
    fn test_not_allowed_message_lists_every_name() {
        let err = ResolveError::HeaderNotAllowed {
            names: vec!["X-A".into(), "X-B".into()],
            allowed: vec!["Content-Type".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("X-A, X-B"));
        assert!(msg.contains("[Content-Type]"));
    }
}
