//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the annotation prefix is usable as a key prefix
//! - Check allow-list entries are legal header names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ControllerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::ControllerConfig;

/// A single semantic problem in a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyAnnotationPrefix,
    InvalidAnnotationPrefix(String),
    InvalidHeaderName(String),
    DuplicateHeaderName(String),
    EmptyStorePath,
    InvalidLogLevel(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyAnnotationPrefix => write!(f, "annotations.prefix is empty"),
            ValidationError::InvalidAnnotationPrefix(p) => {
                write!(f, "annotations.prefix {:?} must not contain '/' or whitespace", p)
            }
            ValidationError::InvalidHeaderName(h) => {
                write!(f, "backend.allowed_response_headers: {:?} is not a valid header name", h)
            }
            ValidationError::DuplicateHeaderName(h) => {
                write!(f, "backend.allowed_response_headers: {:?} listed more than once", h)
            }
            ValidationError::EmptyStorePath => write!(f, "store.path is empty"),
            ValidationError::InvalidLogLevel(l) => {
                write!(f, "observability.log_level {:?} is not a known level", l)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    /// Config table the error belongs to.
    pub fn section(&self) -> &'static str {
        match self {
            ValidationError::EmptyAnnotationPrefix | ValidationError::InvalidAnnotationPrefix(_) => {
                "annotations"
            }
            ValidationError::InvalidHeaderName(_) | ValidationError::DuplicateHeaderName(_) => {
                "backend"
            }
            ValidationError::EmptyStorePath => "store",
            ValidationError::InvalidLogLevel(_) => "observability",
        }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Non-alphanumeric `tchar` bytes allowed in a header field name (RFC 7230 §3.2.6).
const TOKEN_PUNCTUATION: &[u8] = b"!#$%&'*+-.^_`|~";

/// A header name is a non-empty `token`.
pub fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || TOKEN_PUNCTUATION.contains(&b))
}

/// Validate a config, collecting every problem.
pub fn validate_config(config: &ControllerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.annotations.prefix;
    if prefix.is_empty() {
        errors.push(ValidationError::EmptyAnnotationPrefix);
    } else if prefix.contains('/') || prefix.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidAnnotationPrefix(prefix.clone()));
    }

    let mut seen = HashSet::new();
    for name in &config.backend.allowed_response_headers {
        if !is_valid_header_name(name) {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        } else if !seen.insert(name.as_str()) {
            errors.push(ValidationError::DuplicateHeaderName(name.clone()));
        }
    }

    if config.store.path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyStorePath);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ControllerConfig::default()).is_ok());
    }

    #[test]
    fn test_header_names() {
        assert!(is_valid_header_name("Access-Control-Max-Age"));
        assert!(is_valid_header_name("X_Custom"));
        assert!(is_valid_header_name("X.Custom"));
        assert!(is_valid_header_name("X-Trace~Id|v2"));
        assert!(!is_valid_header_name("X(Custom)"));
        assert!(!is_valid_header_name("X-Caf\u{e9}"));
        assert!(!is_valid_header_name(""));
        assert!(!is_valid_header_name("Bad Header"));
        assert!(!is_valid_header_name("X-Bad:"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ControllerConfig::default();
        config.annotations.prefix = "bad/prefix".into();
        config.backend.allowed_response_headers = vec![
            "Content-Type".into(),
            "Content-Type".into(),
            "Not Valid".into(),
        ];
        config.store.path = PathBuf::new();
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidAnnotationPrefix("bad/prefix".into()),
                ValidationError::DuplicateHeaderName("Content-Type".into()),
                ValidationError::InvalidHeaderName("Not Valid".into()),
                ValidationError::EmptyStorePath,
                ValidationError::InvalidLogLevel("loud".into()),
            ]
        );
    }
}
