//! Configuration loading from disk.
//!
//! Failures name the config section at fault, so an operator can tell a
//! broken allow-list from a broken store path without reading the parser
//! output.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ControllerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: section [{}] is malformed: {source}", .path.display(), .section.as_deref().unwrap_or("root"))]
    Parse {
        path: PathBuf,
        /// Table the parser was in when it failed; `None` for top-level keys.
        section: Option<String>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: invalid configuration: {}", .path.display(), join_errors(.errors))]
    Invalid {
        path: PathBuf,
        errors: Vec<ValidationError>,
    },
}

impl ConfigError {
    /// Sections at fault, first occurrence order, without repeats.
    pub fn sections(&self) -> Vec<String> {
        let mut sections: Vec<String> = Vec::new();
        match self {
            ConfigError::Io { .. } => {}
            ConfigError::Parse { section, .. } => {
                sections.push(section.clone().unwrap_or_else(|| "root".to_string()));
            }
            ConfigError::Invalid { errors, .. } => {
                for err in errors {
                    if !sections.iter().any(|s| s == err.section()) {
                        sections.push(err.section().to_string());
                    }
                }
            }
        }
        sections
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("[{}] {}", e.section(), e))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ControllerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(path, &content)
}

/// Parse and validate `content`; `path` only labels errors.
pub fn parse_config(path: &Path, content: &str) -> Result<ControllerConfig, ConfigError> {
    let config: ControllerConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        section: source
            .span()
            .and_then(|span| section_at(content, span.start)),
        source,
    })?;

    validate_config(&config).map_err(|errors| ConfigError::Invalid {
        path: path.to_path_buf(),
        errors,
    })?;

    Ok(config)
}

/// Name of the last `[table]` header starting before byte `offset`.
fn section_at(content: &str, offset: usize) -> Option<String> {
    let mut section = None;
    let mut start = 0;
    for line in content.split_inclusive('\n') {
        if start > offset {
            break;
        }
        let trimmed = line.trim();
        if let Some(header) = trimmed.strip_prefix('[') {
            if let Some(end) = header.find(']') {
                let name = header[..end].trim_matches(|c| c == '[' || c == ' ');
                if !name.is_empty() {
                    section = Some(name.to_string());
                }
            }
        }
        start += line.len();
    }
    section
}
