//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::annotations::{FailurePolicy, DEFAULT_ANNOTATION_PREFIX};
use crate::defaults::Backend;

/// Root configuration for the controller.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Annotation naming.
    pub annotations: AnnotationsConfig,

    /// Defaults every backend inherits, including the header allow-list.
    pub backend: Backend,

    /// Behavior of the `custom-headers` annotation.
    pub custom_headers: CustomHeadersConfig,

    /// Where configmaps are read from.
    pub store: StoreConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Annotation configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AnnotationsConfig {
    /// Prefix for every annotation key (e.g., "nginx.ingress.kubernetes.io").
    pub prefix: String,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ANNOTATION_PREFIX.to_string(),
        }
    }
}

/// `custom-headers` configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CustomHeadersConfig {
    /// What happens to an ingress whose headers fail to resolve.
    pub failure_policy: FailurePolicy,
}

/// Configmap store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding one manifest per configmap.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("configmaps"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
