//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ControllerConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change (config file or configmap manifest)
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → ReloadEvent deltas (backend defaults, extraction settings, store)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AnnotationsConfig, ControllerConfig, CustomHeadersConfig, ObservabilityConfig, StoreConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::{ConfigWatcher, ReloadEvent};
