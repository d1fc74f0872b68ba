//! Annotation-driven response-header overrides for an ingress controller.

pub mod annotations;
pub mod config;
pub mod defaults;
pub mod error;
pub mod ingress;
pub mod observability;
pub mod resolver;
pub mod store;

pub use annotations::{Extractor, FailurePolicy, LocationAnnotations};
pub use config::ControllerConfig;
pub use error::{ErrorKind, ResolveError, StoreError};
pub use resolver::{resolve, AllowList, Config, StoreReference};
