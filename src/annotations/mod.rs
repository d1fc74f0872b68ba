//! Annotation extraction subsystem.
//!
//! # Data Flow
//! ```text
//! Ingress (metadata.annotations)
//!     → parser.rs (prefixed key lookup)
//!     → custom_headers.rs (store reference → resolver)
//!     → Extractor applies FailurePolicy
//!     → LocationAnnotations handed to the config generator
//! ```
//!
//! # Design Decisions
//! - Each parser declares its own output type; nothing is downcast at runtime
//! - What happens to a resource whose headers fail to resolve is an explicit
//!   operator setting, never an accident of return values
//! - Resolution runs at configuration-build time, never per request

pub mod custom_headers;
pub mod parser;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::ingress::{Annotated, Ingress};
use crate::resolver::{AllowListProvider, Config, StoreFetcher};

pub use custom_headers::{CustomHeaders, CUSTOM_HEADERS_ANNOTATION};
pub use parser::{annotation_with_prefix, string_annotation, DEFAULT_ANNOTATION_PREFIX};

/// A parser for one annotation with a statically known output type.
pub trait AnnotationParser {
    type Output;
    type Error: std::error::Error;

    /// Annotation suffix, used in logs.
    fn name(&self) -> &'static str;

    /// `Ok(None)` means the annotation is absent and the feature is off.
    fn parse(&self, resource: &dyn Annotated) -> Result<Option<Self::Output>, Self::Error>;
}

/// What to do with an ingress whose header overrides fail to resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Serve the ingress without any header overrides.
    NoOverrides,
    /// Drop the ingress from the generated configuration.
    #[default]
    Reject,
}

/// Parsed annotations applied to every location of one ingress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationAnnotations {
    pub custom_headers: Option<Config>,
}

/// Error returned when the failure policy rejects an ingress.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ingress {ingress}: annotation {annotation}: {source}")]
pub struct ExtractError {
    pub ingress: String,
    pub annotation: &'static str,
    #[source]
    pub source: ResolveError,
}

/// Runs every annotation parser for an ingress.
#[derive(Debug, Clone)]
pub struct Extractor<R> {
    custom_headers: CustomHeaders<R>,
    policy: FailurePolicy,
}

impl<R> Extractor<R>
where
    R: StoreFetcher + AllowListProvider,
{
    pub fn new(resolver: R, prefix: impl Into<String>, policy: FailurePolicy) -> Self {
        Self {
            custom_headers: CustomHeaders::with_prefix(resolver, prefix),
            policy,
        }
    }

    pub fn extract(&self, ing: &Ingress) -> Result<LocationAnnotations, ExtractError> {
        let custom_headers = match self.custom_headers.parse(ing) {
            Ok(config) => config,
            Err(source) => match self.policy {
                FailurePolicy::NoOverrides => {
                    tracing::warn!(
                        ingress = %ing.key(),
                        annotation = self.custom_headers.name(),
                        error = %source,
                        "Header overrides not resolved, serving without overrides"
                    );
                    None
                }
                FailurePolicy::Reject => {
                    tracing::error!(
                        ingress = %ing.key(),
                        annotation = self.custom_headers.name(),
                        error = %source,
                        "Header overrides not resolved, rejecting ingress"
                    );
                    return Err(ExtractError {
                        ingress: ing.key(),
                        annotation: self.custom_headers.name(),
                        source,
                    });
                }
            },
        };

        if let Some(config) = &custom_headers {
            tracing::debug!(
                ingress = %ing.key(),
                headers = config.headers().len(),
                "Resolved header overrides"
            );
        }

        Ok(LocationAnnotations { custom_headers })
    }
}
