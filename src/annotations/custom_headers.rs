//! The `custom-headers` annotation.
//!
//! The annotation value names a configmap whose entries become response
//! headers for every location of the ingress. Only headers listed in the
//! backend defaults' `allowed_response_headers` may be set.

use crate::annotations::parser::{string_annotation, DEFAULT_ANNOTATION_PREFIX};
use crate::annotations::AnnotationParser;
use crate::error::ResolveError;
use crate::ingress::Annotated;
use crate::resolver::{self, AllowListProvider, Config, StoreFetcher};

/// Annotation suffix.
pub const CUSTOM_HEADERS_ANNOTATION: &str = "custom-headers";

/// Parses the `custom-headers` annotation into a [`Config`].
#[derive(Debug, Clone)]
pub struct CustomHeaders<R> {
    prefix: String,
    resolver: R,
}

impl<R> CustomHeaders<R>
where
    R: StoreFetcher + AllowListProvider,
{
    pub fn new(resolver: R) -> Self {
        Self::with_prefix(resolver, DEFAULT_ANNOTATION_PREFIX)
    }

    pub fn with_prefix(resolver: R, prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            resolver,
        }
    }
}

impl<R> AnnotationParser for CustomHeaders<R>
where
    R: StoreFetcher + AllowListProvider,
{
    type Output = Config;
    type Error = ResolveError;

    fn name(&self) -> &'static str {
        CUSTOM_HEADERS_ANNOTATION
    }

    fn parse(&self, resource: &dyn Annotated) -> Result<Option<Config>, ResolveError> {
        let reference = string_annotation(resource, &self.prefix, CUSTOM_HEADERS_ANNOTATION);
        resolver::resolve(reference.as_deref(), &self.resolver, &self.resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingress::Ingress;
    use crate::resolver::Mock;

    #[test]
    fn test_custom_prefix() {
        let mock = Mock::new()
            .with_allowed_headers(["Content-Type"])
            .with_config_map("hdrs-cm", [("Content-Type", "text/html")]);
        let parser = CustomHeaders::with_prefix(mock, "example.com");

        let mut ing = Ingress::new("default", "foo");
        ing.set_annotation("nginx.ingress.kubernetes.io/custom-headers", "hdrs-cm");
        assert_eq!(parser.parse(&ing).unwrap(), None);

        ing.set_annotation("example.com/custom-headers", "hdrs-cm");
        let config = parser.parse(&ing).unwrap().unwrap();
        assert_eq!(config.get("Content-Type"), Some("text/html"));
    }
}
