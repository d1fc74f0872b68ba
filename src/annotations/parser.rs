//! Annotation key naming and lookup.
//!
//! # Design Decisions
//! - Every annotation lives under one operator-configurable prefix
//! - Lookup is pure: no content validation, no side effects
//! - A blank value is the same as no value

use crate::ingress::Annotated;

/// Prefix used when none is configured.
pub const DEFAULT_ANNOTATION_PREFIX: &str = "nginx.ingress.kubernetes.io";

/// Full annotation key for `suffix`, e.g. `nginx.ingress.kubernetes.io/custom-headers`.
pub fn annotation_with_prefix(prefix: &str, suffix: &str) -> String {
    format!("{}/{}", prefix, suffix)
}

/// Read a string annotation. Returns `None` when missing or blank.
pub fn string_annotation<R>(resource: &R, prefix: &str, suffix: &str) -> Option<String>
where
    R: Annotated + ?Sized,
{
    resource
        .annotation(&annotation_with_prefix(prefix, suffix))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingress::Ingress;

    #[test]
    fn test_annotation_with_prefix() {
        assert_eq!(
            annotation_with_prefix(DEFAULT_ANNOTATION_PREFIX, "custom-headers"),
            "nginx.ingress.kubernetes.io/custom-headers"
        );
    }

    #[test]
    fn test_string_annotation() {
        let mut ing = Ingress::new("default", "foo");
        assert_eq!(string_annotation(&ing, "example.com", "custom-headers"), None);

        ing.set_annotation("example.com/custom-headers", "  hdrs-cm ");
        assert_eq!(
            string_annotation(&ing, "example.com", "custom-headers").as_deref(),
            Some("hdrs-cm")
        );
        // Other prefixes are not read
        assert_eq!(string_annotation(&ing, DEFAULT_ANNOTATION_PREFIX, "custom-headers"), None);

        ing.set_annotation("example.com/custom-headers", "   ");
        assert_eq!(string_annotation(&ing, "example.com", "custom-headers"), None);
    }
}
