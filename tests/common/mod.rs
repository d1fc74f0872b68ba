//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use ingress_headers::annotations::{
    annotation_with_prefix, CUSTOM_HEADERS_ANNOTATION, DEFAULT_ANNOTATION_PREFIX,
};
use ingress_headers::ingress::Ingress;
use ingress_headers::resolver::Mock;

/// An ingress with no annotations.
pub fn build_ingress() -> Ingress {
    Ingress::new("default", "foo")
}

/// An ingress whose `custom-headers` annotation names `config_map`.
pub fn ingress_with_headers(config_map: &str) -> Ingress {
    let mut ing = build_ingress();
    ing.set_annotation(
        annotation_with_prefix(DEFAULT_ANNOTATION_PREFIX, CUSTOM_HEADERS_ANNOTATION),
        config_map,
    );
    ing
}

/// A mock backend allowing `Content-Type` and `Access-Control-Max-Age`.
pub fn mock_backend() -> Mock {
    Mock::new().with_allowed_headers(["Content-Type", "Access-Control-Max-Age"])
}

/// A fresh scratch directory unique to this process and `tag`.
pub fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "ingress-headers-it-{}-{}",
        tag,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}
