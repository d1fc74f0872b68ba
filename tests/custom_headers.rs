//! Resolution of the `custom-headers` annotation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use ingress_headers::annotations::{AnnotationParser, CustomHeaders};
use ingress_headers::error::{ErrorKind, ResolveError};
use ingress_headers::resolver::{self, AllowList, RawHeaderSet};
use ingress_headers::StoreError;

mod common;

fn expected(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_annotation_absent_is_disabled() {
    let ing = common::build_ingress();
    let parser = CustomHeaders::new(common::mock_backend());

    let result = parser.parse(&ing).unwrap();
    assert_eq!(result, None);
}

#[test]
fn test_missing_config_map() {
    let ing = common::ingress_with_headers("hdrs-cm");
    let parser = CustomHeaders::new(common::mock_backend());

    let err = parser.parse(&ing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferenceNotFound);
    assert_eq!(
        err,
        ResolveError::ReferenceNotFound {
            name: "hdrs-cm".into()
        }
    );
}

#[test]
fn test_unreadable_config_map() {
    let ing = common::ingress_with_headers("hdrs-cm");
    let parser = CustomHeaders::new(common::mock_backend().with_unreadable("hdrs-cm"));

    let err = parser.parse(&ing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferenceUnreadable);
}

#[test]
fn test_allowed_headers_resolve() {
    let ing = common::ingress_with_headers("hdrs-cm");
    let mock = common::mock_backend().with_config_map(
        "hdrs-cm",
        [
            ("Content-Type", "application/json"),
            ("Access-Control-Max-Age", "600"),
        ],
    );

    let config = CustomHeaders::new(mock).parse(&ing).unwrap().unwrap();
    assert_eq!(
        config.headers(),
        &expected(&[
            ("Content-Type", "application/json"),
            ("Access-Control-Max-Age", "600"),
        ])
    );
}

#[test]
fn test_disallowed_header_rejects_everything() {
    let ing = common::ingress_with_headers("hdrs-cm");
    let mock = common::mock_backend().with_config_map(
        "hdrs-cm",
        [
            ("Content-Type", "application/json"),
            ("Access-Control-Max-Age", "600"),
            ("X-Forbidden", "1"),
        ],
    );

    let err = CustomHeaders::new(mock).parse(&ing).unwrap_err();
    match err {
        ResolveError::HeaderNotAllowed { names, .. } => assert_eq!(names, ["X-Forbidden"]),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_every_violation_is_reported() {
    let ing = common::ingress_with_headers("hdrs-cm");
    let mock = common::mock_backend().with_config_map(
        "hdrs-cm",
        [("X-Two", "2"), ("Content-Type", "text/plain"), ("X-One", "1")],
    );

    let err = CustomHeaders::new(mock).parse(&ing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HeaderNotAllowed);
    let message = err.to_string();
    assert!(message.contains("X-One, X-Two"), "{message}");
    assert!(message.contains("Content-Type, Access-Control-Max-Age"), "{message}");
}

#[test]
fn test_empty_config_map_overrides_nothing() {
    let ing = common::ingress_with_headers("hdrs-cm");
    let mock = common::mock_backend().with_config_map("hdrs-cm", Vec::<(String, String)>::new());

    let config = CustomHeaders::new(mock).parse(&ing).unwrap().unwrap();
    assert!(config.is_empty());
}

#[test]
fn test_resolution_is_idempotent() {
    let ing = common::ingress_with_headers("hdrs-cm");
    let mock = common::mock_backend().with_config_map(
        "hdrs-cm",
        [("Access-Control-Max-Age", "600"), ("Content-Type", "text/css")],
    );
    let parser = CustomHeaders::new(mock);

    let first = parser.parse(&ing).unwrap();
    let second = parser.parse(&ing).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_config_is_detached_from_store() {
    let mut data = RawHeaderSet::new();
    data.insert("Content-Type".into(), "text/plain".into());
    let store = std::sync::Mutex::new(data);

    let fetch = |_: &str| -> Result<RawHeaderSet, StoreError> { Ok(store.lock().unwrap().clone()) };
    let allow = || AllowList::new(["Content-Type"]);

    let config = resolver::resolve(Some("hdrs-cm"), &fetch, &allow).unwrap().unwrap();
    store
        .lock()
        .unwrap()
        .insert("Content-Type".into(), "text/html".into());

    assert_eq!(config.get("Content-Type"), Some("text/plain"));
}

#[test]
fn test_concurrent_resolution() {
    let mock = common::mock_backend().with_config_map(
        "hdrs-cm",
        [("Content-Type", "application/json")],
    );
    let parser = Arc::new(CustomHeaders::new(mock));
    let ing = Arc::new(common::ingress_with_headers("hdrs-cm"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let parser = Arc::clone(&parser);
            let ing = Arc::clone(&ing);
            thread::spawn(move || parser.parse(ing.as_ref()).unwrap().unwrap())
        })
        .collect();

    for handle in handles {
        let config = handle.join().unwrap();
        assert_eq!(config.get("Content-Type"), Some("application/json"));
    }
}
