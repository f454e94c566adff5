//! End-to-end tests for the CSRF hash element across request boundaries.

use formguard::prelude::*;
use regex::Regex;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const HASH_SALT: &str = "foo-unit-test";

fn element(session: &SharedNamespace) -> HashElement {
    HashElement::builder("foo")
        .session(session.clone())
        .salt(HASH_SALT)
        .build()
        .unwrap()
}

#[test]
fn test_defaults() {
    let element = HashElement::new("foo");
    assert!(!element.salt().is_empty());
    assert!(element.timeout() > 0);
    assert!(element.label().is_none());
    assert!(element.session_name().contains("foo"));
}

#[test]
fn test_hash_element_round_trip() {
    let session = MemoryNamespace::new("csrf").shared();
    let view = HandlebarsView::new().unwrap();

    let mut a = element(&session);
    let html = a.render(&view).unwrap();
    let hash = a.hash().unwrap();

    assert!(Regex::new("^[a-f0-9]{32}$").unwrap().is_match(&hash));
    assert!(Regex::new(r#"(?i)<input[^>]*?type="hidden""#).unwrap().is_match(&html));
    assert!(html.contains(&hash));
    assert_eq!(session.get_string(HASH_SALT), Some(hash.clone()));
    assert_eq!(session.expiration_hops(), Some(1));
    assert_eq!(session.expiration_seconds(), Some(a.timeout()));

    let mut b = HashElement::builder("foo")
        .session(session.clone())
        .build()
        .unwrap();
    b.set_salt(a.salt().to_string());
    assert!(b.is_valid(&hash));

    let identical = b.validator("Identical").unwrap();
    assert_eq!(identical.name(), "Identical");
    assert_eq!(
        b.identical_validator().unwrap().token(),
        Some(hash.as_str())
    );
}

#[test]
fn test_salt_change_regenerates_hash() {
    let session = MemoryNamespace::new("csrf").shared();
    let mut element = element(&session);
    let first = element.hash().unwrap();

    element.set_salt("foobar");
    let second = element.hash().unwrap();

    assert_ne!(first, second);
    assert_eq!(session.get_string("foobar"), Some(second));
    assert_eq!(session.get_string(HASH_SALT), Some(first));
}

#[test]
fn test_session_store_across_requests() {
    let store = Arc::new(MemorySessionStore::default());
    let view = HandlebarsView::new().unwrap();

    let mut form = HashElement::builder("csrf").store(store.clone()).build().unwrap();
    form.render(&view).unwrap();
    let token = form.hash().unwrap();

    store.advance_hop();

    let mut form = HashElement::builder("csrf").store(store.clone()).build().unwrap();
    assert!(form.is_valid(&token));

    store.advance_hop();

    let mut form = HashElement::builder("csrf").store(store).build().unwrap();
    assert!(!form.is_valid(&token));
}

#[test]
fn test_template_directory_override() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("formHidden.hbs"),
        r#"<input type="hidden" name="{{name}}" value="{{value}}" data-csrf />"#,
    )
    .unwrap();

    let view = HandlebarsView::with_config(ViewConfig::default().with_template_dir(dir.path())).unwrap();
    let session = MemoryNamespace::new("csrf").shared();
    let mut element = element(&session);

    let html = element.render(&view).unwrap();
    assert!(html.contains("data-csrf"));
    assert!(html.contains(&element.hash().unwrap()));
}
