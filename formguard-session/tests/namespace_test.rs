//! Integration tests for formguard-session

use formguard_session::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct WizardStep {
    step: u32,
    email: String,
}

#[test]
fn test_shared_namespace_is_one_store() {
    let first: SharedNamespace = Arc::new(MemoryNamespace::new("csrf"));
    let second = Arc::clone(&first);

    first.set_value("foo-unit-test", "abc").unwrap();
    assert_eq!(second.get_string("foo-unit-test").as_deref(), Some("abc"));

    second.remove("foo-unit-test");
    assert!(!first.contains("foo-unit-test"));
}

#[test]
fn test_typed_values() {
    let ns = MemoryNamespace::new("wizard").shared();
    let step = WizardStep {
        step: 2,
        email: "a@example.com".to_string(),
    };

    ns.set_value("state", &step).unwrap();
    assert_eq!(ns.get_as::<WizardStep>("state"), Some(step));
    assert_eq!(ns.get_string("state"), None);
}

#[test]
fn test_expiration_calls_are_namespace_wide() {
    let ns = MemoryNamespace::new("csrf").shared();
    ns.set_value("a", 1).unwrap();
    ns.set_value("b", 2).unwrap();

    ns.set_expiration_hops(1).unwrap();
    ns.set_expiration_seconds(300).unwrap();
    assert_eq!(ns.expiration_hops(), Some(1));
    assert_eq!(ns.expiration_seconds(), Some(300));

    ns.advance_hop();
    ns.advance_hop();
    assert!(ns.keys().is_empty());
}

#[test]
fn test_store_with_config() {
    let config = SessionConfig::default()
        .with_namespace_prefix("app")
        .unwrap()
        .with_default_ttl(std::time::Duration::from_secs(120));
    let store = MemorySessionStore::new(config);

    let ns = store.namespace("csrf").unwrap();
    assert_eq!(ns.expiration_seconds(), Some(120));
    assert_eq!(ns.name(), "csrf");
}

#[test]
fn test_session_ids_are_unique() {
    assert_ne!(generate_session_id(), generate_session_id());
}
