//! In-memory session namespaces and the per-user store that owns them.

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::traits::{SessionNamespace, SharedNamespace, generate_session_id};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use formguard_log::debug;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct NamespaceState {
    data: HashMap<String, Value>,
    hops: Option<u32>,
    hops_remaining: Option<u32>,
    ttl_seconds: Option<u64>,
    expires_at: Option<DateTime<Utc>>,
}

impl NamespaceState {
    fn reset(&mut self) {
        self.data.clear();
        self.hops = None;
        self.hops_remaining = None;
        self.ttl_seconds = None;
        self.expires_at = None;
    }

    fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(deadline) if now >= deadline)
    }
}

/// Session namespace held in process memory.
#[derive(Debug)]
pub struct MemoryNamespace {
    name: String,
    config: SessionConfig,
    state: RwLock<NamespaceState>,
}

impl MemoryNamespace {
    /// Create an empty namespace with the default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: SessionConfig::default(),
            state: RwLock::new(NamespaceState::default()),
        }
    }

    /// Create a namespace and apply the configured default TTL and hops.
    pub fn with_config(name: impl Into<String>, config: SessionConfig) -> SessionResult<Self> {
        let ns = Self {
            name: name.into(),
            config,
            state: RwLock::new(NamespaceState::default()),
        };
        if let Some(ttl) = ns.config.default_ttl {
            ns.set_expiration_seconds(ttl.as_secs())?;
        }
        if let Some(hops) = ns.config.default_hops {
            ns.set_expiration_hops(hops)?;
        }
        Ok(ns)
    }

    /// Wrap in an `Arc` for sharing.
    pub fn shared(self) -> SharedNamespace {
        Arc::new(self)
    }

    /// Storage key of this namespace under the configured prefix.
    pub fn key(&self) -> String {
        self.config.namespace_key(&self.name)
    }

    /// Hops left before the namespace is cleared.
    pub fn hops_remaining(&self) -> Option<u32> {
        self.state.read().hops_remaining
    }

    /// Deadline set by the last `set_expiration_seconds` call.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.state.read().expires_at
    }

    /// Whether the TTL deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.state.read().is_past_deadline(Utc::now())
    }

    // Apply the time-based deadline before any access.
    fn live(&self) -> parking_lot::RwLockWriteGuard<'_, NamespaceState> {
        let mut state = self.state.write();
        if state.is_past_deadline(Utc::now()) {
            debug!(target: "formguard::session", "namespace {} expired by time", self.name);
            state.reset();
        }
        state
    }
}

impl SessionNamespace for MemoryNamespace {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.live().data.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> SessionResult<()> {
        self.live().data.insert(key.to_string(), value);
        Ok(())
    }

    fn contains(&self, key: &str) -> bool {
        self.live().data.contains_key(key)
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.live().data.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.live().data.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn clear(&self) {
        self.state.write().data.clear();
    }

    fn set_expiration_hops(&self, hops: u32) -> SessionResult<()> {
        if hops == 0 {
            return Err(SessionError::Config(
                "expiration hops must be positive".to_string(),
            ));
        }
        let mut state = self.live();
        state.hops = Some(hops);
        state.hops_remaining = Some(hops);
        Ok(())
    }

    fn set_expiration_seconds(&self, seconds: u64) -> SessionResult<()> {
        self.config.check_ttl(seconds)?;
        let deadline = i64::try_from(seconds)
            .ok()
            .and_then(ChronoDuration::try_seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| SessionError::Config(format!("expiration of {}s is too large", seconds)))?;
        let mut state = self.live();
        state.ttl_seconds = Some(seconds);
        state.expires_at = Some(deadline);
        Ok(())
    }

    fn expiration_hops(&self) -> Option<u32> {
        self.state.read().hops
    }

    fn expiration_seconds(&self) -> Option<u64> {
        self.state.read().ttl_seconds
    }

    fn advance_hop(&self) {
        let mut state = self.live();
        let remaining = state.hops_remaining;
        match remaining {
            Some(0) => {
                debug!(target: "formguard::session", "namespace {} expired by hops", self.name);
                state.reset();
            }
            Some(n) => state.hops_remaining = Some(n - 1),
            None => {}
        }
    }
}

/// All namespaces belonging to one user session.
#[derive(Debug)]
pub struct MemorySessionStore {
    id: String,
    config: SessionConfig,
    namespaces: RwLock<HashMap<String, Arc<MemoryNamespace>>>,
}

impl MemorySessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: generate_session_id(),
            config,
            namespaces: RwLock::new(HashMap::new()),
        }
    }

    /// Session identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Namespace `name`, created on first use.
    pub fn namespace(&self, name: &str) -> SessionResult<SharedNamespace> {
        if let Some(ns) = self.namespaces.read().get(name) {
            let shared: SharedNamespace = ns.clone();
            return Ok(shared);
        }

        let mut namespaces = self.namespaces.write();
        let ns = match namespaces.get(name) {
            Some(ns) => ns.clone(),
            None => {
                let ns = Arc::new(MemoryNamespace::with_config(name, self.config.clone())?);
                namespaces.insert(name.to_string(), ns.clone());
                ns
            }
        };
        let shared: SharedNamespace = ns;
        Ok(shared)
    }

    pub fn has_namespace(&self, name: &str) -> bool {
        self.namespaces.read().contains_key(name)
    }

    pub fn remove_namespace(&self, name: &str) -> bool {
        self.namespaces.write().remove(name).is_some()
    }

    pub fn namespace_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.namespaces.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Mark a request boundary for every namespace.
    pub fn advance_hop(&self) {
        for ns in self.namespaces.read().values() {
            ns.advance_hop();
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_remove() {
        let ns = MemoryNamespace::new("test");
        assert!(ns.get("missing").is_none());

        ns.set("hash", json!("abc")).unwrap();
        assert!(ns.contains("hash"));
        assert_eq!(ns.get("hash"), Some(json!("abc")));

        assert_eq!(ns.remove("hash"), Some(json!("abc")));
        assert!(!ns.contains("hash"));
    }

    #[test]
    fn test_keys_sorted() {
        let ns = MemoryNamespace::new("test");
        ns.set("b", json!(1)).unwrap();
        ns.set("a", json!(2)).unwrap();
        assert_eq!(ns.keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_expiration_metadata_recorded() {
        let ns = MemoryNamespace::new("test");
        assert_eq!(ns.expiration_hops(), None);
        assert_eq!(ns.expiration_seconds(), None);

        ns.set_expiration_hops(1).unwrap();
        ns.set_expiration_seconds(300).unwrap();

        assert_eq!(ns.expiration_hops(), Some(1));
        assert_eq!(ns.expiration_seconds(), Some(300));
        assert!(ns.expires_at().is_some());
        assert!(!ns.is_expired());
    }

    #[test]
    fn test_zero_hops_rejected() {
        let ns = MemoryNamespace::new("test");
        assert!(ns.set_expiration_hops(0).is_err());
    }

    #[test]
    fn test_ttl_above_max_rejected() {
        let config = SessionConfig::default().with_max_ttl(std::time::Duration::from_secs(10));
        let ns = MemoryNamespace::with_config("test", config).unwrap();
        assert!(ns.set_expiration_seconds(11).is_err());
        assert!(ns.set_expiration_seconds(10).is_ok());
    }

    #[test]
    fn test_unrepresentable_deadline_rejected() {
        let config = SessionConfig::default().with_max_ttl(std::time::Duration::from_secs(u64::MAX));
        let ns = MemoryNamespace::with_config("test", config).unwrap();

        assert!(ns.set_expiration_seconds(10_000_000_000_000).is_err());
        assert!(ns.set_expiration_seconds(u64::MAX).is_err());
        assert_eq!(ns.expiration_seconds(), None);
        assert!(ns.expires_at().is_none());

        assert!(ns.set_expiration_seconds(3600).is_ok());
    }

    #[test]
    fn test_hops_expire_data() {
        let ns = MemoryNamespace::new("test");
        ns.set("hash", json!("abc")).unwrap();
        ns.set_expiration_hops(1).unwrap();

        // The next request still sees the value
        ns.advance_hop();
        assert_eq!(ns.hops_remaining(), Some(0));
        assert!(ns.contains("hash"));

        // The one after does not
        ns.advance_hop();
        assert!(!ns.contains("hash"));
        assert_eq!(ns.expiration_hops(), None);
    }

    #[test]
    fn test_elapsed_deadline_clears_data() {
        let ns = MemoryNamespace::new("test");
        ns.set("hash", json!("abc")).unwrap();
        ns.set_expiration_seconds(60).unwrap();
        ns.state.write().expires_at = Some(Utc::now() - ChronoDuration::seconds(1));

        assert!(ns.is_expired());
        assert!(ns.get("hash").is_none());
        assert_eq!(ns.expiration_seconds(), None);
    }

    #[test]
    fn test_without_hops_advance_is_noop() {
        let ns = MemoryNamespace::new("test");
        ns.set("hash", json!("abc")).unwrap();
        ns.advance_hop();
        ns.advance_hop();
        assert!(ns.contains("hash"));
    }

    #[test]
    fn test_clear_keeps_expiration() {
        let ns = MemoryNamespace::new("test");
        ns.set("hash", json!("abc")).unwrap();
        ns.set_expiration_hops(3).unwrap();
        ns.clear();
        assert!(ns.keys().is_empty());
        assert_eq!(ns.expiration_hops(), Some(3));
    }

    #[test]
    fn test_store_shares_namespaces() {
        let store = MemorySessionStore::default();
        let a = store.namespace("csrf").unwrap();
        let b = store.namespace("csrf").unwrap();

        a.set("hash", json!("abc")).unwrap();
        assert_eq!(b.get("hash"), Some(json!("abc")));
        assert_eq!(store.namespace_names(), vec!["csrf".to_string()]);
        assert!(!store.id().is_empty());
    }

    #[test]
    fn test_store_applies_default_hops() {
        let store = MemorySessionStore::new(SessionConfig::default().with_default_hops(1));
        let ns = store.namespace("csrf").unwrap();
        ns.set("hash", json!("abc")).unwrap();

        store.advance_hop();
        assert!(ns.contains("hash"));
        store.advance_hop();
        assert!(!ns.contains("hash"));
    }

    #[test]
    fn test_store_remove_namespace() {
        let store = MemorySessionStore::default();
        store.namespace("csrf").unwrap();
        assert!(store.has_namespace("csrf"));
        assert!(store.remove_namespace("csrf"));
        assert!(!store.has_namespace("csrf"));
    }

    #[test]
    fn test_key_uses_prefix() {
        let ns = MemoryNamespace::new("csrf");
        assert_eq!(ns.key(), "formguard:csrf");
    }
}
