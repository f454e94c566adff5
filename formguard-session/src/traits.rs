//! Session namespace trait definition.

use crate::error::SessionResult;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A named slice of a user session.
///
/// Values are stored as JSON. Expiration is tracked for the namespace as a
/// whole: a hop budget consumed at request boundaries, and a wall-clock
/// time-to-live. Implementations use interior mutability so one namespace
/// can be shared between several form elements through a [`SharedNamespace`].
///
/// # Examples
///
/// ```
/// use formguard_session::{MemoryNamespace, SessionNamespace, SharedNamespace};
/// use std::sync::Arc;
///
/// let ns: SharedNamespace = Arc::new(MemoryNamespace::new("csrf"));
/// ns.set_value("token", "abc123").unwrap();
/// assert_eq!(ns.get_string("token").as_deref(), Some("abc123"));
///
/// ns.set_expiration_hops(1).unwrap();
/// assert_eq!(ns.expiration_hops(), Some(1));
/// ```
pub trait SessionNamespace: Send + Sync + fmt::Debug {
    /// Namespace name.
    fn name(&self) -> &str;

    /// Value stored under `key`, `None` when unset or expired.
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> SessionResult<()>;

    fn contains(&self, key: &str) -> bool;

    /// Remove `key`, returning the previous value.
    fn remove(&self, key: &str) -> Option<Value>;

    fn keys(&self) -> Vec<String>;

    /// Drop all values. Expiration settings are kept.
    fn clear(&self);

    /// Expire the namespace after `hops` further request boundaries.
    fn set_expiration_hops(&self, hops: u32) -> SessionResult<()>;

    /// Expire the namespace `seconds` from now.
    fn set_expiration_seconds(&self, seconds: u64) -> SessionResult<()>;

    /// Last hop budget passed to `set_expiration_hops`.
    fn expiration_hops(&self) -> Option<u32>;

    /// Last TTL passed to `set_expiration_seconds`.
    fn expiration_seconds(&self) -> Option<u64>;

    /// Mark a request boundary, consuming one hop.
    fn advance_hop(&self);
}

/// A namespace shared between element instances.
pub type SharedNamespace = Arc<dyn SessionNamespace>;

impl dyn SessionNamespace {
    /// String value under `key`; non-string values read as `None`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Deserialize the value under `key`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| serde_json::from_value(v).ok())
    }

    /// Serialize and store `value` under `key`.
    pub fn set_value<T: Serialize>(&self, key: &str, value: T) -> SessionResult<()> {
        let json = serde_json::to_value(value)?;
        self.set(key, json)
    }
}

/// Generate a new unique session ID.
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
