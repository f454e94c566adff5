use crate::error::{CsrfError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;

/// Salt used when none (or an empty one) is configured.
pub const DEFAULT_SALT: &str = "salt";

/// Default session entry time-to-live in seconds.
pub const DEFAULT_TIMEOUT: u64 = 300;

/// Prefix of namespaces created for elements without an explicit session.
pub const SESSION_NAME_PREFIX: &str = "formguard_csrf_hash";

/// Hash element options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Hash seed and session key
    pub salt: String,

    /// Session entry time-to-live in seconds
    pub timeout: u64,

    /// Extra attributes rendered on the hidden input
    pub attribs: BTreeMap<String, String>,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            attribs: BTreeMap::new(),
        }
    }
}

impl HashConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object, e.g. `{"salt": "...", "timeout": 600}`.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value).map_err(|e| CsrfError::InvalidOption {
            option: "options".to_string(),
            reason: e.to_string(),
        })?;
        config.normalized()
    }

    /// Read `FORMGUARD_CSRF_SALT` and `FORMGUARD_CSRF_TIMEOUT`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(salt) = env::var("FORMGUARD_CSRF_SALT") {
            config = config.with_salt(salt);
        }
        if let Ok(raw) = env::var("FORMGUARD_CSRF_TIMEOUT") {
            let timeout = raw.trim().parse::<u64>().map_err(|e| CsrfError::InvalidOption {
                option: "FORMGUARD_CSRF_TIMEOUT".to_string(),
                reason: e.to_string(),
            })?;
            config = config.with_timeout(timeout)?;
        }

        Ok(config)
    }

    /// Set the salt; an empty salt falls back to [`DEFAULT_SALT`].
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = normalize_salt(salt.into());
        self
    }

    /// Set the timeout; zero is rejected.
    pub fn with_timeout(mut self, seconds: u64) -> Result<Self> {
        self.timeout = check_timeout(seconds)?;
        Ok(self)
    }

    pub fn with_attrib(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attribs.insert(key.into(), value.into());
        self
    }

    fn normalized(mut self) -> Result<Self> {
        self.salt = normalize_salt(std::mem::take(&mut self.salt));
        check_timeout(self.timeout)?;
        Ok(self)
    }
}

pub(crate) fn normalize_salt(salt: String) -> String {
    if salt.is_empty() {
        DEFAULT_SALT.to_string()
    } else {
        salt
    }
}

pub(crate) fn check_timeout(seconds: u64) -> Result<u64> {
    if seconds == 0 {
        return Err(CsrfError::InvalidOption {
            option: "timeout".to_string(),
            reason: "must be a positive number of seconds".to_string(),
        });
    }
    Ok(seconds)
}
