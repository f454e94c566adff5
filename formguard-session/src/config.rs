//! Session namespace configuration.

use crate::error::{SessionError, SessionResult};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Configuration shared by the namespaces a store hands out.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Prefix joined to namespace names when building storage keys
    pub namespace_prefix: String,
    /// Time-to-live applied to new namespaces (none = live until cleared)
    #[serde(with = "opt_secs")]
    pub default_ttl: Option<Duration>,
    /// Upper bound accepted by `set_expiration_seconds`
    #[serde(with = "secs")]
    pub max_ttl: Duration,
    /// Hop budget applied to new namespaces
    pub default_hops: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace_prefix: "formguard".to_string(),
            default_ttl: None,
            max_ttl: Duration::from_secs(86400 * 7), // 7 days
            default_hops: None,
        }
    }
}

impl SessionConfig {
    /// Read `FORMGUARD_SESSION_PREFIX`, `FORMGUARD_SESSION_TTL`,
    /// `FORMGUARD_SESSION_MAX_TTL` and `FORMGUARD_SESSION_HOPS`, falling back
    /// to the defaults for unset variables.
    pub fn from_env() -> SessionResult<Self> {
        let mut config = Self::default();

        if let Ok(prefix) = env::var("FORMGUARD_SESSION_PREFIX") {
            config = config.with_namespace_prefix(&prefix)?;
        }
        if let Some(ttl) = env_secs("FORMGUARD_SESSION_TTL")? {
            config.default_ttl = Some(ttl);
        }
        if let Some(max) = env_secs("FORMGUARD_SESSION_MAX_TTL")? {
            config.max_ttl = max;
        }
        if let Ok(hops) = env::var("FORMGUARD_SESSION_HOPS") {
            let hops = hops.trim().parse::<u32>().map_err(|e| {
                SessionError::Config(format!("FORMGUARD_SESSION_HOPS: {}", e))
            })?;
            config.default_hops = Some(hops);
        }

        config.check()?;
        Ok(config)
    }

    /// Set the namespace prefix.
    ///
    /// Rejects empty prefixes and prefixes containing `:`, the key separator.
    pub fn with_namespace_prefix(mut self, prefix: &str) -> SessionResult<Self> {
        if prefix.is_empty() || prefix.contains(':') {
            return Err(SessionError::InvalidNamespace(prefix.to_string()));
        }
        self.namespace_prefix = prefix.to_string();
        Ok(self)
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    pub fn with_max_ttl(mut self, ttl: Duration) -> Self {
        self.max_ttl = ttl;
        self
    }

    pub fn with_default_hops(mut self, hops: u32) -> Self {
        self.default_hops = Some(hops);
        self
    }

    /// Storage key for a namespace.
    pub fn namespace_key(&self, name: &str) -> String {
        format!("{}:{}", self.namespace_prefix, name)
    }

    /// Ensure a TTL request falls within `max_ttl`.
    pub fn check_ttl(&self, seconds: u64) -> SessionResult<()> {
        if seconds == 0 {
            return Err(SessionError::Config(
                "expiration seconds must be positive".to_string(),
            ));
        }
        if seconds > self.max_ttl.as_secs() {
            return Err(SessionError::Config(format!(
                "expiration of {}s exceeds the maximum of {}s",
                seconds,
                self.max_ttl.as_secs()
            )));
        }
        Ok(())
    }

    fn check(&self) -> SessionResult<()> {
        if let Some(ttl) = self.default_ttl {
            self.check_ttl(ttl.as_secs())?;
        }
        Ok(())
    }
}

fn env_secs(key: &str) -> SessionResult<Option<Duration>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|s| Some(Duration::from_secs(s)))
            .map_err(|e| SessionError::Config(format!("{}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

mod opt_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_secs))
    }
}
