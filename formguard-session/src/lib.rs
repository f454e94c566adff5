//! Session namespaces for formguard.
//!
//! A namespace is a named key/value slice of one user's session. Form
//! elements keep short-lived values in it (CSRF tokens, wizard state) and
//! give the namespace an expiration: a number of request *hops*, a wall-clock
//! TTL, or both.
//!
//! # Examples
//!
//! ```
//! use formguard_session::*;
//!
//! let store = MemorySessionStore::default();
//! let ns = store.namespace("csrf").unwrap();
//!
//! ns.set_value("token", "0123abcd").unwrap();
//! ns.set_expiration_hops(1).unwrap();
//! ns.set_expiration_seconds(300).unwrap();
//!
//! // Next request: still readable
//! store.advance_hop();
//! assert_eq!(ns.get_string("token").as_deref(), Some("0123abcd"));
//!
//! // The one after: gone
//! store.advance_hop();
//! assert!(ns.get("token").is_none());
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod traits;

pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use memory::{MemoryNamespace, MemorySessionStore};
pub use traits::{SessionNamespace, SharedNamespace, generate_session_id};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::SessionConfig;
    pub use crate::error::{SessionError, SessionResult};
    pub use crate::memory::{MemoryNamespace, MemorySessionStore};
    pub use crate::traits::{SessionNamespace, SharedNamespace, generate_session_id};
}
