//! # formguard CSRF hash element
//!
//! A hidden form element whose value is a per-session token. Rendering the
//! element stores the token in a session namespace; validating a submission
//! compares the posted value with the stored one.
//!
//! ## Quick Start
//!
//! ```rust
//! use formguard_csrf::HashElement;
//! use formguard_session::{MemoryNamespace, SessionNamespace};
//! use formguard_view::HandlebarsView;
//!
//! let session = MemoryNamespace::new("csrf").shared();
//! let view = HandlebarsView::new().unwrap();
//!
//! let mut element = HashElement::builder("csrf")
//!     .session(session.clone())
//!     .salt("contact-form")
//!     .build()
//!     .unwrap();
//!
//! let html = element.render(&view).unwrap();
//! let token = session.get_string("contact-form").unwrap();
//! assert!(html.contains(&token));
//!
//! // The stored token lives for one more request
//! assert_eq!(session.expiration_hops(), Some(1));
//! assert_eq!(session.expiration_seconds(), Some(300));
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use formguard_csrf::{HashConfig, HashElement};
//!
//! let config = HashConfig::new()
//!     .with_salt("checkout")
//!     .with_timeout(900)
//!     .unwrap()
//!     .with_attrib("class", "csrf");
//!
//! let element = HashElement::builder("csrf").config(config).build().unwrap();
//! assert_eq!(element.salt(), "checkout");
//! assert_eq!(element.timeout(), 900);
//! ```

pub mod config;
pub mod element;
pub mod error;
pub mod hash;
pub mod token;

pub use config::{DEFAULT_SALT, DEFAULT_TIMEOUT, HashConfig};
pub use element::{Decorator, ElementCore, FormElement};
pub use error::{CsrfError, Result};
pub use hash::{HashElement, HashElementBuilder};
pub use token::{HASH_LEN, generate_hash};
