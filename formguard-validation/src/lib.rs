//! Validators for formguard form elements
//!
//! Each form element owns a [`ValidatorChain`]: an ordered list of
//! [`Validator`]s identified by name. The CSRF element uses [`Identical`] to
//! compare a submitted token with the one stored in the session.
//!
//! # Examples
//!
//! ```
//! use formguard_validation::{Identical, NotEmpty, ValidatorChain};
//!
//! let mut chain = ValidatorChain::new();
//! chain
//!     .add(NotEmpty, true)
//!     .add(Identical::new(Some("9f86d081884c7d65".to_string())), true);
//!
//! assert!(chain.validate("9f86d081884c7d65", "csrf").is_ok());
//!
//! let errors = chain.validate("forged", "csrf").unwrap_err();
//! assert_eq!(errors.constraints(), vec!["notSame"]);
//!
//! let identical = chain.get_as::<Identical>("Identical").unwrap();
//! assert_eq!(identical.token(), Some("9f86d081884c7d65"));
//! ```

mod errors;
mod rules;
mod traits;
mod validators;

pub use errors::*;
pub use rules::*;
pub use traits::*;
pub use validators::*;
