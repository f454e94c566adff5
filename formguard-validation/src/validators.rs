// Built-in validators

use crate::{ValidationError, Validator};
use std::any::Any;
use std::fmt;
use subtle::ConstantTimeEq;

/// Validates that a string is not empty or whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl NotEmpty {
    pub const NAME: &'static str = "NotEmpty";
}

impl Validator for NotEmpty {
    fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(
                ValidationError::new(field, "Value is required and can't be empty")
                    .with_constraint("isEmpty"),
            )
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Validates that a value matches a reference token exactly.
///
/// The comparison runs in constant time for equal-length inputs. A validator
/// without a token rejects every value.
#[derive(Clone, Default)]
pub struct Identical {
    token: Option<String>,
}

impl Identical {
    pub const NAME: &'static str = "Identical";

    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Reference value, `None` when nothing was provided to match against
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }
}

// Keep the token out of debug output.
impl fmt::Debug for Identical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identical")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Validator for Identical {
    fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        let Some(token) = self.token.as_deref() else {
            return Err(
                ValidationError::new(field, "No token was provided to match against")
                    .with_constraint("missingToken"),
            );
        };

        if bool::from(token.as_bytes().ct_eq(value.as_bytes())) {
            Ok(())
        } else {
            Err(
                ValidationError::new(field, "The two given tokens do not match")
                    .with_constraint("notSame"),
            )
        }
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_empty() {
        assert!(NotEmpty.validate("abc", "csrf").is_ok());
        let err = NotEmpty.validate("  ", "csrf").unwrap_err();
        assert_eq!(err.constraint, "isEmpty");
    }

    #[test]
    fn test_identical_match() {
        let v = Identical::new(Some("abc".to_string()));
        assert!(v.validate("abc", "csrf").is_ok());
    }

    #[test]
    fn test_identical_mismatch() {
        let v = Identical::new(Some("abc".to_string()));
        assert_eq!(v.validate("abd", "csrf").unwrap_err().constraint, "notSame");
        assert_eq!(v.validate("abcd", "csrf").unwrap_err().constraint, "notSame");
        assert_eq!(v.validate("", "csrf").unwrap_err().constraint, "notSame");
    }

    #[test]
    fn test_identical_without_token() {
        let v = Identical::new(None);
        let err = v.validate("abc", "csrf").unwrap_err();
        assert_eq!(err.constraint, "missingToken");
        assert!(v.token().is_none());
    }

    #[test]
    fn test_identical_debug_redacts_token() {
        let v = Identical::new(Some("secret-token".to_string()));
        let out = format!("{:?}", v);
        assert!(!out.contains("secret-token"));
        assert!(out.contains("redacted"));
    }
}
