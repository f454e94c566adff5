// Validation traits

use crate::ValidationError;
use std::any::Any;
use std::fmt;

/// A single check applied to a submitted form value.
///
/// Validators are looked up by [`name`](Validator::name), so an element can
/// hold at most one validator per name. `as_any` lets callers recover the
/// concrete type to read its configuration, e.g. the token of an
/// [`Identical`](crate::Identical) validator.
pub trait Validator: Send + Sync + fmt::Debug {
    /// Validate a value submitted for `field`
    fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError>;

    /// Symbolic validator name
    fn name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}
