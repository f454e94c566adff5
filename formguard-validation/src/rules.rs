// Ordered validator chains

use crate::{ValidationError, ValidationErrors, Validator};

#[derive(Debug)]
struct ChainEntry {
    validator: Box<dyn Validator>,
    break_on_failure: bool,
}

/// Ordered list of validators attached to one form field.
///
/// Names are unique: adding a validator whose name is already present
/// replaces the existing one in place. A validator added with
/// `break_on_failure` stops the chain when it fails.
#[derive(Debug, Default)]
pub struct ValidatorChain {
    entries: Vec<ChainEntry>,
}

impl ValidatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a validator.
    pub fn add(&mut self, validator: impl Validator + 'static, break_on_failure: bool) -> &mut Self {
        self.add_boxed(Box::new(validator), break_on_failure)
    }

    pub fn add_boxed(&mut self, validator: Box<dyn Validator>, break_on_failure: bool) -> &mut Self {
        let entry = ChainEntry {
            validator,
            break_on_failure,
        };
        let name = entry.validator.name();
        match self.entries.iter_mut().find(|e| e.validator.name() == name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn Validator> {
        self.entries
            .iter()
            .find(|e| e.validator.name() == name)
            .map(|e| e.validator.as_ref())
    }

    /// Validator `name` downcast to its concrete type.
    pub fn get_as<T: 'static>(&self, name: &str) -> Option<&T> {
        self.get(name)?.as_any().downcast_ref::<T>()
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.validator.name() != name);
        self.entries.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.validator.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Run the chain against `value`.
    pub fn validate(&self, value: &str, field: &str) -> Result<(), ValidationErrors> {
        let mut errors: Vec<ValidationError> = Vec::new();

        for entry in &self.entries {
            if let Err(error) = entry.validator.validate(value, field) {
                errors.push(error);
                if entry.break_on_failure {
                    break;
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::*;

    #[derive(Debug)]
    struct AlwaysFails(&'static str);

    impl Validator for AlwaysFails {
        fn validate(&self, _value: &str, field: &str) -> Result<(), ValidationError> {
            Err(ValidationError::new(field, "failed").with_constraint(self.0))
        }

        fn name(&self) -> &'static str {
            self.0
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn always_fails(name: &'static str) -> AlwaysFails {
        AlwaysFails(name)
    }

    #[test]
    fn test_chain_passes() {
        let mut chain = ValidatorChain::new();
        chain
            .add(NotEmpty, true)
            .add(Identical::new(Some("abc".into())), true);
        assert!(chain.validate("abc", "csrf").is_ok());
        assert_eq!(chain.names(), vec!["NotEmpty", "Identical"]);
    }

    #[test]
    fn test_break_on_failure_stops_chain() {
        let mut chain = ValidatorChain::new();
        chain.add(always_fails("first"), true).add(always_fails("second"), false);
        let errors = chain.validate("x", "f").unwrap_err();
        assert_eq!(errors.constraints(), vec!["first"]);
    }

    #[test]
    fn test_without_break_collects_all() {
        let mut chain = ValidatorChain::new();
        chain.add(always_fails("first"), false).add(always_fails("second"), false);
        let errors = chain.validate("x", "f").unwrap_err();
        assert_eq!(errors.constraints(), vec!["first", "second"]);
    }

    #[test]
    fn test_same_name_replaces_in_place() {
        let mut chain = ValidatorChain::new();
        chain
            .add(Identical::new(Some("old".into())), true)
            .add(NotEmpty, true)
            .add(Identical::new(Some("new".into())), true);

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.names(), vec!["Identical", "NotEmpty"]);
        let identical = chain.get_as::<Identical>("Identical").unwrap();
        assert_eq!(identical.token(), Some("new"));
    }

    #[test]
    fn test_get_as_wrong_type() {
        let mut chain = ValidatorChain::new();
        chain.add(NotEmpty, false);
        assert!(chain.get_as::<Identical>("NotEmpty").is_none());
        assert!(chain.get_as::<NotEmpty>("NotEmpty").is_some());
    }

    #[test]
    fn test_remove() {
        let mut chain = ValidatorChain::new();
        chain.add(NotEmpty, false);
        assert!(chain.remove("NotEmpty"));
        assert!(!chain.remove("NotEmpty"));
        assert!(chain.is_empty());
    }
}
