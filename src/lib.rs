// formguard - session-backed CSRF protection for server-rendered forms
//
// This library bundles the CSRF hash element with the session, validation,
// view and logging layers it is built on.

// Re-export the hash element and form element surface
pub use formguard_csrf::*;

// Re-export supporting crates
pub use formguard_log as log;
pub use formguard_session as session;
pub use formguard_validation as validation;
pub use formguard_view as view;

// Prelude for common imports
pub mod prelude {
    pub use formguard_csrf::{
        CsrfError, Decorator, FormElement, HashConfig, HashElement, HashElementBuilder,
    };
    pub use formguard_session::{
        MemoryNamespace, MemorySessionStore, SessionConfig, SessionNamespace, SharedNamespace,
    };
    pub use formguard_validation::{Identical, ValidationError, Validator, ValidatorChain};
    pub use formguard_view::{HandlebarsView, View, ViewConfig};
}
