//! The CSRF hash element.

use crate::config::{HashConfig, SESSION_NAME_PREFIX, check_timeout, normalize_salt};
use crate::element::{Decorator, ElementCore, FormElement};
use crate::error::{CsrfError, Result};
use crate::token::generate_hash;
use formguard_log::{debug, warn};
use formguard_session::{MemoryNamespace, MemorySessionStore, SessionNamespace, SharedNamespace};
use formguard_validation::{Identical, ValidationError, ValidationErrors, Validator};
use formguard_view::{View, templates};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Hidden form element carrying a session-bound CSRF token.
///
/// The token (the *hash*) is generated on first use, stored in the session
/// namespace under the element's salt, and rendered into a hidden input.
/// On submission, [`is_valid`](HashElement::is_valid) compares the posted
/// value with whatever the session holds under the salt at that moment, so
/// an element built on a later request validates a token rendered by an
/// earlier one.
///
/// # Examples
///
/// ```
/// use formguard_csrf::HashElement;
/// use formguard_session::MemoryNamespace;
///
/// let session = MemoryNamespace::new("csrf").shared();
///
/// // Request 1: render the form
/// let mut element = HashElement::builder("csrf")
///     .session(session.clone())
///     .salt("signup-form")
///     .build()
///     .unwrap();
/// let token = element.hash().unwrap();
///
/// // Request 2: validate the submission with a fresh element
/// let mut element = HashElement::builder("csrf")
///     .session(session)
///     .salt("signup-form")
///     .build()
///     .unwrap();
/// assert!(element.is_valid(&token));
/// assert!(!element.is_valid("forged"));
/// ```
pub struct HashElement {
    core: ElementCore,
    salt: String,
    timeout: u64,
    hash: Option<String>,
    session: OnceCell<SharedNamespace>,
}

impl fmt::Debug for HashElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashElement")
            .field("name", &self.core.name())
            .field("salt", &self.salt)
            .field("timeout", &self.timeout)
            .field("has_hash", &self.hash.is_some())
            .field("session", &self.session.get().map(|s| s.name()))
            .finish()
    }
}

impl HashElement {
    /// Element with default options and a private in-memory session.
    pub fn new(name: impl Into<String>) -> Self {
        Self::assemble(name.into(), HashConfig::default(), None)
    }

    pub fn builder(name: impl Into<String>) -> HashElementBuilder {
        HashElementBuilder::new(name)
    }

    fn assemble(name: String, config: HashConfig, session: Option<SharedNamespace>) -> Self {
        let mut core = ElementCore::new(name, templates::FORM_HIDDEN);
        core.set_required(true);
        core.set_allow_empty(false);
        for (key, value) in config.attribs {
            core.set_attrib(key, value);
        }

        let cell = OnceCell::new();
        if let Some(session) = session {
            let _ = cell.set(session);
        }

        let mut element = Self {
            core,
            salt: normalize_salt(config.salt),
            timeout: config.timeout,
            hash: None,
            session: cell,
        };
        element.init_csrf_validator();
        element
    }

    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Change the salt. The cached hash is dropped so the next `hash()` call
    /// generates a new one; later session reads and writes use the new salt
    /// as key.
    pub fn set_salt(&mut self, salt: impl Into<String>) -> &mut Self {
        self.salt = normalize_salt(salt.into());
        self.hash = None;
        self
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    /// Set the session lifetime in seconds. Zero is rejected here; values
    /// above the namespace's maximum TTL (7 days by default) are rejected
    /// by `init_csrf_token` and `render`.
    pub fn set_timeout(&mut self, seconds: u64) -> Result<&mut Self> {
        self.timeout = check_timeout(seconds)?;
        Ok(self)
    }

    /// Name used for a namespace created on demand; always contains the
    /// element name.
    pub fn session_name(&self) -> String {
        session_name(&self.salt, self.core.name())
    }

    /// Session namespace holding the token. Created as an in-memory namespace
    /// named [`session_name`](Self::session_name) when none was supplied.
    pub fn session(&self) -> &SharedNamespace {
        self.session
            .get_or_init(|| MemoryNamespace::new(self.session_name()).shared())
    }

    /// The token, generated on first call.
    ///
    /// Generation also stores the token in the session under the salt and
    /// sets the element value. Later calls return the cached token and leave
    /// the session alone.
    pub fn hash(&mut self) -> Result<String> {
        if let Some(hash) = &self.hash {
            return Ok(hash.clone());
        }

        let hash = generate_hash(&self.salt, self.core.name());
        debug!(target: "formguard::csrf", "generated token for element {}", self.core.name());

        self.session().set(&self.salt, Value::String(hash.clone()))?;
        self.core.set_value(Some(hash.clone()));
        self.hash = Some(hash.clone());
        Ok(hash)
    }

    /// Make sure a token exists and is stored in the session, and give the
    /// session namespace a one-hop, `timeout`-second lifetime.
    ///
    /// The element value is reset to the token, so a form shown again after
    /// a failed submission carries the token and not the submitted value.
    /// A timeout the namespace rejects leaves the session untouched.
    pub fn init_csrf_token(&mut self) -> Result<()> {
        let session = self.session().clone();
        session.set_expiration_seconds(self.timeout)?;
        session.set_expiration_hops(1)?;

        let hash = self.hash()?;
        self.core.set_value(Some(hash.clone()));
        session.set(&self.salt, Value::String(hash))?;
        Ok(())
    }

    /// Rebuild the `Identical` validator from the token currently stored in
    /// the session under the salt.
    pub fn init_csrf_validator(&mut self) -> &mut Self {
        let token = self.session().get_string(&self.salt);
        self.core
            .validators_mut()
            .add(Identical::new(token), true);
        self
    }

    /// Validator by symbolic name, e.g. `"Identical"`.
    pub fn validator(&self, name: &str) -> Option<&dyn Validator> {
        self.core.validators().get(name)
    }

    /// The token validator.
    pub fn identical_validator(&self) -> Option<&Identical> {
        self.core.validators().get_as::<Identical>(Identical::NAME)
    }

    /// Compare `candidate` with the token stored in the session.
    pub fn is_valid(&mut self, candidate: &str) -> bool {
        self.init_csrf_validator();
        let valid = self.core.is_valid(candidate);
        if !valid {
            warn!(
                target: "formguard::csrf",
                "token validation failed for element {}: {}",
                self.core.name(),
                ValidationErrors::from(self.core.errors().to_vec()).to_json()
            );
        }
        valid
    }

    pub fn set_view(&mut self, view: Arc<dyn View>) -> &mut Self {
        self.core.set_view(view);
        self
    }

    pub fn view(&self) -> Option<&Arc<dyn View>> {
        self.core.view()
    }

    /// Initialise the token, then run the decorators.
    pub fn render(&mut self, view: &dyn View) -> Result<String> {
        self.init_csrf_token()?;
        self.core.render(view)
    }

    /// Render only the hidden input through the attached view.
    pub fn render_view_helper(&mut self) -> Result<String> {
        self.render_decorator(Decorator::ViewHelper.name())
    }

    /// Render a single decorator through the attached view.
    pub fn render_decorator(&mut self, name: &str) -> Result<String> {
        let view = self.attached_view()?;
        self.init_csrf_token()?;
        self.core.render_decorator(name, view.as_ref())
    }

    fn attached_view(&self) -> Result<Arc<dyn View>> {
        self.core
            .view()
            .cloned()
            .ok_or_else(|| CsrfError::MissingView(self.core.name().to_string()))
    }

    pub fn core(&self) -> &ElementCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }
}

impl FormElement for HashElement {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn label(&self) -> Option<&str> {
        self.core.label()
    }

    fn value(&self) -> Option<&str> {
        self.core.value()
    }

    fn set_value(&mut self, value: Option<String>) {
        self.core.set_value(value);
    }

    fn is_valid(&mut self, value: &str) -> bool {
        HashElement::is_valid(self, value)
    }

    fn messages(&self) -> &[ValidationError] {
        self.core.errors()
    }

    fn render(&mut self, view: &dyn View) -> Result<String> {
        HashElement::render(self, view)
    }
}

fn session_name(salt: &str, name: &str) -> String {
    format!("{}_{}_{}", SESSION_NAME_PREFIX, salt, name)
}

/// Builder for [`HashElement`].
pub struct HashElementBuilder {
    name: String,
    config: HashConfig,
    session: Option<SharedNamespace>,
    store: Option<Arc<MemorySessionStore>>,
    view: Option<Arc<dyn View>>,
    label: Option<String>,
}

impl HashElementBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: HashConfig::default(),
            session: None,
            store: None,
            view: None,
            label: None,
        }
    }

    /// Replace all options at once.
    pub fn config(mut self, config: HashConfig) -> Self {
        self.config = config;
        self
    }

    pub fn salt(mut self, salt: impl Into<String>) -> Self {
        self.config = self.config.with_salt(salt);
        self
    }

    /// Session entry lifetime; validated by `build`.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.timeout = seconds;
        self
    }

    pub fn attrib(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config = self.config.with_attrib(key, value);
        self
    }

    /// Share an existing session namespace.
    pub fn session(mut self, session: SharedNamespace) -> Self {
        self.session = Some(session);
        self
    }

    /// Take the namespace named after the element from a user's session store.
    /// Ignored when an explicit `session` is also given.
    pub fn store(mut self, store: Arc<MemorySessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn view(mut self, view: Arc<dyn View>) -> Self {
        self.view = Some(view);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn build(self) -> Result<HashElement> {
        check_timeout(self.config.timeout)?;

        let session = match (self.session, self.store) {
            (Some(session), _) => Some(session),
            (None, Some(store)) => {
                let salt = normalize_salt(self.config.salt.clone());
                Some(store.namespace(&session_name(&salt, &self.name))?)
            }
            (None, None) => None,
        };

        let mut element = HashElement::assemble(self.name, self.config, session);
        if let Some(view) = self.view {
            element.set_view(view);
        }
        if let Some(label) = self.label {
            element.core.set_label(Some(label));
        }
        Ok(element)
    }
}
