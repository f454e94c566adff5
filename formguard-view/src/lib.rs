//! View layer for formguard form elements
//!
//! Form elements never build markup themselves; they hand a template name
//! and a JSON object to a [`View`]. [`HandlebarsView`] ships the templates
//! form elements need (`formHidden`, `formErrors`, `htmlTag`, `formLabel`)
//! and can load replacements from a directory.
//!
//! ```
//! use formguard_view::{HandlebarsView, View, templates};
//! use serde_json::json;
//!
//! let view = HandlebarsView::new().unwrap();
//! let html = view
//!     .render(
//!         templates::FORM_HIDDEN,
//!         &json!({"name": "csrf", "id": "csrf", "value": "d41d8cd9", "attribs": {}}),
//!     )
//!     .unwrap();
//! assert!(html.contains(r#"type="hidden""#));
//! assert!(html.contains("d41d8cd9"));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod templates;

pub use config::ViewConfig;
pub use engine::HandlebarsView;
pub use error::{ViewError, ViewResult};

use serde_json::Value;

/// Renders named templates with JSON data.
pub trait View: Send + Sync {
    fn render(&self, template: &str, data: &Value) -> ViewResult<String>;

    fn has_template(&self, name: &str) -> bool;
}
