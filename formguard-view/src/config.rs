//! View configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Configuration for [`HandlebarsView`](crate::HandlebarsView)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Directory whose templates override the built-in form templates
    pub template_dir: Option<PathBuf>,

    /// Template file extension (default: ".hbs")
    pub template_extension: String,

    /// Reload templates from disk before every render
    pub dev_mode: bool,

    /// Error on missing variables
    pub strict_mode: bool,

    /// HTML-escape `{{value}}` expressions (default: true)
    pub escape_html: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            template_extension: ".hbs".to_string(),
            dev_mode: false,
            strict_mode: false,
            escape_html: true,
        }
    }
}

impl ViewConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load override templates from `dir`
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    pub fn with_extension(mut self, ext: impl Into<String>) -> Self {
        self.template_extension = ext.into();
        self
    }

    pub fn with_dev_mode(mut self, enable: bool) -> Self {
        self.dev_mode = enable;
        self
    }

    pub fn with_strict_mode(mut self, enable: bool) -> Self {
        self.strict_mode = enable;
        self
    }

    pub fn with_escape_html(mut self, enable: bool) -> Self {
        self.escape_html = enable;
        self
    }
}
