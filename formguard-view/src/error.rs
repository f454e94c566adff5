//! Error types for the view layer

use thiserror::Error;

/// Result type for view operations
pub type ViewResult<T> = std::result::Result<T, ViewError>;

/// Errors raised while loading or rendering templates
#[derive(Error, Debug)]
pub enum ViewError {
    /// No template registered under this name
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Template rendering error
    #[error("Template rendering error: {0}")]
    Render(String),

    /// Template parsing error
    #[error("Template parsing error: {0}")]
    Parse(String),

    /// IO error when loading templates
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<handlebars::RenderError> for ViewError {
    fn from(err: handlebars::RenderError) -> Self {
        ViewError::Render(err.to_string())
    }
}

impl From<handlebars::TemplateError> for ViewError {
    fn from(err: handlebars::TemplateError) -> Self {
        ViewError::Parse(err.to_string())
    }
}
