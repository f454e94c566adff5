use formguard_session::SessionError;
use formguard_view::ViewError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsrfError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("View error: {0}")]
    View(#[from] ViewError),

    #[error("Invalid option {option}: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("No view attached to element '{0}'")]
    MissingView(String),

    #[error("Unknown decorator: {0}")]
    UnknownDecorator(String),
}

pub type Result<T> = std::result::Result<T, CsrfError>;
