//! Error types for the mail library.

use thiserror::Error;

/// Result type for mail operations.
pub type MailResult<T> = Result<T, MailError>;

/// Errors that can occur while building, rendering or sending mail.
///
/// Every variant carries plain data so the error can be cloned and compared.
/// A template mailer hands its wrapped mailer's error back untouched, and
/// callers rely on equality to recognise it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailError {
    /// Invalid construction input (base URL, environment).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The HTTP transport failed before a status code was received.
    #[error("{0}")]
    TransportError(String),

    /// The provider answered with a status other than 200.
    #[error("Invalid status code: {0}")]
    HttpStatus(u16),

    /// The wire payload could not be encoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Templates could not be compiled.
    #[error("Template load error: {0}")]
    TemplateLoadError(String),

    /// A named template is missing or failed while rendering.
    #[error("Template rendering error: {0}")]
    RenderError(String),

    /// A required argument was not supplied.
    #[error("{0}")]
    InvalidInput(&'static str),
}

impl MailError {
    /// Status code returned by the provider, if the failure carried one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::TransportError(err.to_string())
    }
}

impl From<serde_json::Error> for MailError {
    fn from(err: serde_json::Error) -> Self {
        MailError::SerializationError(err.to_string())
    }
}

impl From<handlebars::RenderError> for MailError {
    fn from(err: handlebars::RenderError) -> Self {
        MailError::RenderError(err.to_string())
    }
}

impl From<handlebars::TemplateError> for MailError {
    fn from(err: handlebars::TemplateError) -> Self {
        MailError::TemplateLoadError(err.to_string())
    }
}

impl From<glob::PatternError> for MailError {
    fn from(err: glob::PatternError) -> Self {
        MailError::TemplateLoadError(err.to_string())
    }
}
