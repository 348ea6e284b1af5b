use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Non-success response from the management API, or a transport failure
    /// normalized into the same shape (`status` is `None` in that case)
    #[error("Request failed: {message}")]
    Request {
        status: Option<u16>,
        message: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl DomainError {
    pub fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Request {
            status,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Message suitable for showing to a user.
    ///
    /// Request errors carry the server-reported message verbatim; every other
    /// variant falls back to its display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Request { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a request error, if one was observed
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            _ => None,
        }
    }
}
