//! Error payloads returned by the management API

use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::DomainError;

/// Structured error body, e.g. `{"message": "role not found"}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Build a request error from a non-success response body.
///
/// Prefers the JSON `message` field, then the raw body, then the status
/// reason phrase.
pub(crate) fn request_error(status: StatusCode, body: &str) -> DomainError {
    let message = match serde_json::from_str::<ErrorPayload>(body) {
        Ok(payload) => payload.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
    };

    DomainError::request(Some(status.as_u16()), message)
}

/// Normalize a transport failure into the request error shape
pub(crate) fn transport_error(error: reqwest::Error) -> DomainError {
    let message = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        format!("Could not connect to the management API: {}", error)
    } else {
        format!("Request failed: {}", error)
    };

    DomainError::request(error.status().map(|s| s.as_u16()), message)
}
