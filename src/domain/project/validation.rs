//! Project reference validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during project reference validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectValidationError {
    #[error("Project reference cannot be empty")]
    Empty,

    #[error("Project reference exceeds maximum length of {0} characters")]
    TooLong(usize),

    #[error("Project reference '{0}' may only contain lowercase letters, digits and hyphens, and must start and end with a letter or digit")]
    InvalidFormat(String),
}

const MAX_PROJECT_REF_LENGTH: usize = 64;

static PROJECT_REF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").expect("project ref pattern is valid")
});

/// Validate a project reference
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only lowercase ASCII letters, digits and hyphens
/// - Must start and end with a letter or digit
pub fn validate_project_ref(value: &str) -> Result<(), ProjectValidationError> {
    if value.is_empty() {
        return Err(ProjectValidationError::Empty);
    }

    if value.len() > MAX_PROJECT_REF_LENGTH {
        return Err(ProjectValidationError::TooLong(MAX_PROJECT_REF_LENGTH));
    }

    if !PROJECT_REF_PATTERN.is_match(value) {
        return Err(ProjectValidationError::InvalidFormat(value.to_string()));
    }

    Ok(())
}
