//! API Key domain
//!
//! This module provides the domain types for a project's API keys: the
//! records returned by the management API, the tagged create request, the
//! role-binding rules for secret keys and the repository seam.

mod entity;
mod repository;
mod request;
mod validation;

pub use entity::{ApiKeyId, ApiKeyRecord, ApiKeyType, SecretJwtTemplate};
pub use repository::ApiKeyRepository;
pub use request::{CreateApiKeyRequest, CreateApiKeyVariables};
pub use validation::{
    bypasses_row_level_security, validate_role, RoleValidationError, MAX_ROLE_LENGTH,
    SERVICE_ROLE,
};

#[cfg(test)]
pub use repository::mock::MockApiKeyRepository;
