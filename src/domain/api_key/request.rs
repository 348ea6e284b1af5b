//! Create request payload

use serde::Serialize;

use super::entity::{ApiKeyType, SecretJwtTemplate};
use crate::domain::project::ProjectRef;

/// Body of `POST /v1/projects/{ref}/api-keys`
///
/// Tagged by `type` on the wire. Only the secret variant can carry a role
/// binding. `description` is always serialized, as `null` when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CreateApiKeyRequest {
    Publishable {
        description: Option<String>,
    },
    Secret {
        description: Option<String>,
        secret_jwt_template: Option<SecretJwtTemplate>,
    },
}

impl CreateApiKeyRequest {
    /// Request for a publishable key
    pub fn publishable(description: &str) -> Self {
        Self::Publishable {
            description: normalize_description(description),
        }
    }

    /// Request for a secret key, optionally bound to `role`
    ///
    /// A blank role is treated as no binding.
    pub fn secret(description: &str, role: Option<&str>) -> Self {
        let secret_jwt_template = role
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(SecretJwtTemplate::new);

        Self::Secret {
            description: normalize_description(description),
            secret_jwt_template,
        }
    }

    pub fn key_type(&self) -> ApiKeyType {
        match self {
            Self::Publishable { .. } => ApiKeyType::Publishable,
            Self::Secret { .. } => ApiKeyType::Secret,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Publishable { description } | Self::Secret { description, .. } => {
                description.as_deref()
            }
        }
    }

    pub fn role(&self) -> Option<&str> {
        match self {
            Self::Publishable { .. } => None,
            Self::Secret {
                secret_jwt_template,
                ..
            } => secret_jwt_template.as_ref().map(|t| t.role.as_str()),
        }
    }
}

fn normalize_description(description: &str) -> Option<String> {
    let description = description.trim();

    if description.is_empty() {
        None
    } else {
        Some(description.to_string())
    }
}

/// Input of the create mutation: the payload plus its owning project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateApiKeyVariables {
    pub project_ref: ProjectRef,
    pub request: CreateApiKeyRequest,
}

impl CreateApiKeyVariables {
    pub fn new(project_ref: ProjectRef, request: CreateApiKeyRequest) -> Self {
        Self {
            project_ref,
            request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_secret_request_wire_format() {
        let request = CreateApiKeyRequest::secret("backend worker", Some("service_role"));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "type": "secret",
                "description": "backend worker",
                "secret_jwt_template": { "role": "service_role" }
            })
        );
    }

    #[test]
    fn test_empty_description_is_explicit_null() {
        let request = CreateApiKeyRequest::secret("", Some("service_role"));
        let value = serde_json::to_value(&request).unwrap();

        let object = value.as_object().unwrap();
        assert!(object.contains_key("description"));
        assert!(object["description"].is_null());
    }

    #[test]
    fn test_whitespace_description_is_null() {
        let request = CreateApiKeyRequest::publishable("   ");
        assert_eq!(request.description(), None);
    }

    #[test]
    fn test_publishable_request_has_no_role() {
        let request = CreateApiKeyRequest::publishable("web app");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "type": "publishable", "description": "web app" })
        );
        assert_eq!(request.role(), None);
        assert_eq!(request.key_type(), ApiKeyType::Publishable);
    }

    #[test]
    fn test_secret_without_role_sends_null_template() {
        let request = CreateApiKeyRequest::secret("x", Some("  "));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "type": "secret", "description": "x", "secret_jwt_template": null })
        );
    }

    #[test]
    fn test_secret_role_is_trimmed() {
        let request = CreateApiKeyRequest::secret("", Some(" authenticated "));
        assert_eq!(request.role(), Some("authenticated"));
    }
}
