//! API Key record and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned API key identifier, unique within a project
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKeyId(String);

impl ApiKeyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Classification of an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyType {
    /// Safe to expose to end-user clients, never carries a role binding
    Publishable,
    /// Backend-only credential, optionally bound to a Postgres role
    Secret,
}

impl ApiKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publishable => "publishable",
            Self::Secret => "secret",
        }
    }
}

impl std::fmt::Display for ApiKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ApiKeyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "publishable" => Ok(Self::Publishable),
            "secret" => Ok(Self::Secret),
            other => Err(format!(
                "Unknown API key type: {}. Valid types: publishable, secret",
                other
            )),
        }
    }
}

/// JWT template attached to secret keys; `role` is used for row-level
/// authorization of requests made with the key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretJwtTemplate {
    pub role: String,
}

impl SecretJwtTemplate {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}

/// One issued API key as reported by the management API
///
/// Records are never mutated client-side; the classification in particular is
/// fixed at creation and has no setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    id: ApiKeyId,
    #[serde(rename = "type")]
    key_type: ApiKeyType,
    api_key: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    secret_jwt_template: Option<SecretJwtTemplate>,
    #[serde(default)]
    inserted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl ApiKeyRecord {
    pub fn new(id: ApiKeyId, key_type: ApiKeyType, api_key: impl Into<String>) -> Self {
        Self {
            id,
            key_type,
            api_key: api_key.into(),
            description: None,
            secret_jwt_template: None,
            inserted_at: None,
            updated_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a role binding. Ignored for publishable keys.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        if self.key_type == ApiKeyType::Secret {
            self.secret_jwt_template = Some(SecretJwtTemplate::new(role));
        }
        self
    }

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn key_type(&self) -> ApiKeyType {
        self.key_type
    }

    pub fn is_secret(&self) -> bool {
        self.key_type == ApiKeyType::Secret
    }

    /// Masked key material, as displayed
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Bound role; only ever reported for secret keys
    pub fn role(&self) -> Option<&str> {
        if !self.is_secret() {
            return None;
        }
        self.secret_jwt_template.as_ref().map(|t| t.role.as_str())
    }

    pub fn inserted_at(&self) -> Option<DateTime<Utc>> {
        self.inserted_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_key_type_parse() {
        assert_eq!("secret".parse::<ApiKeyType>(), Ok(ApiKeyType::Secret));
        assert_eq!("Publishable".parse::<ApiKeyType>(), Ok(ApiKeyType::Publishable));
        assert!("legacy".parse::<ApiKeyType>().is_err());
    }

    #[test]
    fn test_record_from_wire() {
        let record: ApiKeyRecord = serde_json::from_value(json!({
            "id": "9f1c0a52-7e7b-4d1e-9d51-2b7a9a1f7c33",
            "type": "secret",
            "api_key": "sb_secret_abc···",
            "description": null,
            "secret_jwt_template": { "role": "service_role" },
            "inserted_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.id().as_str(), "9f1c0a52-7e7b-4d1e-9d51-2b7a9a1f7c33");
        assert!(record.is_secret());
        assert_eq!(record.api_key(), "sb_secret_abc···");
        assert_eq!(record.description(), None);
        assert_eq!(record.role(), Some("service_role"));
        assert!(record.inserted_at().is_some());
    }

    #[test]
    fn test_record_missing_optional_fields() {
        let record: ApiKeyRecord = serde_json::from_value(json!({
            "id": "k1",
            "type": "publishable",
            "api_key": "sb_publishable_xyz"
        }))
        .unwrap();

        assert_eq!(record.key_type(), ApiKeyType::Publishable);
        assert!(record.description().is_none());
        assert!(record.role().is_none());
        assert!(record.updated_at().is_none());
    }

    #[test]
    fn test_publishable_record_never_reports_role() {
        let record: ApiKeyRecord = serde_json::from_value(json!({
            "id": "k1",
            "type": "publishable",
            "api_key": "sb_publishable_xyz",
            "secret_jwt_template": { "role": "service_role" }
        }))
        .unwrap();

        assert!(record.role().is_none());

        let built = ApiKeyRecord::new(ApiKeyId::new("k2"), ApiKeyType::Publishable, "pk")
            .with_role("service_role");
        assert!(built.role().is_none());
    }
}
