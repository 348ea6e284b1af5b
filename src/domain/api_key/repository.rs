//! API Key repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::ApiKeyRecord;
use super::request::CreateApiKeyRequest;
use crate::domain::project::ProjectRef;
use crate::domain::DomainError;

/// Access to a project's API keys
#[async_trait]
pub trait ApiKeyRepository: Send + Sync + Debug {
    /// List every API key of a project, in server order
    async fn list(&self, project: &ProjectRef) -> Result<Vec<ApiKeyRecord>, DomainError>;

    /// Create a new API key. Not idempotent: each call issues a new key.
    async fn create(
        &self,
        project: &ProjectRef,
        request: &CreateApiKeyRequest,
    ) -> Result<ApiKeyRecord, DomainError>;
}
