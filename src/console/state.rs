use std::sync::Arc;

use crate::console::secret_keys_table::{ConsoleGates, SecretKeysTable};
use crate::domain::api_key::ApiKeyRepository;
use crate::domain::cache::QueryCache;
use crate::domain::notification::Notifier;
use crate::domain::project::ProjectRef;
use crate::domain::DomainError;
use crate::infrastructure::services::{ApiKeysQuery, CreateApiKeyMutation};

/// Shared services behind the API keys screens
#[derive(Debug, Clone)]
pub struct ConsoleState {
    pub cache: Arc<dyn QueryCache>,
    pub api_keys: ApiKeysQuery,
    pub create_api_key: CreateApiKeyMutation,
}

impl ConsoleState {
    pub fn new(
        repository: Arc<dyn ApiKeyRepository>,
        cache: Arc<dyn QueryCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api_keys: ApiKeysQuery::new(repository.clone(), cache.clone()),
            create_api_key: CreateApiKeyMutation::new(repository, cache.clone(), notifier),
            cache,
        }
    }

    /// Build the secret keys table from the cached list, fetching it when stale
    pub async fn secret_keys_table(
        &self,
        project: &ProjectRef,
        gates: ConsoleGates,
    ) -> Result<SecretKeysTable, DomainError> {
        let records = self.api_keys.fetch(project).await?;
        Ok(SecretKeysTable::project(&records, gates))
    }
}
