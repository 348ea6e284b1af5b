//! Create API key mutation
//!
//! Posts a new key and, once the server confirms it, invalidates the owning
//! project's cached key list so every reader refetches.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::api_key::{ApiKeyRecord, ApiKeyRepository, CreateApiKeyVariables};
use crate::domain::cache::{QueryCache, QueryKey};
use crate::domain::notification::{Notification, Notifier};
use crate::domain::DomainError;

type SuccessHandler = Box<dyn FnOnce(&ApiKeyRecord, &CreateApiKeyVariables) + Send>;
type ErrorHandler = Box<dyn FnOnce(&DomainError, &CreateApiKeyVariables) + Send>;

/// Caller-supplied handlers for one mutation
///
/// A caller error handler replaces the default failure notification.
#[derive(Default)]
pub struct MutationCallbacks {
    on_success: Option<SuccessHandler>,
    on_error: Option<ErrorHandler>,
}

impl MutationCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_success(
        mut self,
        handler: impl FnOnce(&ApiKeyRecord, &CreateApiKeyVariables) + Send + 'static,
    ) -> Self {
        self.on_success = Some(Box::new(handler));
        self
    }

    pub fn on_error(
        mut self,
        handler: impl FnOnce(&DomainError, &CreateApiKeyVariables) + Send + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }
}

impl std::fmt::Debug for MutationCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationCallbacks")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Creates API keys and keeps the cached key list consistent
#[derive(Clone)]
pub struct CreateApiKeyMutation {
    repository: Arc<dyn ApiKeyRepository>,
    cache: Arc<dyn QueryCache>,
    notifier: Arc<dyn Notifier>,
}

impl CreateApiKeyMutation {
    pub fn new(
        repository: Arc<dyn ApiKeyRepository>,
        cache: Arc<dyn QueryCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            cache,
            notifier,
        }
    }

    /// Create a key with default error handling
    pub async fn mutate(
        &self,
        variables: CreateApiKeyVariables,
    ) -> Result<ApiKeyRecord, DomainError> {
        self.mutate_with(variables, MutationCallbacks::default()).await
    }

    /// Create a key.
    ///
    /// Success: the project's list key is invalidated first, then
    /// `on_success` runs. Failure: nothing is invalidated, and either
    /// `on_error` runs or a default error notification is sent.
    pub async fn mutate_with(
        &self,
        variables: CreateApiKeyVariables,
        callbacks: MutationCallbacks,
    ) -> Result<ApiKeyRecord, DomainError> {
        let project = &variables.project_ref;

        let created = match self.repository.create(project, &variables.request).await {
            Ok(created) => created,
            Err(error) => {
                warn!("Failed to create API key: project={} error={}", project, error);

                match callbacks.on_error {
                    Some(handler) => handler(&error, &variables),
                    None => self.notifier.notify(Notification::error(format!(
                        "Failed to mutate: {}",
                        error.user_message()
                    ))),
                }

                return Err(error);
            }
        };

        info!(
            "Created {} API key: project={} id={}",
            created.key_type(),
            project,
            created.id()
        );

        // Key already exists server-side; cache errors are only logged
        if let Err(e) = self.cache.invalidate(&QueryKey::api_keys_list(project)).await {
            warn!("Failed to invalidate API key list: project={} error={}", project, e);
        }

        if let Some(handler) = callbacks.on_success {
            handler(&created, &variables);
        }

        Ok(created)
    }
}

impl std::fmt::Debug for CreateApiKeyMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateApiKeyMutation")
            .field("repository", &self.repository)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use tokio_test::{assert_err, assert_ok};

    use crate::domain::api_key::{CreateApiKeyRequest, MockApiKeyRepository};
    use crate::domain::cache::{CacheEvent, QueryCacheExt};
    use crate::domain::notification::{MockNotifier, NotificationLevel};
    use crate::domain::project::ProjectRef;
    use crate::infrastructure::cache::InMemoryQueryCache;

    fn project() -> ProjectRef {
        ProjectRef::new("alpha").unwrap()
    }

    fn variables(role: &str) -> CreateApiKeyVariables {
        CreateApiKeyVariables::new(project(), CreateApiKeyRequest::secret("", Some(role)))
    }

    fn silent_notifier() -> Arc<MockNotifier> {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();
        Arc::new(notifier)
    }

    #[tokio::test]
    async fn test_success_invalidates_then_calls_handler() {
        let repo = Arc::new(MockApiKeyRepository::new());
        let cache = Arc::new(InMemoryQueryCache::new());
        cache
            .set(&QueryKey::api_keys_list(&project()), &Vec::<ApiKeyRecord>::new())
            .await
            .unwrap();
        let mut events = cache.subscribe();

        let mutation = CreateApiKeyMutation::new(repo.clone(), cache.clone(), silent_notifier());

        let mut events_at_handler = cache.subscribe();
        let seen = Arc::new(Mutex::new(None));
        let seen_in_handler = seen.clone();
        let callbacks = MutationCallbacks::new().on_success(move |record, vars| {
            let invalidated_first = matches!(
                events_at_handler.try_recv(),
                Ok(CacheEvent::Invalidated(_))
            );
            *seen_in_handler.lock().unwrap() = Some((
                record.id().clone(),
                vars.project_ref.clone(),
                invalidated_first,
            ));
        });

        let result = mutation.mutate_with(variables("service_role"), callbacks).await;
        assert_ok!(&result);
        let created = result.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            CacheEvent::Invalidated(QueryKey::api_keys_list(&project()))
        );
        let entry = cache
            .get::<Vec<ApiKeyRecord>>(&QueryKey::api_keys_list(&project()))
            .await
            .unwrap()
            .unwrap();
        assert!(entry.stale);
        assert_eq!(
            seen.lock().unwrap().clone(),
            Some((created.id().clone(), project(), true))
        );
    }

    #[tokio::test]
    async fn test_failure_notifies_by_default_and_skips_invalidation() {
        let repo = Arc::new(MockApiKeyRepository::new());
        repo.fail_creates_with("role not found").await;
        let cache = Arc::new(InMemoryQueryCache::new());
        let mut events = cache.subscribe();

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| {
                n.level == NotificationLevel::Error
                    && n.message == "Failed to mutate: role not found"
            })
            .times(1)
            .return_const(());

        let mutation = CreateApiKeyMutation::new(repo, cache, Arc::new(notifier));

        let result = mutation.mutate(variables("ghost")).await;
        assert_err!(&result);

        assert_eq!(result.unwrap_err().user_message(), "role not found");
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_caller_error_handler_replaces_notification() {
        let repo = Arc::new(MockApiKeyRepository::new());
        repo.fail_creates_with("role not found").await;
        let cache = Arc::new(InMemoryQueryCache::new());

        let mutation = CreateApiKeyMutation::new(repo, cache, silent_notifier());

        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let callbacks = MutationCallbacks::new()
            .on_error(move |error, _| sink.lock().unwrap().push(error.user_message()))
            .on_success(|_, _| panic!("success handler must not run"));

        let result = mutation.mutate_with(variables("ghost"), callbacks).await;
        assert_err!(&result);

        assert_eq!(*captured.lock().unwrap(), vec!["role not found".to_string()]);
    }

    #[tokio::test]
    async fn test_resubmitting_creates_distinct_records() {
        let repo = Arc::new(MockApiKeyRepository::new());
        let cache = Arc::new(InMemoryQueryCache::new());
        let mutation = CreateApiKeyMutation::new(repo.clone(), cache, silent_notifier());

        let first = mutation.mutate(variables("service_role")).await.unwrap();
        let second = mutation.mutate(variables("service_role")).await.unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(repo.create_calls(), 2);
    }
}
