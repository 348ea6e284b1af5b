//! API key list query
//!
//! Reads a project's key list through the query cache, fetching from the
//! repository when the cached entry is missing or stale.

use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::api_key::{ApiKeyRecord, ApiKeyRepository};
use crate::domain::cache::{CacheEvent, CachedEntry, QueryCache, QueryCacheExt, QueryKey};
use crate::domain::project::ProjectRef;
use crate::domain::DomainError;

const MAX_FETCH_ATTEMPTS: usize = 3;

/// Cached access to a project's API keys
#[derive(Debug, Clone)]
pub struct ApiKeysQuery {
    repository: Arc<dyn ApiKeyRepository>,
    cache: Arc<dyn QueryCache>,
}

impl ApiKeysQuery {
    pub fn new(repository: Arc<dyn ApiKeyRepository>, cache: Arc<dyn QueryCache>) -> Self {
        Self { repository, cache }
    }

    /// Returns the cached list when fresh, otherwise fetches it
    pub async fn fetch(&self, project: &ProjectRef) -> Result<Vec<ApiKeyRecord>, DomainError> {
        if let Some(entry) = self.cached(project).await? {
            if entry.is_fresh() {
                debug!("API key list cache hit: project={}", project);
                return Ok(entry.value);
            }
        }

        self.refetch(project).await
    }

    /// Fetches the list from the repository and stores it, ignoring the cache.
    ///
    /// A list invalidated while its fetch was in flight may predate the
    /// change that invalidated it, so it is stored stale and fetched again.
    pub async fn refetch(&self, project: &ProjectRef) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let key = QueryKey::api_keys_list(project);
        let mut attempt = 1;

        loop {
            debug!("Fetching API key list: project={} attempt={}", project, attempt);

            let generation = self.cache.generation(&key).await?;
            let records = self.repository.list(project).await?;

            if self.cache.set_fetched(&key, &records, generation).await? {
                return Ok(records);
            }

            if attempt >= MAX_FETCH_ATTEMPTS {
                warn!(
                    "API key list kept changing during fetch, leaving it stale: project={}",
                    project
                );
                return Ok(records);
            }

            attempt += 1;
        }
    }

    /// Peeks at the cached list without fetching
    pub async fn cached(
        &self,
        project: &ProjectRef,
    ) -> Result<Option<CachedEntry<Vec<ApiKeyRecord>>>, DomainError> {
        self.cache.get(&QueryKey::api_keys_list(project)).await
    }

    /// Keeps a project's list up to date in the background.
    ///
    /// The returned watch starts empty, receives the initial fetch, and then
    /// a fresh list after every invalidation of the project's list key. A
    /// failed refetch keeps the previously published list.
    pub fn watch(&self, project: ProjectRef) -> ApiKeysWatch {
        let (tx, rx) = watch::channel(None);
        let events = self.cache.subscribe();
        let query = self.clone();

        let task = tokio::spawn(async move {
            query.run_watch(project, events, tx).await;
        });

        ApiKeysWatch { rx, task }
    }

    async fn run_watch(
        &self,
        project: ProjectRef,
        mut events: broadcast::Receiver<CacheEvent>,
        tx: watch::Sender<Option<Vec<ApiKeyRecord>>>,
    ) {
        let key = QueryKey::api_keys_list(&project);

        self.publish(&project, &tx, false).await;

        loop {
            let refetch = tokio::select! {
                _ = tx.closed() => break,
                event = events.recv() => match event {
                    Ok(CacheEvent::Invalidated(invalidated)) => invalidated == key,
                    Ok(_) => false,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("API key watch lagged by {} events: project={}", skipped, project);
                        true
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            if refetch {
                self.publish(&project, &tx, true).await;
            }
        }

        debug!("API key watch stopped: project={}", project);
    }

    async fn publish(
        &self,
        project: &ProjectRef,
        tx: &watch::Sender<Option<Vec<ApiKeyRecord>>>,
        force: bool,
    ) {
        let result = if force {
            self.refetch(project).await
        } else {
            self.fetch(project).await
        };

        match result {
            Ok(records) => {
                let _ = tx.send(Some(records));
            }
            Err(e) => warn!("Failed to refresh API key list: project={} error={}", project, e),
        }
    }
}

/// Live view of a project's API key list
///
/// Dropping the watch stops the background refresh.
#[derive(Debug)]
pub struct ApiKeysWatch {
    rx: watch::Receiver<Option<Vec<ApiKeyRecord>>>,
    task: JoinHandle<()>,
}

impl ApiKeysWatch {
    /// Latest published list, `None` until the first fetch succeeds
    pub fn latest(&self) -> Option<Vec<ApiKeyRecord>> {
        self.rx.borrow().clone()
    }

    /// Waits for the next published list
    pub async fn changed(&mut self) -> Result<Option<Vec<ApiKeyRecord>>, DomainError> {
        self.rx
            .changed()
            .await
            .map_err(|_| DomainError::internal("API key watch stopped"))?;

        Ok(self.rx.borrow_and_update().clone())
    }
}

impl Drop for ApiKeysWatch {
    fn drop(&mut self) {
        self.task.abort();
    }
}
