//! Query cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::broadcast;

use super::key::QueryKey;
use crate::domain::DomainError;

/// Change notification published by a query cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// Fresh data was stored under the key
    Updated(QueryKey),
    /// The key was marked stale; readers should refetch
    Invalidated(QueryKey),
}

impl CacheEvent {
    pub fn key(&self) -> &QueryKey {
        match self {
            Self::Updated(key) | Self::Invalidated(key) => key,
        }
    }
}

/// Raw cached value as stored
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntry {
    /// Serialized JSON value
    pub data: String,
    /// Set by invalidation, cleared by the next store
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
}

/// Typed cached value
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry<V> {
    pub value: V,
    pub stale: bool,
    pub fetched_at: DateTime<Utc>,
}

impl<V> CachedEntry<V> {
    pub fn is_fresh(&self) -> bool {
        !self.stale
    }
}

/// Keyed client-side cache with an explicit invalidation API
///
/// This trait uses JSON strings internally to be dyn-compatible.
/// Use the helper methods for typed get/set operations.
#[async_trait]
pub trait QueryCache: Send + Sync + Debug {
    /// Gets a raw entry, stale or not
    async fn get_raw(&self, key: &QueryKey) -> Result<Option<RawEntry>, DomainError>;

    /// Stores a raw JSON value as fresh data
    async fn set_raw(&self, key: &QueryKey, value: &str) -> Result<(), DomainError>;

    /// Number of times `key` has been invalidated
    async fn generation(&self, key: &QueryKey) -> Result<u64, DomainError>;

    /// Stores a value fetched while `key` was at `generation`.
    ///
    /// The entry is fresh only if no invalidation happened since; otherwise it
    /// is stored stale. Returns whether it was stored fresh.
    async fn set_raw_fetched(
        &self,
        key: &QueryKey,
        value: &str,
        generation: u64,
    ) -> Result<bool, DomainError>;

    /// Marks a key stale and notifies subscribers.
    ///
    /// Returns whether an entry existed. Subscribers are notified either way,
    /// and the key's generation is bumped so in-flight fetches land stale.
    async fn invalidate(&self, key: &QueryKey) -> Result<bool, DomainError>;

    /// Subscribes to change notifications
    fn subscribe(&self) -> broadcast::Receiver<CacheEvent>;
}

/// Extension trait providing typed get/set operations
pub trait QueryCacheExt: QueryCache {
    /// Gets a typed entry from the cache
    fn get<'a, V>(
        &'a self,
        key: &'a QueryKey,
    ) -> impl std::future::Future<Output = Result<Option<CachedEntry<V>>, DomainError>> + Send
    where
        V: DeserializeOwned + Send,
    {
        async move {
            match self.get_raw(key).await? {
                Some(entry) => {
                    let value: V = serde_json::from_str(&entry.data).map_err(|e| {
                        DomainError::cache(format!("Failed to deserialize cache value: {}", e))
                    })?;
                    Ok(Some(CachedEntry {
                        value,
                        stale: entry.stale,
                        fetched_at: entry.fetched_at,
                    }))
                }
                None => Ok(None),
            }
        }
    }

    /// Stores a typed value as fresh data
    fn set<'a, V>(
        &'a self,
        key: &'a QueryKey,
        value: &'a V,
    ) -> impl std::future::Future<Output = Result<(), DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serialize(value)?;
            self.set_raw(key, &data).await
        }
    }

    /// Stores a typed value fetched at `generation`, see [`QueryCache::set_raw_fetched`]
    fn set_fetched<'a, V>(
        &'a self,
        key: &'a QueryKey,
        value: &'a V,
        generation: u64,
    ) -> impl std::future::Future<Output = Result<bool, DomainError>> + Send
    where
        V: Serialize + Send + Sync,
    {
        async move {
            let data = serialize(value)?;
            self.set_raw_fetched(key, &data, generation).await
        }
    }
}

fn serialize<V: Serialize>(value: &V) -> Result<String, DomainError> {
    serde_json::to_string(value)
        .map_err(|e| DomainError::cache(format!("Failed to serialize cache value: {}", e)))
}

// Blanket implementation for all types implementing QueryCache
impl<T: QueryCache + ?Sized> QueryCacheExt for T {}
