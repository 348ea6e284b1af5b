//! In-memory query cache implementation using moka

use std::collections::HashMap;
use std::future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache as MokaCache;
use moka::ops::compute::{CompResult, Op};
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::cache::{CacheEvent, QueryCache, QueryKey, RawEntry};
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Entries older than this are evicted and refetched on next read
    pub time_to_live: Duration,
    /// Buffered events per subscriber before it starts lagging
    pub event_capacity: usize,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            time_to_live: Duration::from_secs(300),
            event_capacity: 64,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_time_to_live(mut self, ttl: Duration) -> Self {
        self.time_to_live = ttl;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }
}

/// Thread-safe in-memory query cache
///
/// Entries keep their data when invalidated and are only flagged stale, so a
/// view can keep showing the last known list while a refetch is in flight.
/// Every write to an entry goes through moka's per-key compute, so marking an
/// entry stale never interleaves with a store of the same key.
#[derive(Debug)]
pub struct InMemoryQueryCache {
    cache: MokaCache<String, RawEntry>,
    generations: Mutex<HashMap<String, u64>>,
    events: broadcast::Sender<CacheEvent>,
    config: InMemoryCacheConfig,
}

impl InMemoryQueryCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.time_to_live)
            .build();
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            cache,
            generations: Mutex::new(HashMap::new()),
            events,
            config,
        }
    }

    pub fn config(&self) -> &InMemoryCacheConfig {
        &self.config
    }

    fn publish(&self, event: CacheEvent) {
        // No subscribers is not an error
        let _ = self.events.send(event);
    }

    fn generations(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.generations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn current_generation(&self, key: &str) -> u64 {
        self.generations().get(key).copied().unwrap_or(0)
    }

    fn bump_generation(&self, key: &str) -> u64 {
        let mut generations = self.generations();
        let generation = generations.entry(key.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Stores `data`, fresh unless `generation` is behind the key's counter
    async fn store(&self, key: &str, data: &str, generation: Option<u64>) -> bool {
        let result = self
            .cache
            .entry(key.to_string())
            .and_compute_with(|_| {
                let stale = generation.is_some_and(|g| g != self.current_generation(key));
                future::ready(Op::Put(RawEntry {
                    data: data.to_string(),
                    stale,
                    fetched_at: Utc::now(),
                }))
            })
            .await;

        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => !entry.value().stale,
            _ => false,
        }
    }

    async fn mark_stale(&self, key: &str) -> bool {
        let result = self
            .cache
            .entry(key.to_string())
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) => Op::Put(RawEntry {
                        stale: true,
                        ..entry.into_value()
                    }),
                    None => Op::Nop,
                };
                future::ready(op)
            })
            .await;

        matches!(result, CompResult::ReplacedWith(_))
    }
}

impl Default for InMemoryQueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryCache for InMemoryQueryCache {
    async fn get_raw(&self, key: &QueryKey) -> Result<Option<RawEntry>, DomainError> {
        Ok(self.cache.get(key.as_str()).await)
    }

    async fn set_raw(&self, key: &QueryKey, value: &str) -> Result<(), DomainError> {
        self.store(key.as_str(), value, None).await;
        self.publish(CacheEvent::Updated(key.clone()));
        Ok(())
    }

    async fn generation(&self, key: &QueryKey) -> Result<u64, DomainError> {
        Ok(self.current_generation(key.as_str()))
    }

    async fn set_raw_fetched(
        &self,
        key: &QueryKey,
        value: &str,
        generation: u64,
    ) -> Result<bool, DomainError> {
        let fresh = self.store(key.as_str(), value, Some(generation)).await;
        if !fresh {
            debug!("Stored superseded fetch as stale: key={} generation={}", key, generation);
        }

        self.publish(CacheEvent::Updated(key.clone()));
        Ok(fresh)
    }

    async fn invalidate(&self, key: &QueryKey) -> Result<bool, DomainError> {
        let generation = self.bump_generation(key.as_str());
        let existed = self.mark_stale(key.as_str()).await;
        debug!(
            "Invalidated query key={} existed={} generation={}",
            key, existed, generation
        );

        self.publish(CacheEvent::Invalidated(key.clone()));
        Ok(existed)
    }

    fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }
}
