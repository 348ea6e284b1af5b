//! Query cache domain - keyed client-side state with explicit invalidation

mod key;
mod repository;

pub use key::QueryKey;
pub use repository::{CacheEvent, CachedEntry, QueryCache, QueryCacheExt, RawEntry};
