//! Cache infrastructure - Query cache implementations

mod in_memory;

pub use in_memory::{InMemoryCacheConfig, InMemoryQueryCache};
