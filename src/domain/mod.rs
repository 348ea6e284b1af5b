//! Domain layer - Core business logic and entities

pub mod api_key;
pub mod cache;
pub mod error;
pub mod notification;
pub mod project;

pub use api_key::{
    ApiKeyId, ApiKeyRecord, ApiKeyRepository, ApiKeyType, CreateApiKeyRequest,
    CreateApiKeyVariables, SecretJwtTemplate,
};
pub use cache::{CacheEvent, CachedEntry, QueryCache, QueryCacheExt, QueryKey};
pub use error::DomainError;
pub use notification::{Notification, NotificationLevel, Notifier};
pub use project::ProjectRef;
