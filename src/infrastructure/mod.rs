//! Infrastructure layer - Implementations of domain traits

pub mod cache;
pub mod logging;
pub mod management_api;
pub mod notification;
pub mod services;

pub use cache::{InMemoryCacheConfig, InMemoryQueryCache};
pub use management_api::{ManagementApiClient, ManagementApiConfig};
pub use notification::ConsoleNotifier;
