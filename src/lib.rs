//! API Key Console
//!
//! Client-side management of a project's API keys:
//! - Cached key list with invalidation-driven refresh
//! - Secret key creation form with role validation and RLS warning
//! - Typed Management API client

pub mod cli;
pub mod config;
pub mod console;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use console::ConsoleState;
use domain::notification::Notifier;
use domain::DomainError;
use infrastructure::{InMemoryQueryCache, ManagementApiClient};
use tracing::info;

/// Create the console state backed by the Management API
pub fn create_console_state(
    config: &AppConfig,
    notifier: Arc<dyn Notifier>,
) -> Result<ConsoleState, DomainError> {
    let client = ManagementApiClient::new(config.api.to_client_config())?;
    let cache = InMemoryQueryCache::with_config(config.cache.to_cache_config());

    info!("Management API: {}", config.api.base_url);

    Ok(ConsoleState::new(Arc::new(client), Arc::new(cache), notifier))
}
