use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::cache::InMemoryCacheConfig;
use crate::infrastructure::management_api::ManagementApiConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub cache: CacheSettings,
    pub logging: LoggingConfig,
}

/// Management API connection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

/// Client-side query cache
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub max_capacity: u64,
    pub ttl_secs: u64,
    pub event_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.supabase.com".to_string(),
            access_token: None,
            timeout_secs: 30,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            ttl_secs: 300,
            event_capacity: 64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl ApiConfig {
    pub fn to_client_config(&self) -> ManagementApiConfig {
        let mut config = ManagementApiConfig::new(&self.base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs));

        if let Some(token) = self.access_token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_access_token(token);
        }

        config
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> InMemoryCacheConfig {
        InMemoryCacheConfig::default()
            .with_max_capacity(self.max_capacity)
            .with_time_to_live(Duration::from_secs(self.ttl_secs))
            .with_event_capacity(self.event_capacity)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.api.base_url, "https://api.supabase.com");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_source_fills_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("api.base_url", "http://localhost:54321")
            .unwrap()
            .set_override("logging.format", "json")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api.base_url, "http://localhost:54321");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.cache.max_capacity, 1_000);
    }

    #[test]
    fn test_client_config_skips_blank_token() {
        let api = ApiConfig {
            access_token: Some(String::new()),
            ..ApiConfig::default()
        };
        assert!(api.to_client_config().access_token.is_none());

        let api = ApiConfig {
            access_token: Some("sbp_x".to_string()),
            timeout_secs: 5,
            ..ApiConfig::default()
        };
        let client = api.to_client_config();
        assert_eq!(client.access_token.as_deref(), Some("sbp_x"));
        assert_eq!(client.timeout, Duration::from_secs(5));
    }
}
