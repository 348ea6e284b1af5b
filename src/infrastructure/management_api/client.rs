use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::{request_error, transport_error};
use crate::domain::api_key::{ApiKeyRecord, ApiKeyRepository, CreateApiKeyRequest};
use crate::domain::project::ProjectRef;
use crate::domain::DomainError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Connection settings for the management API
#[derive(Debug, Clone)]
pub struct ManagementApiConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl Default for ManagementApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.supabase.com".to_string(),
            access_token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl ManagementApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `ApiKeyRepository` backed by the management API over HTTP
#[derive(Debug, Clone)]
pub struct ManagementApiClient {
    client: Client,
    config: ManagementApiConfig,
}

impl ManagementApiClient {
    pub fn new(config: ManagementApiConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn api_keys_url(&self, project: &ProjectRef) -> String {
        format!(
            "{}/v1/projects/{}/api-keys",
            self.config.base_url.trim_end_matches('/'),
            project
        )
    }

    fn authorize(&self, request: RequestBuilder, request_id: &str) -> RequestBuilder {
        let request = request.header(REQUEST_ID_HEADER, request_id);

        match &self.config.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        request_id: &str,
    ) -> Result<T, DomainError> {
        let response = request.send().await.map_err(|e| {
            warn!("Management API request {} failed: {}", request_id, e);
            transport_error(e)
        })?;

        Self::parse(response, request_id).await
    }

    async fn parse<T: DeserializeOwned>(
        response: Response,
        request_id: &str,
    ) -> Result<T, DomainError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "Management API request {} returned {}: {}",
                request_id, status, body
            );
            return Err(request_error(status, &body));
        }

        response.json().await.map_err(|e| {
            DomainError::request(
                Some(status.as_u16()),
                format!("Failed to parse response: {}", e),
            )
        })
    }
}

#[async_trait]
impl ApiKeyRepository for ManagementApiClient {
    async fn list(&self, project: &ProjectRef) -> Result<Vec<ApiKeyRecord>, DomainError> {
        let request_id = Uuid::new_v4().to_string();
        debug!("Listing API keys: project={} request_id={}", project, request_id);

        let request = self.authorize(self.client.get(self.api_keys_url(project)), &request_id);
        self.send(request, &request_id).await
    }

    async fn create(
        &self,
        project: &ProjectRef,
        request: &CreateApiKeyRequest,
    ) -> Result<ApiKeyRecord, DomainError> {
        let request_id = Uuid::new_v4().to_string();
        info!(
            "Creating {} API key: project={} request_id={}",
            request.key_type(),
            project,
            request_id
        );

        let http_request = self
            .authorize(self.client.post(self.api_keys_url(project)), &request_id)
            .json(request);
        let created: ApiKeyRecord = self.send(http_request, &request_id).await?;

        info!("API key created: project={} id={}", project, created.id());
        Ok(created)
    }
}
