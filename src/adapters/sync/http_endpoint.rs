//! HTTP sync endpoint - upload/download client for the remote sync
//! service.
//!
//! Transport failures map to `Unreachable` (the coordinator releases the
//! in-flight batch and drops offline); protocol failures map to
//! `SyncFailed` (the attempt counts against the retry budget).

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::context::SyncCursor;
use crate::domain::foundation::{DeviceTag, DomainError, ErrorCode, ItemId, UserId};
use crate::domain::sync::QueuedItem;
use crate::ports::{RemoteUpdates, SyncEndpoint, UploadReceipt};

/// Configuration for the HTTP sync endpoint client.
#[derive(Debug, Clone)]
pub struct HttpSyncEndpointConfig {
    /// API key for authentication, if the service requires one.
    api_key: Option<Secret<String>>,
    /// Base URL of the sync service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl HttpSyncEndpointConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// HTTP implementation of the sync endpoint port.
pub struct HttpSyncEndpoint {
    config: HttpSyncEndpointConfig,
    client: Client,
}

impl HttpSyncEndpoint {
    /// Creates a new client with the given configuration.
    pub fn new(config: HttpSyncEndpointConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn upload_url(&self) -> String {
        format!("{}/v1/sync/upload", self.config.base_url)
    }

    fn updates_url(&self) -> String {
        format!("{}/v1/sync/updates", self.config.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key.expose_secret()),
            None => request,
        }
    }
}

fn transport_err(e: reqwest::Error) -> DomainError {
    if e.is_timeout() || e.is_connect() {
        DomainError::new(ErrorCode::Unreachable, format!("Sync endpoint unreachable: {}", e))
    } else {
        DomainError::new(ErrorCode::SyncFailed, format!("Sync request failed: {}", e))
    }
}

#[async_trait]
impl SyncEndpoint for HttpSyncEndpoint {
    async fn upload(&self, batch: &[QueuedItem]) -> Result<UploadReceipt, DomainError> {
        let response = self
            .authorize(self.client.post(self.upload_url()))
            .json(&UploadRequest { items: batch })
            .send()
            .await
            .map_err(transport_err)?;

        if !response.status().is_success() {
            return Err(DomainError::new(
                ErrorCode::SyncFailed,
                format!("Upload rejected: {}", response.status()),
            ));
        }

        let body: UploadBody = response.json().await.map_err(|e| {
            DomainError::new(
                ErrorCode::SyncFailed,
                format!("Malformed upload receipt: {}", e),
            )
        })?;

        let assigned_device_tag = match body.assigned_device_tag {
            Some(tag) => Some(DeviceTag::assigned(tag).map_err(DomainError::from)?),
            None => None,
        };
        Ok(UploadReceipt {
            accepted: body.accepted,
            rejected: body.rejected,
            assigned_device_tag,
        })
    }

    async fn download_updates(
        &self,
        user_id: &UserId,
        since: Option<&SyncCursor>,
    ) -> Result<RemoteUpdates, DomainError> {
        let response = self
            .authorize(self.client.post(self.updates_url()))
            .json(&UpdatesRequest {
                user_id: user_id.as_str(),
                since: since.map(|c| c.token()),
            })
            .send()
            .await
            .map_err(transport_err)?;

        if !response.status().is_success() {
            return Err(DomainError::new(
                ErrorCode::SyncFailed,
                format!("Download rejected: {}", response.status()),
            ));
        }

        response.json().await.map_err(|e| {
            DomainError::new(
                ErrorCode::SyncFailed,
                format!("Malformed updates payload: {}", e),
            )
        })
    }
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    items: &'a [QueuedItem],
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    #[serde(default)]
    accepted: Vec<ItemId>,
    #[serde(default)]
    rejected: Vec<ItemId>,
    assigned_device_tag: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdatesRequest<'a> {
    user_id: &'a str,
    since: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_sets_fields() {
        let config = HttpSyncEndpointConfig::new("http://localhost:9100")
            .with_api_key("key-1")
            .with_timeout(Duration::from_secs(10));
        assert_eq!(config.base_url, "http://localhost:9100");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn upload_body_tolerates_missing_lists() {
        let body: UploadBody = serde_json::from_str(r#"{}"#).unwrap();
        assert!(body.accepted.is_empty());
        assert!(body.rejected.is_empty());
        assert!(body.assigned_device_tag.is_none());
    }
}
