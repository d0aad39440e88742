//! HTTP Business Advisor - client for the remote guidance service.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpAdvisorConfig::new(api_key)
//!     .with_base_url("https://advisor.sahayak.example")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let advisor = HttpBusinessAdvisor::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::domain::context::SessionContext;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{BusinessAdvisor, GuidanceKind, GuidanceResponse};

/// Configuration for the HTTP advisor client.
#[derive(Debug, Clone)]
pub struct HttpAdvisorConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the guidance service.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl HttpAdvisorConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://advisor.sahayak.example".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// HTTP implementation of the Business Advisor port.
pub struct HttpBusinessAdvisor {
    config: HttpAdvisorConfig,
    client: Client,
}

impl HttpBusinessAdvisor {
    /// Creates a new advisor client with the given configuration.
    pub fn new(config: HttpAdvisorConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn guidance_url(&self) -> String {
        format!("{}/v1/guidance", self.config.base_url)
    }

    /// Projects the session into the compact context the service needs;
    /// conversation history is summarized to the last few turns only.
    fn to_request(&self, context: &SessionContext, utterance: &str) -> GuidanceRequest {
        let recent: Vec<String> = context
            .conversation_history()
            .iter()
            .rev()
            .take(6)
            .rev()
            .map(|m| m.content().to_string())
            .collect();
        GuidanceRequest {
            utterance: utterance.to_string(),
            business_type: context.business_type().map(|s| s.value.clone()),
            location: context.location().resolved().map(str::to_string),
            landmarks: context.location().landmarks().iter().cloned().collect(),
            operating_conditions: context.operating_conditions().map(|s| s.value.clone()),
            recent_turns: recent,
        }
    }
}

#[async_trait]
impl BusinessAdvisor for HttpBusinessAdvisor {
    async fn generate_guidance(
        &self,
        context: &SessionContext,
        utterance: &str,
    ) -> Result<GuidanceResponse, DomainError> {
        let request = self.to_request(context, utterance);
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                sleep(Duration::from_millis(200 * 2u64.pow(attempt - 1))).await;
            }

            let sent = self
                .client
                .post(self.guidance_url())
                .bearer_auth(self.config.api_key())
                .json(&request)
                .send()
                .await;

            match sent {
                Ok(response) if response.status().is_success() => {
                    let body: GuidanceBody = response.json().await.map_err(|e| {
                        DomainError::new(
                            ErrorCode::AdvisorError,
                            format!("Malformed advisor response: {}", e),
                        )
                    })?;
                    return Ok(GuidanceResponse::new(body.text, body.kind, body.confidence));
                }
                Ok(response) if response.status().is_server_error() => {
                    warn!(
                        target: "sahayak::advisor",
                        status = %response.status(),
                        attempt,
                        "advisor returned server error"
                    );
                    last_error = Some(DomainError::new(
                        ErrorCode::AdvisorError,
                        format!("Advisor error: {}", response.status()),
                    ));
                }
                Ok(response) => {
                    // client errors are not retryable
                    return Err(DomainError::new(
                        ErrorCode::AdvisorError,
                        format!("Advisor rejected request: {}", response.status()),
                    ));
                }
                Err(e) => {
                    warn!(
                        target: "sahayak::advisor",
                        error = %e,
                        attempt,
                        "advisor request failed"
                    );
                    last_error = Some(DomainError::new(
                        ErrorCode::AdvisorError,
                        format!("Advisor unreachable: {}", e),
                    ));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DomainError::new(ErrorCode::AdvisorError, "Advisor retries exhausted")
        }))
    }
}

#[derive(Debug, Serialize)]
struct GuidanceRequest {
    utterance: String,
    business_type: Option<String>,
    location: Option<String>,
    landmarks: Vec<String>,
    operating_conditions: Option<String>,
    recent_turns: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GuidanceBody {
    text: String,
    #[serde(default = "default_kind")]
    kind: GuidanceKind,
    #[serde(default = "default_confidence")]
    confidence: f64,
}

fn default_kind() -> GuidanceKind {
    GuidanceKind::General
}

fn default_confidence() -> f64 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DeviceTag, SessionId, UserId};

    #[test]
    fn config_builder_sets_fields() {
        let config = HttpAdvisorConfig::new("key-1")
            .with_base_url("http://localhost:9000")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(1);
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn request_projection_uses_resolved_location() {
        let advisor = HttpBusinessAdvisor::new(HttpAdvisorConfig::new("key-1"));
        let context = SessionContext::new(
            SessionId::mint(&DeviceTag::local()),
            UserId::new("vendor-1").unwrap(),
        );
        let request = advisor.to_request(&context, "how do I grow");
        assert_eq!(request.utterance, "how do I grow");
        assert!(request.business_type.is_none());
        assert!(request.location.is_none());
    }

    #[test]
    fn guidance_body_defaults_missing_fields() {
        let body: GuidanceBody = serde_json::from_str(r#"{"text": "stock up"}"#).unwrap();
        assert_eq!(body.kind, GuidanceKind::General);
        assert!((body.confidence - 0.5).abs() < f64::EPSILON);
    }
}
