//! HTTP reachability probe.
//!
//! A connectivity-restored signal from the host is only trusted after
//! the sync endpoint actually answers; this avoids flapping online on
//! captive portals and false-positive radio signals.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::ports::ConnectivityProbe;

/// Probe that issues a lightweight request against the sync service.
pub struct HttpConnectivityProbe {
    client: Client,
    url: String,
}

impl HttpConnectivityProbe {
    /// Creates a probe against the service's health endpoint.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}/v1/health", base_url.into()),
        }
    }
}

#[async_trait]
impl ConnectivityProbe for HttpConnectivityProbe {
    async fn confirm_reachable(&self, within: Duration) -> bool {
        let request = self.client.head(&self.url).timeout(within).send();
        match tokio::time::timeout(within, request).await {
            Ok(Ok(response)) => {
                let reachable = !response.status().is_server_error();
                debug!(
                    target: "sahayak::sync",
                    status = %response.status(),
                    reachable,
                    "reachability probe answered"
                );
                reachable
            }
            Ok(Err(e)) => {
                debug!(target: "sahayak::sync", error = %e, "reachability probe failed");
                false
            }
            Err(_) => {
                debug!(
                    target: "sahayak::sync",
                    window_secs = within.as_secs(),
                    "reachability probe timed out"
                );
                false
            }
        }
    }
}
