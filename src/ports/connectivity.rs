//! Connectivity probe port.
//!
//! Connectivity-change events are delivered to the Sync Coordinator by
//! the host platform; this port only confirms actual reachability so a
//! false-positive signal does not flip the device online.

use async_trait::async_trait;
use std::time::Duration;

/// Reachability confirmation for the sync endpoint.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Returns true if the endpoint answered within the window.
    ///
    /// Never errors: an unreachable endpoint is simply `false`.
    async fn confirm_reachable(&self, within: Duration) -> bool;
}
