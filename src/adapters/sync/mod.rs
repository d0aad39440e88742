//! Sync boundary adapters - endpoint client and reachability probe.

mod http_endpoint;
mod probe;

pub use http_endpoint::{HttpSyncEndpoint, HttpSyncEndpointConfig};
pub use probe::HttpConnectivityProbe;
