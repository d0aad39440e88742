//! Adapters - implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - in-memory store and queue (tests, dev harness)
//! - `sqlite` - on-device durable store and queue
//! - `advisor` - Business Advisor clients (HTTP, canned)
//! - `sync` - sync endpoint client and reachability probe
//! - `speech` - speech boundary placeholders

pub mod advisor;
pub mod memory;
pub mod speech;
pub mod sqlite;
pub mod sync;

pub use advisor::{CannedAdvisor, HttpAdvisorConfig, HttpBusinessAdvisor};
pub use memory::{InMemoryContextStore, InMemoryOfflineQueue};
pub use speech::UnavailableSpeech;
pub use sqlite::{SqliteContextStore, SqliteOfflineQueue};
pub use sync::{HttpConnectivityProbe, HttpSyncEndpoint, HttpSyncEndpointConfig};
