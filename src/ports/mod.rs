//! Ports - async trait boundaries to infrastructure and external
//! collaborators.

mod business_advisor;
mod connectivity;
mod context_store;
mod offline_queue;
mod speech;
mod sync_endpoint;

pub use business_advisor::{BusinessAdvisor, GuidanceKind, GuidanceResponse};
pub use connectivity::ConnectivityProbe;
pub use context_store::ContextStore;
pub use offline_queue::OfflineQueue;
pub use speech::{AudioClip, SpeechOptions, SpeechToText, TextToSpeech, Transcript};
pub use sync_endpoint::{RemoteUpdates, SyncEndpoint, UploadReceipt};
