//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FeatureFlags {
    /// Enable WebSocket streaming for conversations
    #[serde(default)]
    pub enable_streaming: bool,

    /// Enable AI fallback provider on primary failure
    #[serde(default)]
    pub enable_ai_fallback: bool,

    /// Show detailed error messages (disable in production!)
    #[serde(default)]
    pub verbose_errors: bool,

    /// Enable request tracing
    #[serde(default = "default_enable_tracing")]
    pub enable_tracing: bool,
}

fn default_enable_tracing() -> bool {
    true
}
