//! In-memory rate limiter implementation for testing and development.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap.
//! Not suitable for production multi-server deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::domain::membership::MembershipTier;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitScope,
    RateLimitStatus, RateLimiter,
};

use super::config::{RateLimitConfig, TierRateLimits};

/// In-memory rate limiter for testing and single-server deployments.
///
/// Uses a fixed-window counter algorithm. Each window tracks the count
/// of requests and resets when the window expires.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    /// Rate limit configuration.
    config: RateLimitConfig,
    /// Per-key window state.
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
    /// Default tier for users without explicit tier.
    default_tier: MembershipTier,
}

/// State for a single rate limit window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Number of requests in the current window.
    count: u32,
    /// When the current window started.
    window_start: u64,
    /// Window duration in seconds.
    window_secs: u32,
}

impl InMemoryRateLimiter {
    /// Create a new in-memory rate limiter with default configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
            default_tier: MembershipTier::Free,
        }
    }

    /// Create a rate limiter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    /// Set the default tier for users.
    pub fn with_default_tier(mut self, tier: MembershipTier) -> Self {
        self.default_tier = tier;
        self
    }

    /// Get the limit and window for a key.
    fn limits_for(&self, key: &RateLimitKey) -> (u32, u32) {
        match key.scope {
            RateLimitScope::Global => (self.config.global.requests_per_minute, 60),
            RateLimitScope::Ip => (self.config.per_ip.requests_per_minute, 60),
            RateLimitScope::User => {
                let tier_limits = self.config.limits_for_tier(self.default_tier);
                tier_limits.limit_for_resource(key.resource.as_deref())
            }
            RateLimitScope::Resource => {
                let resource = key.resource.as_deref().unwrap_or("default");
                self.config
                    .resources
                    .get(resource)
                    .map(|r| (r.requests_per_window, r.window_secs))
                    .unwrap_or((100, 60))
            }
        }
    }

    /// Get current timestamp as unix seconds.
    fn now_secs() -> u64 {
        Timestamp::now().as_unix_secs()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let redis_key = key.to_redis_key();
        let (limit, window_secs) = self.limits_for(&key);
        let now = Self::now_secs();

        let mut windows = self.windows.write().await;

        // Get or create window state
        let state = windows.entry(redis_key.clone()).or_insert_with(|| WindowState {
            count: 0,
            window_start: now,
            window_secs,
        });

        // Check if window has expired
        let window_end = state.window_start + state.window_secs as u64;
        if now >= window_end {
            // Reset window
            state.count = 0;
            state.window_start = now;
        }

        // Check limit
        if state.count >= limit {
            let retry_after = (state.window_start + state.window_secs as u64)
                .saturating_sub(now) as u32;

            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after.max(1),
                scope: key.scope,
                message: format!(
                    "Rate limit exceeded for {}. Retry after {} seconds.",
                    key.scope, retry_after
                ),
            }));
        }

        // Increment counter
        state.count += 1;
        let remaining = limit.saturating_sub(state.count);
        let reset_at = Timestamp::from_unix_secs(state.window_start + state.window_secs as u64);

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit,
            remaining,
            reset_at,
            window_secs,
        }))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let redis_key = key.to_redis_key();
        let (limit, window_secs) = self.limits_for(&key);
        let now = Self::now_secs();

        let windows = self.windows.read().await;

        let (count, window_start) = windows
            .get(&redis_key)
            .map(|state| {
                // Check if window is still valid
                let window_end = state.window_start + state.window_secs as u64;
                if now >= window_end {
                    (0, now) // Window expired
                } else {
                    (state.count, state.window_start)
                }
            })
            .unwrap_or((0, now));

        let remaining = limit.saturating_sub(count);
        let reset_at = Timestamp::from_unix_secs(window_start + window_secs as u64);

        Ok(RateLimitStatus {
            limit,
            remaining,
            reset_at,
            window_secs,
        })
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        let redis_key = key.to_redis_key();
        let mut windows = self.windows.write().await;
        windows.remove(&redis_key);
        Ok(())
    }
}

/// In-memory rate limiter with tier awareness.
///
/// Extends InMemoryRateLimiter to support per-user tier lookups.
#[derive(Debug)]
pub struct TierAwareRateLimiter {
    inner: InMemoryRateLimiter,
    /// User tier overrides for testing.
    user_tiers: Arc<RwLock<HashMap<String, MembershipTier>>>,
}

impl TierAwareRateLimiter {
    /// Create a new tier-aware rate limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            inner: InMemoryRateLimiter::new(config),
            user_tiers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Set a user's tier for testing.
    pub async fn set_user_tier(&self, user_id: &str, tier: MembershipTier) {
        let mut tiers = self.user_tiers.write().await;
        tiers.insert(user_id.to_string(), tier);
    }

    /// Get a user's tier.
    pub async fn get_user_tier(&self, user_id: &str) -> MembershipTier {
        let tiers = self.user_tiers.read().await;
        tiers.get(user_id).copied().unwrap_or(MembershipTier::Free)
    }

    /// Get tier-specific limits for a user.
    pub async fn limits_for_user(&self, user_id: &str) -> &TierRateLimits {
        let tier = self.get_user_tier(user_id).await;
        self.inner.config.limits_for_tier(tier)
    }
}

#[async_trait]
impl RateLimiter for TierAwareRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        self.inner.check(key).await
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        self.inner.status(key).await
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        self.inner.reset(key).await
    }
}
