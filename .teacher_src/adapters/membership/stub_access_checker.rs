//! Stub implementation of AccessChecker for development and testing.
//!
//! This adapter always grants access and returns unlimited tier limits.
//! Replace with a real implementation (e.g., PostgresAccessChecker) for production.
//!
//! # Usage
//!
//! ```ignore
//! use choice_sherpa::adapters::membership::StubAccessChecker;
//!
//! let checker = StubAccessChecker::new();
//! // Or with a specific tier:
//! let checker = StubAccessChecker::with_tier(MembershipTier::Monthly);
//! ```

use crate::domain::foundation::{DomainError, SessionId, UserId};
use crate::domain::membership::{MembershipTier, TierLimits};
use crate::ports::{AccessChecker, AccessDeniedReason, AccessResult, UsageStats};
use async_trait::async_trait;

/// Stub AccessChecker that always grants access.
///
/// For development and testing purposes only.
/// Always returns `AccessResult::Allowed` and configurable tier limits.
#[derive(Debug, Clone)]
pub struct StubAccessChecker {
    /// The tier to simulate for all users.
    tier: MembershipTier,
    /// Whether to simulate denied access for testing.
    deny_access: bool,
    /// Simulated usage stats.
    usage: UsageStats,
}

impl Default for StubAccessChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl StubAccessChecker {
    /// Create a new stub that always allows access with Annual tier.
    pub fn new() -> Self {
        Self {
            tier: MembershipTier::Annual,
            deny_access: false,
            usage: UsageStats::new(),
        }
    }

    /// Create a stub with a specific tier.
    pub fn with_tier(tier: MembershipTier) -> Self {
        Self {
            tier,
            deny_access: false,
            usage: UsageStats::new(),
        }
    }

    /// Create a stub that denies all access (for testing denial flows).
    pub fn denying() -> Self {
        Self {
            tier: MembershipTier::Free,
            deny_access: true,
            usage: UsageStats::new(),
        }
    }

    /// Set simulated usage statistics.
    pub fn with_usage(mut self, usage: UsageStats) -> Self {
        self.usage = usage;
        self
    }

    /// Set the tier for this stub.
    pub fn set_tier(&mut self, tier: MembershipTier) {
        self.tier = tier;
    }

    /// Set whether to deny access.
    pub fn set_deny_access(&mut self, deny: bool) {
        self.deny_access = deny;
    }
}

#[async_trait]
impl AccessChecker for StubAccessChecker {
    async fn can_create_session(&self, _user_id: &UserId) -> Result<AccessResult, DomainError> {
        if self.deny_access {
            return Ok(AccessResult::Denied(AccessDeniedReason::NoMembership));
        }

        let limits = TierLimits::for_tier(self.tier);
        if !limits.can_create_session(self.usage.active_sessions) {
            return Ok(AccessResult::Denied(AccessDeniedReason::SessionLimitReached {
                current: self.usage.active_sessions,
                max: limits.max_active_sessions.unwrap_or(0),
            }));
        }

        Ok(AccessResult::Allowed)
    }

    async fn can_create_cycle(
        &self,
        _user_id: &UserId,
        _session_id: &SessionId,
    ) -> Result<AccessResult, DomainError> {
        if self.deny_access {
            return Ok(AccessResult::Denied(AccessDeniedReason::NoMembership));
        }

        // For stub, always allow cycles (real impl would check per-session count)
        Ok(AccessResult::Allowed)
    }

    async fn can_export(&self, _user_id: &UserId) -> Result<AccessResult, DomainError> {
        if self.deny_access {
            return Ok(AccessResult::Denied(AccessDeniedReason::NoMembership));
        }

        let limits = TierLimits::for_tier(self.tier);
        if !limits.can_export_pdf() {
            return Ok(AccessResult::Denied(AccessDeniedReason::FeatureNotIncluded {
                feature: "Export".to_string(),
                required_tier: MembershipTier::Monthly,
            }));
        }

        Ok(AccessResult::Allowed)
    }

    async fn get_tier_limits(&self, _user_id: &UserId) -> Result<TierLimits, DomainError> {
        Ok(TierLimits::for_tier(self.tier))
    }

    async fn get_usage(&self, _user_id: &UserId) -> Result<UsageStats, DomainError> {
        Ok(self.usage.clone())
    }
}
