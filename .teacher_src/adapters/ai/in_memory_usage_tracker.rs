//! In-memory usage tracker implementation.
//!
//! This adapter provides an in-memory implementation of the `UsageTracker` port.
//! Useful for:
//! - Development and testing environments
//! - Single-server deployments without persistence requirements
//! - Demonstration and prototyping
//!
//! For production deployments requiring persistence, use a PostgreSQL-backed
//! implementation instead.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{SessionId, Timestamp, UserId};
use crate::ports::{
    ProviderUsage, UsageLimitStatus, UsageRecord, UsageSummary, UsageTracker, UsageTrackerError,
};

/// In-memory implementation of the UsageTracker port.
///
/// Thread-safe via internal `Mutex`. Suitable for single-server deployments
/// or testing. Does not persist data across restarts.
///
/// # Example
///
/// ```ignore
/// let tracker = InMemoryUsageTracker::new();
///
/// // Record usage
/// tracker.record_usage(UsageRecord::new(
///     user_id,
///     session_id,
///     "openai",
///     "gpt-4",
///     100,
///     50,
///     15,
///     None,
/// )).await?;
///
/// // Check limits
/// let status = tracker.check_daily_limit(&user_id, 100).await?;
/// if status.is_blocked() {
///     // User has exceeded daily limit
/// }
/// ```
#[derive(Default)]
pub struct InMemoryUsageTracker {
    records: Mutex<Vec<UsageRecord>>,
}

impl InMemoryUsageTracker {
    /// Creates a new empty usage tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded usage records.
    ///
    /// Useful for testing and debugging.
    pub fn records(&self) -> Vec<UsageRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Clears all recorded usage.
    ///
    /// Useful for testing scenarios that need a clean slate.
    pub fn clear(&self) {
        self.records.lock().unwrap().clear();
    }

    /// Returns the total number of records.
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Returns true if no records exist.
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl UsageTracker for InMemoryUsageTracker {
    async fn record_usage(&self, record: UsageRecord) -> Result<(), UsageTrackerError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    async fn get_daily_cost(&self, user_id: &UserId) -> Result<u32, UsageTrackerError> {
        let records = self.records.lock().unwrap();
        let today_start = Timestamp::start_of_today();

        let total = records
            .iter()
            .filter(|r| &r.user_id == user_id && r.occurred_at >= today_start)
            .map(|r| r.cost_cents)
            .sum();
        Ok(total)
    }

    async fn get_session_cost(&self, session_id: SessionId) -> Result<u32, UsageTrackerError> {
        let records = self.records.lock().unwrap();
        let total = records
            .iter()
            .filter(|r| r.session_id == session_id)
            .map(|r| r.cost_cents)
            .sum();
        Ok(total)
    }

    async fn get_usage_summary(
        &self,
        user_id: &UserId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<UsageSummary, UsageTrackerError> {
        let records = self.records.lock().unwrap();
        let user_records: Vec<_> = records
            .iter()
            .filter(|r| &r.user_id == user_id && r.occurred_at >= from && r.occurred_at <= to)
            .collect();

        let mut by_provider: HashMap<String, (u32, u32, u32)> = HashMap::new();
        for record in &user_records {
            let entry = by_provider
                .entry(record.provider.clone())
                .or_insert((0, 0, 0));
            entry.0 += record.cost_cents;
            entry.1 += record.total_tokens();
            entry.2 += 1;
        }

        Ok(UsageSummary {
            total_cost_cents: user_records.iter().map(|r| r.cost_cents).sum(),
            total_tokens: user_records.iter().map(|r| r.total_tokens()).sum(),
            request_count: user_records.len() as u32,
            by_provider: by_provider
                .into_iter()
                .map(|(provider, (cost, tokens, requests))| ProviderUsage {
                    provider,
                    cost_cents: cost,
                    tokens,
                    requests,
                })
                .collect(),
        })
    }

    async fn check_daily_limit(
        &self,
        user_id: &UserId,
        limit_cents: u32,
    ) -> Result<UsageLimitStatus, UsageTrackerError> {
        let current = self.get_daily_cost(user_id).await?;
        Ok(UsageLimitStatus::from_usage(current, limit_cents))
    }

    async fn check_session_limit(
        &self,
        session_id: SessionId,
        limit_cents: u32,
    ) -> Result<UsageLimitStatus, UsageTrackerError> {
        let current = self.get_session_cost(session_id).await?;
        Ok(UsageLimitStatus::from_usage(current, limit_cents))
    }
}
