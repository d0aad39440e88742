//! Sync Coordinator - drains the Offline Queue across the network
//! boundary and folds server updates back into the Context Store.
//!
//! The coordinator is the sole writer that crosses the online/offline
//! boundary. It owns the per-device state machine (`Offline`,
//! `Detecting`, `Syncing`, `Idle`), the retry/backoff schedule, and the
//! cursor-guarded download path. Server updates are merged through the
//! same Context Merger the live dialogue path uses, so conflict
//! resolution cannot drift between the two.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use super::{SyncErrorSummary, SyncStatus, SyncStatusBoard};
use crate::application::device::DeviceIdentity;
use crate::application::session_locks::SessionLocks;
use crate::domain::context::{ContextMerger, ContextPatch, SyncCursor, UserProfile};
use crate::domain::foundation::{DomainError, ErrorCode, ItemId, SessionStatus, UserId};
use crate::domain::sync::{BackoffSchedule, QueuedItem, SyncState};
use crate::ports::{ConnectivityProbe, ContextStore, OfflineQueue, SyncEndpoint};

/// Tunables carried from configuration.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Window for confirming reachability before declaring online.
    pub probe_window: Duration,
    /// Retry schedule for batch uploads.
    pub schedule: BackoffSchedule,
    /// Maximum items per uploaded batch.
    pub batch_size: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            probe_window: Duration::from_secs(5),
            schedule: BackoffSchedule::default(),
            batch_size: 10,
        }
    }
}

/// What one sync cycle accomplished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: usize,
    pub dead_lettered: usize,
    pub downloaded: usize,
    /// True when the cycle was cut short by connectivity loss.
    pub interrupted: bool,
}

/// Per-device sync state machine over the queue and store ports.
pub struct SyncCoordinator {
    user_id: UserId,
    store: Arc<dyn ContextStore>,
    queue: Arc<dyn OfflineQueue>,
    endpoint: Arc<dyn SyncEndpoint>,
    probe: Arc<dyn ConnectivityProbe>,
    device: Arc<DeviceIdentity>,
    locks: Arc<SessionLocks>,
    board: Arc<SyncStatusBoard>,
    merger: ContextMerger,
    settings: SyncSettings,
}

impl SyncCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: UserId,
        store: Arc<dyn ContextStore>,
        queue: Arc<dyn OfflineQueue>,
        endpoint: Arc<dyn SyncEndpoint>,
        probe: Arc<dyn ConnectivityProbe>,
        device: Arc<DeviceIdentity>,
        locks: Arc<SessionLocks>,
        board: Arc<SyncStatusBoard>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            user_id,
            store,
            queue,
            endpoint,
            probe,
            device,
            locks,
            board,
            merger: ContextMerger::new(),
            settings,
        }
    }

    /// Returns the current coordinator state.
    pub fn state(&self) -> SyncState {
        self.board.state()
    }

    /// Handles a host connectivity-change signal.
    ///
    /// A restored signal is only trusted after the reachability probe
    /// answers within the configured window; a lost signal drops the
    /// device to offline from any state.
    pub async fn on_connectivity_changed(
        &self,
        connected: bool,
    ) -> Result<SyncReport, DomainError> {
        if !connected {
            self.board.transition(SyncState::Offline);
            info!(target: "sahayak::sync", "connectivity lost");
            return Ok(SyncReport::default());
        }

        if self.board.state() != SyncState::Offline {
            // already detecting, syncing, or idle
            return Ok(SyncReport::default());
        }
        self.board.transition(SyncState::Detecting);

        if !self.probe.confirm_reachable(self.settings.probe_window).await {
            warn!(
                target: "sahayak::sync",
                window_secs = self.settings.probe_window.as_secs(),
                "connectivity signal did not survive the reachability probe"
            );
            self.board.transition(SyncState::Offline);
            return Ok(SyncReport::default());
        }

        self.run_cycle().await
    }

    /// Kicks a new cycle when items arrive while the device is idle.
    pub async fn poke(&self) -> Result<SyncReport, DomainError> {
        if self.board.state() != SyncState::Idle {
            return Ok(SyncReport::default());
        }
        self.run_cycle().await
    }

    /// Read-only status projection for the UI.
    pub async fn status(&self) -> Result<SyncStatus, DomainError> {
        let state = self.board.state();
        Ok(SyncStatus {
            is_online: state.is_online(),
            is_syncing: state.is_syncing(),
            pending_items: self.queue.pending_count().await?,
            dead_lettered: self.queue.dead_lettered().await?.len(),
            last_sync: self.board.last_sync(),
        })
    }

    /// Summary of items that exhausted their retry budget.
    pub async fn error_summary(&self) -> Result<SyncErrorSummary, DomainError> {
        Ok(SyncErrorSummary {
            items: self.queue.dead_lettered().await?,
        })
    }

    /// One full cycle: drain uploads, apply downloads, go idle.
    async fn run_cycle(&self) -> Result<SyncReport, DomainError> {
        self.board.transition(SyncState::Syncing);
        let mut report = SyncReport::default();

        if !self.drain_queue(&mut report).await? {
            // connectivity fell over mid-drain; in-flight items were
            // released back to pending for the next cycle
            self.board.transition(SyncState::Offline);
            report.interrupted = true;
            return Ok(report);
        }

        match self.apply_remote_updates(&mut report).await {
            Ok(()) => {}
            Err(err) if err.is(ErrorCode::Unreachable) => {
                self.board.transition(SyncState::Offline);
                report.interrupted = true;
                return Ok(report);
            }
            Err(err) => return Err(err),
        }

        self.board.transition(SyncState::Idle);
        self.board.record_sync_completed();
        info!(
            target: "sahayak::sync",
            uploaded = report.uploaded,
            dead_lettered = report.dead_lettered,
            downloaded = report.downloaded,
            "sync cycle complete"
        );
        Ok(report)
    }

    /// Drains the queue in batches, oldest first. Returns false when the
    /// endpoint became unreachable mid-drain.
    async fn drain_queue(&self, report: &mut SyncReport) -> Result<bool, DomainError> {
        loop {
            let batch = self.queue.dequeue_batch(self.settings.batch_size).await?;
            if batch.is_empty() {
                return Ok(true);
            }

            match self.endpoint.upload(&batch).await {
                Ok(receipt) => {
                    if let Some(tag) = receipt.assigned_device_tag {
                        self.device.adopt(tag);
                    }
                    if !receipt.accepted.is_empty() {
                        self.queue.acknowledge(&receipt.accepted).await?;
                        report.uploaded += receipt.accepted.len();
                    }
                    if !receipt.rejected.is_empty() {
                        self.handle_failed(&batch, &receipt.rejected, report).await?;
                    }
                }
                Err(err) if err.is(ErrorCode::Unreachable) => {
                    // the batch never reached the server: release without
                    // counting an attempt
                    let ids: Vec<ItemId> = batch.iter().map(|i| i.id).collect();
                    self.queue.release(&ids).await?;
                    warn!(
                        target: "sahayak::sync",
                        batch_len = ids.len(),
                        "endpoint unreachable mid-drain, releasing batch"
                    );
                    return Ok(false);
                }
                Err(err) => {
                    // protocol-level failure: the attempt counts for the
                    // whole batch
                    warn!(
                        target: "sahayak::sync",
                        error = %err,
                        batch_len = batch.len(),
                        "batch upload failed"
                    );
                    let ids: Vec<ItemId> = batch.iter().map(|i| i.id).collect();
                    self.handle_failed(&batch, &ids, report).await?;
                }
            }
        }
    }

    /// Requeues failed items with backoff, dead-lettering the ones whose
    /// retry budget is exhausted. Failed items do not block the rest of
    /// the queue: the next `dequeue_batch` proceeds after the delay.
    async fn handle_failed(
        &self,
        batch: &[QueuedItem],
        failed: &[ItemId],
        report: &mut SyncReport,
    ) -> Result<(), DomainError> {
        let mut retry: Vec<ItemId> = Vec::new();
        let mut exhausted: Vec<ItemId> = Vec::new();
        let mut next_attempt = 0u32;

        for item in batch.iter().filter(|i| failed.contains(&i.id)) {
            let failures = item.retry_count + 1;
            if self.settings.schedule.is_exhausted(failures) {
                exhausted.push(item.id);
            } else {
                retry.push(item.id);
                next_attempt = next_attempt.max(failures);
            }
        }

        if !retry.is_empty() {
            self.queue.requeue(&retry).await?;
        }
        if !exhausted.is_empty() {
            // record the final failed attempt, then park for inspection
            self.queue.requeue(&exhausted).await?;
            self.queue.dead_letter(&exhausted).await?;
            report.dead_lettered += exhausted.len();
            for id in &exhausted {
                warn!(
                    target: "sahayak::sync",
                    item_id = %id,
                    attempts = self.settings.schedule.max_attempts(),
                    "item exhausted its retry budget, dead-lettered"
                );
            }
        }

        if let Some(delay) = self.settings.schedule.delay_before_retry(next_attempt) {
            sleep(delay).await;
        }
        Ok(())
    }

    /// Downloads updates since the persisted cursor and merges them into
    /// the store through the shared Context Merger.
    async fn apply_remote_updates(&self, report: &mut SyncReport) -> Result<(), DomainError> {
        let cursor = self.store.get_sync_cursor(&self.user_id).await?;
        let updates = match self
            .endpoint
            .download_updates(&self.user_id, cursor.as_ref())
            .await
        {
            Ok(updates) => updates,
            Err(err) if err.is(ErrorCode::Unreachable) => return Err(err),
            Err(err) => {
                // protocol failure: skip this download, keep the cursor so
                // the next cycle retries from the same watermark
                warn!(
                    target: "sahayak::sync",
                    error = %err,
                    "download failed, keeping cursor"
                );
                return Ok(());
            }
        };

        for update in &updates.updates {
            let _guard = self.locks.acquire(&update.session_id).await;
            let Some(existing) = self.store.get_session_context(&update.session_id).await?
            else {
                warn!(
                    target: "sahayak::sync",
                    session_id = %update.session_id,
                    "server update for unknown session, skipping"
                );
                continue;
            };
            if existing.status() == SessionStatus::Closed {
                continue;
            }

            let outcome = self.merger.merge(&existing, update);
            let patch = ContextPatch {
                business_type: outcome.context.business_type().cloned(),
                location: Some(outcome.context.location().clone()),
                operating_conditions: outcome.context.operating_conditions().cloned(),
                preferences: Some(outcome.context.preferences().clone()),
                ..ContextPatch::default()
            };
            self.store.update_context(&update.session_id, patch).await?;
            report.downloaded += 1;
        }

        if let Some(remote_profile) = &updates.profile {
            let mut profile = self
                .store
                .get_user_profile(&self.user_id)
                .await?
                .unwrap_or_else(|| UserProfile::new(self.user_id.clone()));
            self.merger.merge_profiles(&mut profile, remote_profile);
            self.store.put_user_profile(&profile).await?;
        }

        self.store
            .put_sync_cursor(&SyncCursor::new(
                self.user_id.clone(),
                updates.next_cursor.clone(),
            ))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryContextStore, InMemoryOfflineQueue};
    use crate::domain::foundation::{DeviceTag, SessionId};
    use crate::domain::sync::{ItemKind, NewQueuedItem};
    use crate::ports::{RemoteUpdates, UploadReceipt};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Endpoint scripted with per-call upload verdicts.
    struct ScriptedEndpoint {
        verdicts: Mutex<Vec<UploadVerdict>>,
        uploads: Mutex<Vec<Vec<QueuedItem>>>,
        updates: RemoteUpdates,
    }

    enum UploadVerdict {
        AcceptAll,
        RejectAll,
        Unreachable,
    }

    impl ScriptedEndpoint {
        fn new(verdicts: Vec<UploadVerdict>) -> Self {
            Self {
                verdicts: Mutex::new(verdicts),
                uploads: Mutex::new(Vec::new()),
                updates: RemoteUpdates {
                    updates: Vec::new(),
                    profile: None,
                    next_cursor: "cursor-1".to_string(),
                },
            }
        }

        fn uploads(&self) -> Vec<Vec<QueuedItem>> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SyncEndpoint for ScriptedEndpoint {
        async fn upload(&self, batch: &[QueuedItem]) -> Result<UploadReceipt, DomainError> {
            self.uploads.lock().unwrap().push(batch.to_vec());
            let verdict = {
                let mut verdicts = self.verdicts.lock().unwrap();
                if verdicts.is_empty() {
                    UploadVerdict::AcceptAll
                } else {
                    verdicts.remove(0)
                }
            };
            match verdict {
                UploadVerdict::AcceptAll => Ok(UploadReceipt {
                    accepted: batch.iter().map(|i| i.id).collect(),
                    rejected: Vec::new(),
                    assigned_device_tag: None,
                }),
                UploadVerdict::RejectAll => Ok(UploadReceipt {
                    accepted: Vec::new(),
                    rejected: batch.iter().map(|i| i.id).collect(),
                    assigned_device_tag: None,
                }),
                UploadVerdict::Unreachable => Err(DomainError::new(
                    ErrorCode::Unreachable,
                    "endpoint unreachable",
                )),
            }
        }

        async fn download_updates(
            &self,
            _user_id: &UserId,
            _since: Option<&SyncCursor>,
        ) -> Result<RemoteUpdates, DomainError> {
            Ok(self.updates.clone())
        }
    }

    struct AlwaysReachable;

    #[async_trait]
    impl ConnectivityProbe for AlwaysReachable {
        async fn confirm_reachable(&self, _within: Duration) -> bool {
            true
        }
    }

    struct NeverReachable;

    #[async_trait]
    impl ConnectivityProbe for NeverReachable {
        async fn confirm_reachable(&self, _within: Duration) -> bool {
            false
        }
    }

    fn fast_settings() -> SyncSettings {
        SyncSettings {
            probe_window: Duration::from_millis(10),
            schedule: BackoffSchedule::new(Duration::from_millis(1), 3),
            batch_size: 10,
        }
    }

    fn coordinator(
        endpoint: Arc<ScriptedEndpoint>,
        probe: Arc<dyn ConnectivityProbe>,
        queue: Arc<InMemoryOfflineQueue>,
    ) -> SyncCoordinator {
        SyncCoordinator::new(
            UserId::new("vendor-1").unwrap(),
            Arc::new(InMemoryContextStore::new()),
            queue,
            endpoint,
            probe,
            Arc::new(DeviceIdentity::new()),
            Arc::new(SessionLocks::new()),
            Arc::new(SyncStatusBoard::new()),
            fast_settings(),
        )
    }

    fn text_item() -> NewQueuedItem {
        NewQueuedItem::new(
            ItemKind::Text,
            serde_json::json!({"text": "hello"}),
            SessionId::mint(&DeviceTag::local()),
        )
    }

    #[tokio::test]
    async fn failed_probe_stays_offline() {
        let endpoint = Arc::new(ScriptedEndpoint::new(vec![]));
        let queue = Arc::new(InMemoryOfflineQueue::new(10));
        let coordinator = coordinator(endpoint, Arc::new(NeverReachable), queue);

        coordinator.on_connectivity_changed(true).await.unwrap();
        assert_eq!(coordinator.state(), SyncState::Offline);
    }

    #[tokio::test]
    async fn successful_cycle_drains_queue_and_goes_idle() {
        let endpoint = Arc::new(ScriptedEndpoint::new(vec![]));
        let queue = Arc::new(InMemoryOfflineQueue::new(10));
        queue.enqueue(text_item()).await.unwrap();
        queue.enqueue(text_item()).await.unwrap();

        let coordinator = coordinator(endpoint, Arc::new(AlwaysReachable), queue.clone());
        let report = coordinator.on_connectivity_changed(true).await.unwrap();

        assert_eq!(report.uploaded, 2);
        assert_eq!(coordinator.state(), SyncState::Idle);
        assert_eq!(queue.pending_count().await.unwrap(), 0);
        assert!(coordinator.status().await.unwrap().last_sync.is_some());
    }

    #[tokio::test]
    async fn rejected_twice_then_accepted_records_two_retries() {
        let endpoint = Arc::new(ScriptedEndpoint::new(vec![
            UploadVerdict::RejectAll,
            UploadVerdict::RejectAll,
            UploadVerdict::AcceptAll,
        ]));
        let queue = Arc::new(InMemoryOfflineQueue::new(10));
        queue.enqueue(text_item()).await.unwrap();

        let coordinator = coordinator(endpoint.clone(), Arc::new(AlwaysReachable), queue.clone());
        let report = coordinator.on_connectivity_changed(true).await.unwrap();

        assert_eq!(report.uploaded, 1);
        assert_eq!(report.dead_lettered, 0);
        // the accepted (third) attempt saw the item with two recorded
        // failures
        let uploads = endpoint.uploads();
        assert_eq!(uploads.len(), 3);
        assert_eq!(uploads[2][0].retry_count, 2);
        assert!(queue.all_items().is_empty());
    }

    #[tokio::test]
    async fn exhausted_items_are_dead_lettered_with_full_count() {
        let endpoint = Arc::new(ScriptedEndpoint::new(vec![
            UploadVerdict::RejectAll,
            UploadVerdict::RejectAll,
            UploadVerdict::RejectAll,
        ]));
        let queue = Arc::new(InMemoryOfflineQueue::new(10));
        queue.enqueue(text_item()).await.unwrap();

        let coordinator = coordinator(endpoint, Arc::new(AlwaysReachable), queue.clone());
        let report = coordinator.on_connectivity_changed(true).await.unwrap();

        assert_eq!(report.dead_lettered, 1);
        let dead = queue.dead_lettered().await.unwrap();
        assert_eq!(dead.len(), 1);
        assert_eq!(dead[0].retry_count, 3);
        // the rest of the cycle still completed
        assert_eq!(coordinator.state(), SyncState::Idle);
        assert!(coordinator
            .error_summary()
            .await
            .unwrap()
            .message()
            .is_some());
    }

    #[tokio::test]
    async fn mid_sync_loss_releases_batch_without_counting() {
        let endpoint = Arc::new(ScriptedEndpoint::new(vec![UploadVerdict::Unreachable]));
        let queue = Arc::new(InMemoryOfflineQueue::new(10));
        queue.enqueue(text_item()).await.unwrap();

        let coordinator = coordinator(endpoint, Arc::new(AlwaysReachable), queue.clone());
        let report = coordinator.on_connectivity_changed(true).await.unwrap();

        assert!(report.interrupted);
        assert_eq!(coordinator.state(), SyncState::Offline);
        let items = queue.all_items();
        assert_eq!(items[0].retry_count, 0);
        assert_eq!(queue.pending_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn cursor_is_persisted_after_download() {
        let endpoint = Arc::new(ScriptedEndpoint::new(vec![]));
        let queue = Arc::new(InMemoryOfflineQueue::new(10));
        let store = Arc::new(InMemoryContextStore::new());
        let user = UserId::new("vendor-1").unwrap();
        let coordinator = SyncCoordinator::new(
            user.clone(),
            store.clone(),
            queue,
            endpoint,
            Arc::new(AlwaysReachable),
            Arc::new(DeviceIdentity::new()),
            Arc::new(SessionLocks::new()),
            Arc::new(SyncStatusBoard::new()),
            fast_settings(),
        );

        coordinator.on_connectivity_changed(true).await.unwrap();
        let cursor = store.get_sync_cursor(&user).await.unwrap().unwrap();
        assert_eq!(cursor.token(), "cursor-1");
    }

    #[tokio::test]
    async fn poke_is_a_no_op_while_offline() {
        let endpoint = Arc::new(ScriptedEndpoint::new(vec![]));
        let queue = Arc::new(InMemoryOfflineQueue::new(10));
        queue.enqueue(text_item()).await.unwrap();

        let coordinator = coordinator(endpoint.clone(), Arc::new(AlwaysReachable), queue);
        coordinator.poke().await.unwrap();
        assert!(endpoint.uploads().is_empty());
        assert_eq!(coordinator.state(), SyncState::Offline);
    }
}
