//! Dev harness: a stdin-driven console around the dialogue engine.
//!
//! Reads utterances line by line and prints the engine's replies.
//! Connectivity is simulated with `:online` / `:offline`, matching how
//! the host platform would deliver connectivity-change events.

use std::error::Error;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sahayak::adapters::{
    CannedAdvisor, HttpAdvisorConfig, HttpBusinessAdvisor, HttpConnectivityProbe,
    HttpSyncEndpoint, HttpSyncEndpointConfig, InMemoryContextStore, InMemoryOfflineQueue,
    SqliteContextStore, SqliteOfflineQueue, UnavailableSpeech,
};
use sahayak::application::{
    DeviceIdentity, DialogueEngine, DialogueReply, EngineSettings, SessionLocks,
    SessionTimeoutSweeper, SyncCoordinator, SyncSettings, SyncStatusBoard, UtteranceInput,
};
use sahayak::config::AppConfig;
use sahayak::domain::foundation::{ErrorCode, UserId};
use sahayak::ports::{BusinessAdvisor, ContextStore, OfflineQueue};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let (store, queue): (Arc<dyn ContextStore>, Arc<dyn OfflineQueue>) =
        if config.storage.is_in_memory() {
            info!("using in-memory storage");
            (
                Arc::new(InMemoryContextStore::new()),
                Arc::new(InMemoryOfflineQueue::new(config.storage.queue_capacity)),
            )
        } else {
            info!(url = %config.storage.database_url, "using sqlite storage");
            (
                Arc::new(SqliteContextStore::connect(&config.storage.database_url).await?),
                Arc::new(
                    SqliteOfflineQueue::connect(
                        &config.storage.database_url,
                        config.storage.queue_capacity,
                    )
                    .await?,
                ),
            )
        };

    let advisor: Arc<dyn BusinessAdvisor> = match &config.advisor.api_key {
        Some(key) if !key.is_empty() => Arc::new(HttpBusinessAdvisor::new(
            HttpAdvisorConfig::new(key.clone())
                .with_base_url(config.advisor.base_url.clone())
                .with_timeout(config.advisor.timeout())
                .with_max_retries(config.advisor.max_retries),
        )),
        _ => {
            info!("no advisor api key configured, using canned guidance");
            Arc::new(CannedAdvisor::new())
        }
    };

    let device = Arc::new(DeviceIdentity::new());
    let locks = Arc::new(SessionLocks::new());
    let board = Arc::new(SyncStatusBoard::new());

    let engine = Arc::new(DialogueEngine::new(
        store.clone(),
        queue.clone(),
        advisor,
        Arc::new(UnavailableSpeech::new()),
        device.clone(),
        locks.clone(),
        board.clone(),
        EngineSettings {
            decline_budget: config.dialogue.decline_budget,
            confidence_floor: config.dialogue.confidence_floor,
            transcript_floor: config.dialogue.transcript_floor,
        },
    ));

    let user_id = UserId::new(
        std::env::var("SAHAYAK_USER").unwrap_or_else(|_| "dev-vendor".to_string()),
    )?;

    let mut endpoint_config = HttpSyncEndpointConfig::new(config.sync.endpoint_url.clone());
    if let Some(key) = &config.sync.api_key {
        if !key.is_empty() {
            endpoint_config = endpoint_config.with_api_key(key.clone());
        }
    }
    let coordinator = Arc::new(SyncCoordinator::new(
        user_id.clone(),
        store.clone(),
        queue,
        Arc::new(HttpSyncEndpoint::new(endpoint_config)),
        Arc::new(HttpConnectivityProbe::new(config.sync.endpoint_url.clone())),
        device,
        locks,
        board,
        SyncSettings {
            probe_window: config.sync.probe_window(),
            schedule: config.sync.backoff_schedule(),
            batch_size: config.sync.batch_size,
        },
    ));

    let sweeper = SessionTimeoutSweeper::new(
        store,
        engine.close_handler(),
        config.dialogue.session_timeout_minutes,
    );
    let sweep_interval = config.dialogue.sweep_interval();
    let sweep_task = tokio::spawn(async move { sweeper.run(sweep_interval).await });

    let mut session_id = engine.create_session(user_id.clone()).await?.context.session_id().clone();
    println!("session {} ready (offline). :online :offline :status :new :quit", session_id);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.as_str() {
            "" => continue,
            ":quit" => break,
            ":online" => {
                let report = coordinator.on_connectivity_changed(true).await?;
                println!(
                    "online. uploaded {}, dead-lettered {}, downloaded {}",
                    report.uploaded, report.dead_lettered, report.downloaded
                );
                if let Some(warning) = coordinator.error_summary().await?.message() {
                    println!("! {}", warning);
                }
            }
            ":offline" => {
                coordinator.on_connectivity_changed(false).await?;
                println!("offline.");
            }
            ":status" => {
                let status = engine.get_sync_status().await?;
                println!(
                    "online={} syncing={} pending={} dead-lettered={} last_sync={:?}",
                    status.is_online,
                    status.is_syncing,
                    status.pending_items,
                    status.dead_lettered,
                    status.last_sync.map(|t| t.to_rfc3339()),
                );
            }
            ":new" => {
                engine.close_session(session_id.clone()).await?;
                session_id = engine
                    .create_session(user_id.clone())
                    .await?
                    .context
                    .session_id()
                    .clone();
                println!("session {} ready", session_id);
            }
            text => {
                match engine
                    .submit_utterance(session_id.clone(), UtteranceInput::Text(text.to_string()))
                    .await
                {
                    Ok(DialogueReply::Ask { text, .. }) => println!("? {}", text),
                    Ok(DialogueReply::Clarify { text }) => println!("? {}", text),
                    Ok(DialogueReply::Guidance { text, .. }) => println!("> {}", text),
                    Err(err) if err.is(ErrorCode::QueueFull) => {
                        println!(
                            "! Device storage is full. Go online to sync, or free up \
                             space, then try again."
                        );
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    sweep_task.abort();
    Ok(())
}
