//! SQLite implementation of OfflineQueue.
//!
//! The durable write-ahead log for offline-created work. Items survive
//! restarts; ordering uses a microsecond timestamp column.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::warn;

use crate::domain::foundation::{DomainError, ErrorCode, ItemId, SessionId, Timestamp};
use crate::domain::sync::{ItemKind, ItemStatus, NewQueuedItem, QueuedItem};
use crate::ports::OfflineQueue;

/// SQLite implementation of OfflineQueue.
#[derive(Clone)]
pub struct SqliteOfflineQueue {
    pool: SqlitePool,
    capacity: usize,
}

impl SqliteOfflineQueue {
    /// Opens (or creates) the database and prepares the schema.
    pub async fn connect(database_url: &str, capacity: usize) -> Result<Self, DomainError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(storage_err)?;
        Self::with_pool(pool, capacity).await
    }

    /// Wraps an existing pool (for sharing with the context store).
    pub async fn with_pool(pool: SqlitePool, capacity: usize) -> Result<Self, DomainError> {
        let queue = Self {
            pool,
            capacity: capacity.max(1),
        };
        queue.init_schema().await?;
        Ok(queue)
    }

    async fn init_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS queue_items (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                payload TEXT NOT NULL,
                session_id TEXT NOT NULL,
                ts_micros INTEGER NOT NULL,
                retry_count INTEGER NOT NULL,
                status TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_queue_status_ts ON queue_items (status, ts_micros)",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn set_status(
        &self,
        ids: &[ItemId],
        status: ItemStatus,
        bump_retry: bool,
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        for id in ids {
            let bump = i64::from(bump_retry);
            sqlx::query(
                "UPDATE queue_items SET status = $1, retry_count = retry_count + $2 WHERE id = $3",
            )
            .bind(status.as_str())
            .bind(bump)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(storage_err)?;
        }
        tx.commit().await.map_err(storage_err)?;
        Ok(())
    }
}

#[async_trait]
impl OfflineQueue for SqliteOfflineQueue {
    async fn enqueue(&self, item: NewQueuedItem) -> Result<ItemId, DomainError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let live: i64 = sqlx::query(
            "SELECT COUNT(*) AS n FROM queue_items WHERE status != 'dead_letter'",
        )
        .fetch_one(&mut *tx)
        .await
        .map_err(storage_err)?
        .try_get("n")
        .map_err(storage_err)?;

        if live as usize >= self.capacity {
            let victim: Option<String> = sqlx::query(
                r#"
                SELECT id FROM queue_items
                WHERE status = 'pending' AND kind != 'audio'
                ORDER BY ts_micros ASC
                LIMIT 1
                "#,
            )
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_err)?
            .map(|r| r.try_get("id"))
            .transpose()
            .map_err(storage_err)?;

            match victim {
                Some(id) => {
                    warn!(
                        target: "sahayak::queue",
                        item_id = %id,
                        "storage full, pruning oldest regenerable item"
                    );
                    sqlx::query("DELETE FROM queue_items WHERE id = $1")
                        .bind(&id)
                        .execute(&mut *tx)
                        .await
                        .map_err(storage_err)?;
                }
                None => {
                    return Err(DomainError::new(
                        ErrorCode::QueueFull,
                        "Offline storage is full and only audio items remain",
                    ));
                }
            }
        }

        let queued = QueuedItem::from_new(item);
        sqlx::query(
            r#"
            INSERT INTO queue_items (id, kind, payload, session_id, ts_micros, retry_count, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(queued.id.to_string())
        .bind(queued.kind.as_str())
        .bind(queued.payload.to_string())
        .bind(queued.session_id.as_str())
        .bind(queued.timestamp.as_unix_micros())
        .bind(queued.retry_count as i64)
        .bind(queued.status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(storage_err)?;

        tx.commit().await.map_err(storage_err)?;
        Ok(queued.id)
    }

    async fn dequeue_batch(&self, max_items: usize) -> Result<Vec<QueuedItem>, DomainError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;

        let rows = sqlx::query(
            r#"
            SELECT id, kind, payload, session_id, ts_micros, retry_count, status
            FROM queue_items
            WHERE status = 'pending'
            ORDER BY ts_micros ASC
            LIMIT $1
            "#,
        )
        .bind(max_items as i64)
        .fetch_all(&mut *tx)
        .await
        .map_err(storage_err)?;

        let mut batch = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut item = row_to_item(row)?;
            sqlx::query("UPDATE queue_items SET status = 'in_flight' WHERE id = $1")
                .bind(item.id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
            item.status = ItemStatus::InFlight;
            batch.push(item);
        }

        tx.commit().await.map_err(storage_err)?;
        Ok(batch)
    }

    async fn acknowledge(&self, ids: &[ItemId]) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(storage_err)?;
        for id in ids {
            sqlx::query("DELETE FROM queue_items WHERE id = $1")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(storage_err)?;
        }
        tx.commit().await.map_err(storage_err)?;
        Ok(())
    }

    async fn requeue(&self, ids: &[ItemId]) -> Result<(), DomainError> {
        self.set_status(ids, ItemStatus::Pending, true).await
    }

    async fn release(&self, ids: &[ItemId]) -> Result<(), DomainError> {
        self.set_status(ids, ItemStatus::Pending, false).await
    }

    async fn dead_letter(&self, ids: &[ItemId]) -> Result<(), DomainError> {
        self.set_status(ids, ItemStatus::DeadLetter, false).await
    }

    async fn dead_lettered(&self) -> Result<Vec<QueuedItem>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, kind, payload, session_id, ts_micros, retry_count, status
            FROM queue_items
            WHERE status = 'dead_letter'
            ORDER BY ts_micros ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;
        rows.iter().map(row_to_item).collect()
    }

    async fn pending_count(&self) -> Result<usize, DomainError> {
        let n: i64 = sqlx::query("SELECT COUNT(*) AS n FROM queue_items WHERE status = 'pending'")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_err)?
            .try_get("n")
            .map_err(storage_err)?;
        Ok(n as usize)
    }
}

fn row_to_item(row: &SqliteRow) -> Result<QueuedItem, DomainError> {
    let id_raw: String = row.try_get("id").map_err(storage_err)?;
    let kind_raw: String = row.try_get("kind").map_err(storage_err)?;
    let payload_raw: String = row.try_get("payload").map_err(storage_err)?;
    let session_raw: String = row.try_get("session_id").map_err(storage_err)?;
    let ts_micros: i64 = row.try_get("ts_micros").map_err(storage_err)?;
    let retry_count: i64 = row.try_get("retry_count").map_err(storage_err)?;
    let status_raw: String = row.try_get("status").map_err(storage_err)?;

    Ok(QueuedItem {
        id: ItemId::from_str(&id_raw).map_err(|e| {
            DomainError::new(ErrorCode::StorageError, format!("Bad item id: {}", e))
        })?,
        kind: ItemKind::parse(&kind_raw).ok_or_else(|| {
            DomainError::new(ErrorCode::StorageError, format!("Bad item kind: {}", kind_raw))
        })?,
        payload: serde_json::from_str(&payload_raw).map_err(|e| {
            DomainError::new(ErrorCode::StorageError, format!("Bad payload: {}", e))
        })?,
        session_id: SessionId::from_str(&session_raw)
            .map_err(|e| DomainError::new(ErrorCode::StorageError, e.to_string()))?,
        timestamp: Timestamp::from_unix_micros(ts_micros),
        retry_count: retry_count as u32,
        status: ItemStatus::parse(&status_raw).ok_or_else(|| {
            DomainError::new(
                ErrorCode::StorageError,
                format!("Bad item status: {}", status_raw),
            )
        })?,
    })
}

fn storage_err(e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::StorageError, format!("SQLite error: {}", e))
}
