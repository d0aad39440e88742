//! SQLite implementation of ContextStore.
//!
//! On-device durable storage. Aggregates are stored as JSON documents
//! with indexed columns for the queries the engine actually runs
//! (per-user lookups, active-session sweeps, recency ordering).

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::domain::context::{ContextPatch, SessionContext, SyncCursor, UserProfile};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, UserId};
use crate::ports::ContextStore;

/// SQLite implementation of ContextStore.
#[derive(Clone)]
pub struct SqliteContextStore {
    pool: SqlitePool,
}

impl SqliteContextStore {
    /// Opens (or creates) the database and prepares the schema.
    pub async fn connect(database_url: &str) -> Result<Self, DomainError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(storage_err)?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Wraps an existing pool (for sharing with the queue adapter).
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, DomainError> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                status TEXT NOT NULL,
                last_updated_micros INTEGER NOT NULL,
                context TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_sessions_user_status ON sessions (user_id, status)",
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                profile TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sync_cursors (
                user_id TEXT PRIMARY KEY,
                cursor TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn write_session(&self, session: &SessionContext) -> Result<(), DomainError> {
        let context = serde_json::to_string(session).map_err(encode_err)?;
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, status, last_updated_micros, context)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                status = excluded.status,
                last_updated_micros = excluded.last_updated_micros,
                context = excluded.context
            "#,
        )
        .bind(session.session_id().as_str())
        .bind(session.user_id().as_str())
        .bind(session.status().to_string())
        .bind(session.last_updated().as_unix_micros())
        .bind(context)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn read_session(&self, id: &SessionId) -> Result<Option<SessionContext>, DomainError> {
        let row = sqlx::query("SELECT context FROM sessions WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        row.map(|r| decode_session(&r)).transpose()
    }
}

#[async_trait]
impl ContextStore for SqliteContextStore {
    async fn create_session(&self, context: &SessionContext) -> Result<(), DomainError> {
        self.write_session(context).await
    }

    async fn get_session_context(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionContext>, DomainError> {
        self.read_session(id).await
    }

    async fn update_context(
        &self,
        id: &SessionId,
        patch: ContextPatch,
    ) -> Result<SessionContext, DomainError> {
        let mut session = self.read_session(id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::SessionNotFound, format!("Session not found: {}", id))
        })?;
        session.apply(patch)?;
        self.write_session(&session).await?;
        Ok(session)
    }

    async fn close_session(&self, id: &SessionId) -> Result<bool, DomainError> {
        let mut session = self.read_session(id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::SessionNotFound, format!("Session not found: {}", id))
        })?;
        let changed = session.close();
        if changed {
            self.write_session(&session).await?;
        }
        Ok(changed)
    }

    async fn list_active_sessions(&self) -> Result<Vec<SessionContext>, DomainError> {
        let rows = sqlx::query("SELECT context FROM sessions WHERE status = 'active'")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_err)?;
        rows.iter().map(decode_session).collect()
    }

    async fn latest_closed_session(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SessionContext>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT context FROM sessions
            WHERE user_id = $1 AND status = 'closed'
            ORDER BY last_updated_micros DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;
        row.map(|r| decode_session(&r)).transpose()
    }

    async fn get_user_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserProfile>, DomainError> {
        let row = sqlx::query("SELECT profile FROM profiles WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        row.map(|r| {
            let raw: String = r.try_get("profile").map_err(storage_err)?;
            serde_json::from_str(&raw).map_err(decode_err)
        })
        .transpose()
    }

    async fn put_user_profile(&self, profile: &UserProfile) -> Result<(), DomainError> {
        let raw = serde_json::to_string(profile).map_err(encode_err)?;
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, profile) VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET profile = excluded.profile
            "#,
        )
        .bind(profile.user_id().as_str())
        .bind(raw)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }

    async fn get_sync_cursor(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SyncCursor>, DomainError> {
        let row = sqlx::query("SELECT cursor FROM sync_cursors WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;
        row.map(|r| {
            let raw: String = r.try_get("cursor").map_err(storage_err)?;
            serde_json::from_str(&raw).map_err(decode_err)
        })
        .transpose()
    }

    async fn put_sync_cursor(&self, cursor: &SyncCursor) -> Result<(), DomainError> {
        let raw = serde_json::to_string(cursor).map_err(encode_err)?;
        sqlx::query(
            r#"
            INSERT INTO sync_cursors (user_id, cursor) VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET cursor = excluded.cursor
            "#,
        )
        .bind(cursor.user_id().as_str())
        .bind(raw)
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;
        Ok(())
    }
}

fn decode_session(row: &sqlx::sqlite::SqliteRow) -> Result<SessionContext, DomainError> {
    let raw: String = row.try_get("context").map_err(storage_err)?;
    serde_json::from_str(&raw).map_err(decode_err)
}

fn storage_err(e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::StorageError, format!("SQLite error: {}", e))
}

fn encode_err(e: serde_json::Error) -> DomainError {
    DomainError::new(ErrorCode::StorageError, format!("Failed to encode record: {}", e))
}

fn decode_err(e: serde_json::Error) -> DomainError {
    DomainError::new(ErrorCode::StorageError, format!("Failed to decode record: {}", e))
}
