// ABOUTME: SQLite milestone store persisting each user's state as a JSON document
// ABOUTME: Creates its table on connect and upserts whole-state writes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gutsense Contributors

use super::MilestoneStore;
use chrono::Utc;
use gutsense_core::errors::{AppError, AppResult};
use gutsense_core::models::MilestoneState;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

/// `SQLite`-backed milestone store
#[derive(Debug, Clone)]
pub struct SqliteMilestoneStore {
    pool: SqlitePool,
}

impl SqliteMilestoneStore {
    /// Connect and run migrations
    ///
    /// File databases are created if missing. In-memory databases use a
    /// single connection so every query sees the same database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migration fails
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");
        let connection_options = if database_url.starts_with("sqlite:") && !in_memory {
            if database_url.contains('?') {
                database_url.to_owned()
            } else {
                format!("{database_url}?mode=rwc")
            }
        } else {
            database_url.to_owned()
        };

        let max_connections = if in_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_options)
            .await
            .map_err(|e| {
                AppError::storage(format!("Failed to connect to milestone database: {e}"))
            })?;

        let store = Self { pool };
        store.migrate().await?;
        debug!(in_memory, "milestone store ready");
        Ok(store)
    }

    /// Wrap an existing pool; call [`Self::migrate`] before use
    #[must_use]
    pub const fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the milestone table if it does not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS milestone_states (
                user_id TEXT PRIMARY KEY,
                state_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to create milestone table: {e}")))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MilestoneStore for SqliteMilestoneStore {
    async fn load(&self, user_id: Uuid) -> AppResult<Option<MilestoneState>> {
        let row = sqlx::query(
            r"
            SELECT state_json
            FROM milestone_states
            WHERE user_id = ?1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to load milestone state: {e}")))?;

        row.map_or(Ok(None), |row| {
            let json: String = row.get("state_json");
            let state = serde_json::from_str(&json).map_err(|e| {
                AppError::serialization(format!("Failed to decode milestone state: {e}"))
                    .with_resource_id(user_id.to_string())
            })?;
            Ok(Some(state))
        })
    }

    async fn save(&self, user_id: Uuid, state: &MilestoneState) -> AppResult<()> {
        let json = serde_json::to_string(state)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO milestone_states (user_id, state_json, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET
                state_json = ?2,
                updated_at = ?3
            ",
        )
        .bind(user_id.to_string())
        .bind(&json)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage(format!("Failed to save milestone state: {e}")))?;

        Ok(())
    }
}
