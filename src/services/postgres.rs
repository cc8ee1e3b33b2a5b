use crate::core::moodboard::Board;
use crate::models::{FeedItem, OnboardingData, SavedItem};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Per-user state: onboarding answers, saved collection and moodboards
///
/// Documents are stored as JSONB so the wire shape and the stored shape
/// stay the same.
pub struct ProfileStore {
    pool: PgPool,
}

impl ProfileStore {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Insert or replace a user's onboarding answers
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        data: &OnboardingData,
        high_ticket_score: u32,
    ) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO user_profiles (user_id, data, high_ticket_score, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                data = EXCLUDED.data,
                high_ticket_score = EXCLUDED.high_ticket_score,
                updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(Json(data))
            .bind(high_ticket_score as i32)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Stored profile for {} (score {})", user_id, high_ticket_score);
        Ok(())
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<OnboardingData>, StoreError> {
        let row = sqlx::query("SELECT data FROM user_profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let Json(data): Json<OnboardingData> = row.try_get("data")?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Every profile with the size of its saved collection
    pub async fn list_profiles(&self) -> Result<Vec<(String, OnboardingData, usize)>, StoreError> {
        let query = r#"
            SELECT p.user_id, p.data, COUNT(s.item_id) AS saved
            FROM user_profiles p
            LEFT JOIN saved_items s ON s.user_id = p.user_id
            GROUP BY p.user_id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<_, StoreError> {
                let Json(data): Json<OnboardingData> = row.try_get("data")?;
                let user_id: String = row.try_get("user_id")?;
                let saved: i64 = row.try_get("saved")?;
                Ok((user_id, data, saved.max(0) as usize))
            })
            .collect()
    }

    /// Add an item to the saved collection
    ///
    /// Returns `false` when the item was already saved; the existing entry
    /// is kept unchanged.
    pub async fn save_item(
        &self,
        user_id: &str,
        item: &FeedItem,
        notes: Option<&str>,
    ) -> Result<bool, StoreError> {
        let query = r#"
            INSERT INTO saved_items (user_id, item_id, item, notes, saved_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_id, item_id) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(user_id)
            .bind(&item.id)
            .bind(Json(item))
            .bind(notes)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Saved collection, most recent first
    pub async fn list_saved_items(&self, user_id: &str) -> Result<Vec<SavedItem>, StoreError> {
        let query = r#"
            SELECT item, notes, saved_at
            FROM saved_items
            WHERE user_id = $1
            ORDER BY saved_at DESC
        "#;

        let rows = sqlx::query(query).bind(user_id).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<_, StoreError> {
                let Json(item): Json<FeedItem> = row.try_get("item")?;
                let saved_at: DateTime<Utc> = row.try_get("saved_at")?;
                Ok(SavedItem {
                    item,
                    saved_at: saved_at.timestamp_millis(),
                    notes: row.try_get("notes")?,
                })
            })
            .collect()
    }

    pub async fn remove_saved_item(&self, user_id: &str, item_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM saved_items WHERE user_id = $1 AND item_id = $2")
            .bind(user_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn save_board(&self, user_id: &str, board: &Board) -> Result<(), StoreError> {
        let query = r#"
            INSERT INTO moodboards (user_id, board_id, board, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, board_id)
            DO UPDATE SET board = EXCLUDED.board, updated_at = EXCLUDED.updated_at
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(&board.id)
            .bind(Json(board))
            .execute(&self.pool)
            .await?;

        tracing::debug!("Saved board {} for {} ({} items)", board.id, user_id, board.items.len());
        Ok(())
    }

    pub async fn list_boards(&self, user_id: &str) -> Result<Vec<Board>, StoreError> {
        let rows = sqlx::query(
            "SELECT board FROM moodboards WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<_, StoreError> {
                let Json(board): Json<Board> = row.try_get("board")?;
                Ok(board)
            })
            .collect()
    }

    pub async fn delete_board(&self, user_id: &str, board_id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM moodboards WHERE user_id = $1 AND board_id = $2")
            .bind(user_id)
            .bind(board_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("board {}", board_id)));
        }
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
