//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `SharedNotesRepository` port from the `core` crate. It handles all
//! interactions with the `shared_notes` table in PostgreSQL using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use vod_notes_core::domain::{AvailableNotes, NewSharedRecord, Note, ShareToken, SharedRecord};
use vod_notes_core::ports::{PortError, PortResult, SharedNotesRepository};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `SharedNotesRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SharedNotesRecord {
    share_id: String,
    video_id: String,
    author_name: String,
    notes: Json<Vec<Note>>,
    created_at: DateTime<Utc>,
}
impl SharedNotesRecord {
    fn to_domain(self) -> SharedRecord {
        SharedRecord {
            share_token: ShareToken::new(self.share_id),
            video_id: self.video_id,
            author_name: self.author_name,
            notes: self.notes.0,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct SummaryRecord {
    author_name: String,
    created_at: DateTime<Utc>,
    share_id: String,
}
impl SummaryRecord {
    fn to_domain(self) -> AvailableNotes {
        AvailableNotes {
            author_name: self.author_name,
            created_at: self.created_at,
            share_token: ShareToken::new(self.share_id),
        }
    }
}

fn not_found_or_unexpected(token: &ShareToken, e: sqlx::Error) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("Shared notes {} not found", token)),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// `SharedNotesRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl SharedNotesRepository for DbAdapter {
    async fn insert(&self, record: NewSharedRecord) -> PortResult<SharedRecord> {
        let row = sqlx::query_as::<_, SharedNotesRecord>(
            "INSERT INTO shared_notes (video_id, author_name, notes, pin_code) VALUES ($1, $2, $3, $4) \
             RETURNING share_id, video_id, author_name, notes, created_at",
        )
        .bind(&record.video_id)
        .bind(&record.author_name)
        .bind(Json(&record.notes))
        .bind(record.pin.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(row.to_domain())
    }

    async fn get_by_token(&self, token: &ShareToken) -> PortResult<SharedRecord> {
        let row = sqlx::query_as::<_, SharedNotesRecord>(
            "SELECT share_id, video_id, author_name, notes, created_at FROM shared_notes WHERE share_id = $1",
        )
        .bind(token.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or_unexpected(token, e))?;
        Ok(row.to_domain())
    }

    async fn get_pin(&self, token: &ShareToken) -> PortResult<String> {
        sqlx::query_scalar::<_, String>("SELECT pin_code FROM shared_notes WHERE share_id = $1")
            .bind(token.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| not_found_or_unexpected(token, e))
    }

    async fn update_notes(
        &self,
        token: &ShareToken,
        author_name: &str,
        notes: &[Note],
    ) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE shared_notes SET notes = $1, author_name = $2 WHERE share_id = $3",
        )
        .bind(Json(notes))
        .bind(author_name)
        .bind(token.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Shared notes {} not found", token)));
        }
        Ok(())
    }

    async fn list_for_video(&self, video_id: &str) -> PortResult<Vec<AvailableNotes>> {
        let rows = sqlx::query_as::<_, SummaryRecord>(
            "SELECT author_name, created_at, share_id FROM shared_notes WHERE video_id = $1 ORDER BY created_at DESC",
        )
        .bind(video_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.to_domain()).collect())
    }
}
