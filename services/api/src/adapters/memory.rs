//! services/api/src/adapters/memory.rs
//!
//! A process-local `SharedNotesRepository` with the same contract as the
//! database adapter. Tokens are random v4 UUIDs, like the column default.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use vod_notes_core::domain::{AvailableNotes, NewSharedRecord, Note, ShareToken, SharedRecord};
use vod_notes_core::ports::{PortError, PortResult, SharedNotesRepository};

struct Row {
    record: SharedRecord,
    pin_code: String,
}

#[derive(Default)]
pub struct MemoryAdapter {
    rows: RwLock<Vec<Row>>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(token: &ShareToken) -> PortError {
    PortError::NotFound(format!("Shared notes {} not found", token))
}

#[async_trait]
impl SharedNotesRepository for MemoryAdapter {
    async fn insert(&self, record: NewSharedRecord) -> PortResult<SharedRecord> {
        let stored = SharedRecord {
            share_token: ShareToken::new(Uuid::new_v4().to_string()),
            video_id: record.video_id,
            author_name: record.author_name,
            notes: record.notes,
            created_at: Utc::now(),
        };
        self.rows.write().await.push(Row {
            record: stored.clone(),
            pin_code: record.pin.as_str().to_string(),
        });
        Ok(stored)
    }

    async fn get_by_token(&self, token: &ShareToken) -> PortResult<SharedRecord> {
        self.rows
            .read()
            .await
            .iter()
            .find(|r| &r.record.share_token == token)
            .map(|r| r.record.clone())
            .ok_or_else(|| not_found(token))
    }

    async fn get_pin(&self, token: &ShareToken) -> PortResult<String> {
        self.rows
            .read()
            .await
            .iter()
            .find(|r| &r.record.share_token == token)
            .map(|r| r.pin_code.clone())
            .ok_or_else(|| not_found(token))
    }

    async fn update_notes(
        &self,
        token: &ShareToken,
        author_name: &str,
        notes: &[Note],
    ) -> PortResult<()> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| &r.record.share_token == token)
            .ok_or_else(|| not_found(token))?;
        row.record.author_name = author_name.to_string();
        row.record.notes = notes.to_vec();
        Ok(())
    }

    async fn list_for_video(&self, video_id: &str) -> PortResult<Vec<AvailableNotes>> {
        let rows = self.rows.read().await;
        // Later inserts never carry an earlier timestamp, so reverse insertion
        // order is newest first even when two rows share a clock tick.
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.record.video_id == video_id)
            .map(|r| AvailableNotes {
                author_name: r.record.author_name.clone(),
                created_at: r.record.created_at,
                share_token: r.record.share_token.clone(),
            })
            .collect())
    }
}
