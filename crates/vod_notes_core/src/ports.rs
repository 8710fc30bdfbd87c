//! crates/vod_notes_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the document store, the video widget and the clipboard.

use async_trait::async_trait;

use crate::domain::{AvailableNotes, NewSharedRecord, Note, ShareToken, SharedRecord};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Row-level access to the `shared_notes` document store.
#[async_trait]
pub trait SharedNotesRepository: Send + Sync {
    /// Persists a new record and returns it with its generated token.
    async fn insert(&self, record: NewSharedRecord) -> PortResult<SharedRecord>;

    async fn get_by_token(&self, token: &ShareToken) -> PortResult<SharedRecord>;

    /// Reads the stored PIN for a record. Kept apart from `get_by_token` so the
    /// code never travels with the notes.
    async fn get_pin(&self, token: &ShareToken) -> PortResult<String>;

    /// Overwrites the notes and author of an existing record.
    async fn update_notes(
        &self,
        token: &ShareToken,
        author_name: &str,
        notes: &[Note],
    ) -> PortResult<()>;

    /// All records for a video, newest first.
    async fn list_for_video(&self, video_id: &str) -> PortResult<Vec<AvailableNotes>>;
}

/// The embedded video widget. Calls are synchronous on the UI context.
pub trait VideoPlayer {
    fn current_time(&self) -> f64;
    fn seek_to(&mut self, seconds: f64);
    fn set_playback_rate(&mut self, rate: f64);
    fn playback_rate(&self) -> f64;
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Places a text blob on the system clipboard.
    async fn write_text(&self, text: &str) -> PortResult<()>;
}
