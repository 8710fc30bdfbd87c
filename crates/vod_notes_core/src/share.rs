//! crates/vod_notes_core/src/share.rs
//!
//! Synchronizes a note collection with a persisted `shared_notes` record.
//!
//! Everything that can be checked locally (author name, PIN shape, having
//! something to share) is checked before the repository is touched. The PIN
//! is compared as stored plaintext; it gates edits, it does not authenticate.
//! Updates are last-writer-wins with no version check.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{AvailableNotes, InvalidPin, NewSharedRecord, Note, Pin, ShareToken, SharedRecord};
use crate::ports::{PortError, SharedNotesRepository};

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Please enter your name")]
    EmptyAuthorName,
    #[error("PIN code must be exactly 4 digits")]
    InvalidPin,
    #[error("No notes to share")]
    NothingToShare,
    #[error("Incorrect PIN code")]
    IncorrectPin,
    #[error("Shared notes not found: {0}")]
    NotFound(ShareToken),
    #[error("Share store error: {0}")]
    Port(#[from] PortError),
}

impl From<InvalidPin> for ShareError {
    fn from(_: InvalidPin) -> Self {
        ShareError::InvalidPin
    }
}

impl ShareError {
    /// Local validation failures, reported before any remote call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ShareError::EmptyAuthorName | ShareError::InvalidPin | ShareError::NothingToShare
        )
    }
}

pub type ShareResult<T> = Result<T, ShareError>;

#[derive(Clone)]
pub struct ShareGateway {
    repo: Arc<dyn SharedNotesRepository>,
}

impl ShareGateway {
    pub fn new(repo: Arc<dyn SharedNotesRepository>) -> Self {
        Self { repo }
    }

    /// Persists a new shared record and returns its token.
    pub async fn create(
        &self,
        video_id: &str,
        author_name: &str,
        notes: &[Note],
        pin: &str,
    ) -> ShareResult<ShareToken> {
        let author_name = validate_author(author_name)?;
        let pin = Pin::parse(pin)?;
        ensure_something_to_share(video_id, notes)?;

        let record = self
            .repo
            .insert(NewSharedRecord {
                video_id: video_id.to_string(),
                author_name: author_name.to_string(),
                notes: notes.to_vec(),
                pin,
            })
            .await?;
        info!(
            share = %record.share_token,
            video_id = %video_id,
            notes = notes.len(),
            "created shared notes"
        );
        Ok(record.share_token)
    }

    /// Overwrites notes and author on an existing record once the PIN matches.
    pub async fn update(
        &self,
        token: &ShareToken,
        author_name: &str,
        notes: &[Note],
        pin: &str,
    ) -> ShareResult<()> {
        let author_name = validate_author(author_name)?;
        let pin = Pin::parse(pin)?;
        if notes.is_empty() {
            return Err(ShareError::NothingToShare);
        }

        if !self.pin_matches(token, &pin).await? {
            warn!(share = %token, "update rejected: incorrect PIN");
            return Err(ShareError::IncorrectPin);
        }

        self.repo
            .update_notes(token, author_name, notes)
            .await
            .map_err(|e| not_found_or(token, e))?;
        info!(share = %token, notes = notes.len(), "updated shared notes");
        Ok(())
    }

    pub async fn load(&self, token: &ShareToken) -> ShareResult<SharedRecord> {
        self.repo
            .get_by_token(token)
            .await
            .map_err(|e| not_found_or(token, e))
    }

    /// True iff `pin` equals the stored code. Malformed input is rejected
    /// before the store is asked.
    pub async fn verify_pin(&self, token: &ShareToken, pin: &str) -> ShareResult<bool> {
        let pin = Pin::parse(pin)?;
        self.pin_matches(token, &pin).await
    }

    /// Shares recorded for a video, newest first.
    pub async fn list_available(&self, video_id: &str) -> ShareResult<Vec<AvailableNotes>> {
        Ok(self.repo.list_for_video(video_id).await?)
    }

    async fn pin_matches(&self, token: &ShareToken, pin: &Pin) -> ShareResult<bool> {
        let stored = self
            .repo
            .get_pin(token)
            .await
            .map_err(|e| not_found_or(token, e))?;
        Ok(stored == pin.as_str())
    }
}

fn validate_author(author_name: &str) -> ShareResult<&str> {
    let trimmed = author_name.trim();
    if trimmed.is_empty() {
        Err(ShareError::EmptyAuthorName)
    } else {
        Ok(trimmed)
    }
}

fn ensure_something_to_share(video_id: &str, notes: &[Note]) -> ShareResult<()> {
    if video_id.trim().is_empty() || notes.is_empty() {
        Err(ShareError::NothingToShare)
    } else {
        Ok(())
    }
}

fn not_found_or(token: &ShareToken, e: PortError) -> ShareError {
    match e {
        PortError::NotFound(_) => ShareError::NotFound(token.clone()),
        other => ShareError::Port(other),
    }
}
