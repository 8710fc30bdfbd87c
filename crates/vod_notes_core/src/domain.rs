//! crates/vod_notes_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! Serialization uses the camelCase field names the browser client and the
//! `shared_notes.notes` column have always carried.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single timestamped note attached to the current video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub content: String,
    /// Seconds from the start of the video.
    pub timestamp: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Opaque identifier naming a persisted note snapshot, embeddable in a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareToken(String);

impl ShareToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raised when a string is not exactly four ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("PIN code must be exactly 4 digits")]
pub struct InvalidPin;

/// A 4-digit numeric edit code. This is a convenience gate, not a credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    pub const LEN: usize = 4;

    pub fn parse(raw: &str) -> Result<Self, InvalidPin> {
        if raw.len() == Self::LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidPin)
        }
    }

    /// Normalizes keyboard input the way the PIN field does: drop every
    /// non-digit and keep at most four characters.
    pub fn sanitize_input(raw: &str) -> String {
        raw.chars()
            .filter(char::is_ascii_digit)
            .take(Self::LEN)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the code out of logs.
impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// A persisted snapshot of someone's notes for a video, as seen by viewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedRecord {
    pub share_token: ShareToken,
    pub video_id: String,
    pub author_name: String,
    pub notes: Vec<Note>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a brand new shared record.
#[derive(Debug, Clone)]
pub struct NewSharedRecord {
    pub video_id: String,
    pub author_name: String,
    pub notes: Vec<Note>,
    pub pin: Pin,
}

/// Read-only projection used to list the shares available for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableNotes {
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub share_token: ShareToken,
}

/// Which notes the session is looking at and whether it may change them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// Local notes that have never been shared.
    #[default]
    Owner,
    /// Local notes that have been shared at least once in this session.
    Shared { token: ShareToken },
    /// Someone else's shared notes, loaded from a link.
    ReadOnly { token: ShareToken, author: String },
    /// A shared record unlocked for editing with its PIN.
    EditUnlocked { token: ShareToken },
}

impl SessionMode {
    pub fn can_edit(&self) -> bool {
        !matches!(self, SessionMode::ReadOnly { .. })
    }

    /// The share the session is bound to, if any.
    pub fn share_token(&self) -> Option<&ShareToken> {
        match self {
            SessionMode::Owner => None,
            SessionMode::Shared { token }
            | SessionMode::ReadOnly { token, .. }
            | SessionMode::EditUnlocked { token } => Some(token),
        }
    }
}
