//! crates/vod_notes_core/src/note_store.rs
//!
//! In-memory, timestamp-ordered collection of notes for the current video.
//!
//! The backing vector is kept sorted by `timestamp` at all times, with ties
//! left in insertion order. That order is the display order, the navigation
//! order and the export order, so every mutation goes through a stable sort.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::Note;

/// How far before the current playback position a new note is anchored.
pub const LOOK_BACK_SECONDS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Whether the store accepts mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    #[default]
    Editable,
    ReadOnly,
}

#[derive(Debug, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
    mode: AccessMode,
    last_id: i64,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: AccessMode) {
        self.mode = mode;
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == AccessMode::ReadOnly
    }

    /// Creates an empty note a little before `playback_seconds`.
    ///
    /// Returns `None` without touching the collection when the store is
    /// read-only.
    pub fn add(&mut self, playback_seconds: f64) -> Option<Note> {
        self.add_at(playback_seconds, Utc::now())
    }

    fn add_at(&mut self, playback_seconds: f64, now: DateTime<Utc>) -> Option<Note> {
        if self.is_read_only() {
            debug!("ignoring add in read-only mode");
            return None;
        }

        let note = Note {
            id: self.next_id(now),
            content: String::new(),
            timestamp: anchor_timestamp(playback_seconds),
            created_at: now,
            tags: Vec::new(),
        };
        self.notes.push(note.clone());
        self.sort();
        Some(note)
    }

    /// Replaces the content of the note with `id`. Unknown ids are ignored.
    pub fn edit(&mut self, id: &str, content: impl Into<String>) -> bool {
        if self.is_read_only() {
            return false;
        }
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.content = content.into();
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        if self.is_read_only() {
            return false;
        }
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    /// Notes in ascending timestamp order, ties in insertion order.
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Swaps in a whole collection, e.g. a loaded share. Bypasses the
    /// read-only guard since it is how read-only content arrives.
    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.sort();
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Circular step from `current` through `list()`.
    ///
    /// With no selection, `Next` lands on the first note and `Previous` on the
    /// last. Returns `None` when there are no notes.
    pub fn navigate(&self, direction: Direction, current: Option<usize>) -> Option<usize> {
        let len = self.notes.len();
        if len == 0 {
            return None;
        }
        let last = len - 1;
        let next = match (direction, current) {
            (Direction::Previous, None | Some(0)) => last,
            (Direction::Previous, Some(i)) => (i - 1).min(last),
            (Direction::Next, None) => 0,
            (Direction::Next, Some(i)) if i >= last => 0,
            (Direction::Next, Some(i)) => i + 1,
        };
        Some(next)
    }

    fn sort(&mut self) {
        // `sort_by_key` is stable.
        self.notes.sort_by_key(|n| n.timestamp);
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let millis = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = millis;
        millis.to_string()
    }
}

fn anchor_timestamp(playback_seconds: f64) -> u64 {
    if !playback_seconds.is_finite() || playback_seconds <= 0.0 {
        return 0;
    }
    // Saturating float-to-int cast; the floor is what the widget reports.
    (playback_seconds.floor() as u64).saturating_sub(LOOK_BACK_SECONDS)
}
