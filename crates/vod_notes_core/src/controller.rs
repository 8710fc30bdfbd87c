//! crates/vod_notes_core/src/controller.rs
//!
//! Wires user actions to the note store, the exporters and the share gateway,
//! and keeps the transient UI state (dialogs, toast, selection, playback rate).
//!
//! No action returns an error: every failure ends up as an error toast and the
//! controller stays usable.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::domain::{AvailableNotes, Note, SessionMode, ShareToken};
use crate::export::ExportFormat;
use crate::note_store::{AccessMode, Direction, NoteStore};
use crate::ports::{Clipboard, VideoPlayer};
use crate::share::{ShareError, ShareGateway};
use crate::url::{extract_video_id, share_url};

/// How long a toast stays on screen after the latest message.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Step used by the rewind/forward buttons.
pub const SEEK_SECONDS: f64 = 5.0;

pub const PLAYBACK_RATES: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Settings,
    Share,
    Pin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < TOAST_DURATION
    }
}

/// Presentation state owned by the controller.
#[derive(Debug, Clone)]
pub struct UiState {
    pub dialog: Option<Dialog>,
    pub dark_mode: bool,
    pub playback_rate: f64,
    pub selected_note: Option<usize>,
    toast: Option<Toast>,
}

impl UiState {
    /// `prefers_dark` is the system color-scheme preference at startup.
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            dialog: None,
            dark_mode: prefers_dark,
            playback_rate: 1.0,
            selected_note: None,
            toast: None,
        }
    }

    /// The most recent toast, whether or not it has expired.
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn visible_toast_at(&self, now: Instant) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| t.is_visible_at(now))
    }

    /// Replaces the current toast and restarts its timer.
    pub fn notify(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        });
    }
}

pub struct ViewController {
    ui: UiState,
    store: NoteStore,
    gateway: ShareGateway,
    clipboard: Arc<dyn Clipboard>,
    player: Option<Box<dyn VideoPlayer>>,
    session: SessionMode,
    video_id: Option<String>,
    author_name: String,
    available: Vec<AvailableNotes>,
    origin: String,
}

impl ViewController {
    /// `origin` is the base used for shareable links.
    pub fn new(
        gateway: ShareGateway,
        clipboard: Arc<dyn Clipboard>,
        origin: impl Into<String>,
        prefers_dark: bool,
    ) -> Self {
        Self {
            ui: UiState::new(prefers_dark),
            store: NoteStore::new(),
            gateway,
            clipboard,
            player: None,
            session: SessionMode::Owner,
            video_id: None,
            author_name: String::new(),
            available: Vec::new(),
            origin: origin.into(),
        }
    }

    //-------------------------------------------------------------------------------------
    // Accessors
    //-------------------------------------------------------------------------------------

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn notes(&self) -> &[Note] {
        self.store.list()
    }

    pub fn session(&self) -> &SessionMode {
        &self.session
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn available_notes(&self) -> &[AvailableNotes] {
        &self.available
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.ui.selected_note.and_then(|i| self.store.get(i))
    }

    //-------------------------------------------------------------------------------------
    // Plain UI toggles
    //-------------------------------------------------------------------------------------

    /// Called once the embedded widget reports it is ready.
    pub fn attach_player(&mut self, player: Box<dyn VideoPlayer>) {
        self.ui.playback_rate = player.playback_rate();
        self.player = Some(player);
    }

    pub fn toggle_dark_mode(&mut self) {
        self.ui.dark_mode = !self.ui.dark_mode;
    }

    pub fn open_dialog(&mut self, dialog: Dialog) {
        self.ui.dialog = Some(dialog);
    }

    pub fn close_dialog(&mut self) {
        self.ui.dialog = None;
    }

    pub fn set_author_name(&mut self, name: impl Into<String>) {
        self.author_name = name.into();
    }

    //-------------------------------------------------------------------------------------
    // Loading
    //-------------------------------------------------------------------------------------

    /// Starts a local session for the video named by `url`.
    pub async fn load_video_url(&mut self, url: &str) {
        let Some(id) = extract_video_id(url) else {
            self.ui.notify(ToastKind::Error, "Please enter a valid YouTube URL");
            return;
        };

        let leaving_shared = matches!(
            self.session,
            SessionMode::ReadOnly { .. } | SessionMode::EditUnlocked { .. }
        );
        // Reloading the same video keeps the owner's notes and any share link.
        if leaving_shared || self.video_id.as_deref() != Some(id.as_str()) {
            self.store.clear();
            self.ui.selected_note = None;
            self.session = SessionMode::Owner;
        }
        self.store.set_mode(AccessMode::Editable);
        self.video_id = Some(id);
        self.refresh_available().await;
    }

    /// Opens someone's shared notes in read-only mode.
    pub async fn open_shared(&mut self, token: ShareToken) {
        match self.gateway.load(&token).await {
            Ok(record) => {
                self.video_id = Some(record.video_id);
                self.store.replace_all(record.notes);
                self.store.set_mode(AccessMode::ReadOnly);
                self.ui.selected_note = None;
                self.author_name = record.author_name.clone();
                self.ui.notify(
                    ToastKind::Success,
                    format!("Viewing notes shared by {}", record.author_name),
                );
                self.session = SessionMode::ReadOnly {
                    token,
                    author: record.author_name,
                };
                self.refresh_available().await;
            }
            Err(e) => {
                error!(share = %token, "failed to load shared notes: {e}");
                self.ui.notify(ToastKind::Error, "Failed to load shared notes");
            }
        }
    }

    /// Reloads the list of shares recorded for the current video.
    pub async fn refresh_available(&mut self) {
        let Some(video_id) = self.video_id.clone() else {
            return;
        };
        match self.gateway.list_available(&video_id).await {
            Ok(list) => self.available = list,
            Err(e) => {
                error!(video_id = %video_id, "failed to list shared notes: {e}");
                self.ui.notify(ToastKind::Error, "Failed to load available notes");
            }
        }
    }

    //-------------------------------------------------------------------------------------
    // Notes
    //-------------------------------------------------------------------------------------

    /// Adds a note anchored just before the current playback position.
    pub fn add_note(&mut self) -> Option<Note> {
        let now = self.player.as_ref()?.current_time();
        self.store.add(now)
    }

    pub fn edit_note(&mut self, id: &str, content: impl Into<String>) {
        self.store.edit(id, content);
    }

    /// Removes a note. The selection follows the note it pointed at and is
    /// cleared when that note is the one removed.
    pub fn delete_note(&mut self, id: &str) {
        let Some(position) = self.store.list().iter().position(|n| n.id == id) else {
            return;
        };
        if self.store.delete(id) {
            self.ui.selected_note = match self.ui.selected_note {
                Some(i) if i == position => None,
                Some(i) if i > position => Some(i - 1),
                other => other,
            };
            self.ui.notify(ToastKind::Success, "Note deleted");
        }
    }

    pub fn select_note(&mut self, index: usize) {
        let Some(timestamp) = self.store.get(index).map(|n| n.timestamp) else {
            return;
        };
        self.ui.selected_note = Some(index);
        self.jump_to(timestamp);
    }

    /// Moves the selection one note back or forward, wrapping at the ends.
    pub fn navigate(&mut self, direction: Direction) {
        if let Some(index) = self.store.navigate(direction, self.ui.selected_note) {
            self.select_note(index);
        }
    }

    //-------------------------------------------------------------------------------------
    // Playback
    //-------------------------------------------------------------------------------------

    pub fn jump_to(&mut self, timestamp: u64) {
        if let Some(player) = self.player.as_mut() {
            player.seek_to(timestamp as f64);
        }
    }

    /// Relative seek, never before the start of the video.
    pub fn seek_by(&mut self, delta_seconds: f64) {
        if let Some(player) = self.player.as_mut() {
            let target = (player.current_time() + delta_seconds).max(0.0);
            player.seek_to(target);
        }
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if let Some(player) = self.player.as_mut() {
            player.set_playback_rate(rate);
            self.ui.playback_rate = rate;
        }
    }

    /// Moves to the next listed rate; stays put at either end of the list.
    pub fn step_playback_rate(&mut self, faster: bool) {
        let current = self.ui.playback_rate;
        let next = if faster {
            PLAYBACK_RATES.iter().copied().find(|r| *r > current)
        } else {
            PLAYBACK_RATES.iter().rev().copied().find(|r| *r < current)
        };
        if let Some(rate) = next {
            self.set_playback_rate(rate);
        }
    }

    //-------------------------------------------------------------------------------------
    // Export and sharing
    //-------------------------------------------------------------------------------------

    /// Copies the notes in `format`. Not offered while viewing someone else's
    /// notes read-only.
    pub async fn export(&mut self, format: ExportFormat) {
        if !self.session.can_edit() {
            return;
        }
        let Some(video_id) = self.video_id.clone().filter(|_| !self.store.is_empty()) else {
            self.ui.notify(ToastKind::Error, "No notes to export");
            return;
        };

        let text = match format.format(self.store.list(), &video_id) {
            Ok(text) => text,
            Err(e) => {
                error!("failed to render {} export: {e}", format.id());
                self.ui.notify(ToastKind::Error, "Failed to export notes");
                return;
            }
        };

        match self.clipboard.write_text(&text).await {
            Ok(()) => self.ui.notify(
                ToastKind::Success,
                format!("Notes copied to clipboard as {}!", format.name()),
            ),
            Err(e) => {
                error!("clipboard write failed: {e}");
                self.ui.notify(ToastKind::Error, "Failed to copy to clipboard");
            }
        }
    }

    /// Creates a share, or updates the one this session is bound to, and
    /// copies its link to the clipboard.
    pub async fn share(&mut self, pin: &str) {
        if !self.session.can_edit() {
            debug!("ignoring share in read-only mode");
            return;
        }
        let Some(video_id) = self.video_id.clone().filter(|_| !self.store.is_empty()) else {
            self.ui.notify(ToastKind::Error, "No notes to share");
            return;
        };
        if self.author_name.trim().is_empty() {
            self.ui.dialog = Some(Dialog::Share);
            return;
        }

        let notes = self.store.list().to_vec();
        let outcome = match self.session.share_token().cloned() {
            Some(token) => self
                .gateway
                .update(&token, &self.author_name, &notes, pin)
                .await
                .map(|()| (token, true)),
            None => self
                .gateway
                .create(&video_id, &self.author_name, &notes, pin)
                .await
                .map(|token| (token, false)),
        };

        let (token, updated) = match outcome {
            Ok(done) => done,
            Err(e) => {
                self.report_share_error(&e);
                return;
            }
        };

        if !updated {
            self.session = SessionMode::Shared {
                token: token.clone(),
            };
        }
        self.ui.dialog = None;

        let link = share_url(&self.origin, &token);
        if let Err(e) = self.clipboard.write_text(&link).await {
            error!("clipboard write failed: {e}");
            self.ui.notify(ToastKind::Error, "Failed to copy to clipboard");
            return;
        }

        let message = if updated {
            "Notes updated successfully! Share URL copied to clipboard.".to_string()
        } else {
            format!("Share URL copied to clipboard! Your PIN code is: {pin}")
        };
        info!(share = %token, updated, "share link copied");
        self.ui.notify(ToastKind::Success, message);
    }

    /// Switches a read-only view to editing when `pin` matches the share.
    pub async fn unlock(&mut self, pin: &str) {
        let SessionMode::ReadOnly { token, .. } = &self.session else {
            return;
        };
        let token = token.clone();

        match self.gateway.verify_pin(&token, pin).await {
            Ok(true) => {
                self.session = SessionMode::EditUnlocked { token };
                self.store.set_mode(AccessMode::Editable);
                self.ui.dialog = None;
                self.ui.notify(ToastKind::Success, "Edit mode enabled");
            }
            Ok(false) => self.ui.notify(ToastKind::Error, "Incorrect PIN code"),
            Err(e) if e.is_validation() => self.ui.notify(ToastKind::Error, e.to_string()),
            Err(e) => {
                error!(share = %token, "failed to verify PIN: {e}");
                self.ui.notify(ToastKind::Error, "Failed to verify PIN code");
            }
        }
    }

    fn report_share_error(&mut self, e: &ShareError) {
        match e {
            ShareError::IncorrectPin => self.ui.notify(ToastKind::Error, e.to_string()),
            e if e.is_validation() => self.ui.notify(ToastKind::Error, e.to_string()),
            e => {
                error!("failed to share notes: {e}");
                self.ui.notify(ToastKind::Error, "Failed to share notes");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_hides_three_seconds_after_latest_message() {
        let mut ui = UiState::new(false);
        ui.notify(ToastKind::Success, "first");
        let shown = ui.toast().unwrap().shown_at;

        assert!(ui.visible_toast_at(shown + Duration::from_millis(2999)).is_some());
        assert!(ui.visible_toast_at(shown + TOAST_DURATION).is_none());
    }

    #[test]
    fn new_toast_replaces_message_and_restarts_timer() {
        let mut ui = UiState::new(false);
        ui.notify(ToastKind::Success, "first");
        let first = ui.toast().unwrap().shown_at;
        std::thread::sleep(Duration::from_millis(5));
        ui.notify(ToastKind::Error, "second");

        let toast = ui.toast().unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.shown_at > first);
        assert!(ui.visible_toast_at(first + TOAST_DURATION).is_some());
    }

    #[test]
    fn dark_mode_starts_from_system_preference() {
        assert!(UiState::new(true).dark_mode);
        assert!(!UiState::new(false).dark_mode);
        assert_eq!(UiState::new(false).playback_rate, 1.0);
    }
}
