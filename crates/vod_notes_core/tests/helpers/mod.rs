use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};
use vod_notes_core::{
    AvailableNotes, Clipboard, NewSharedRecord, Note, PortError, PortResult, ShareToken,
    SharedNotesRepository, SharedRecord, VideoPlayer,
};

/// In-memory share store that counts every call made against it.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingRepository {
    inner: Mutex<RepoState>,
}

#[derive(Default)]
struct RepoState {
    rows: Vec<(SharedRecord, String)>,
    calls: usize,
    failing: bool,
}

#[allow(dead_code)]
impl RecordingRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seeds a record directly, bypassing the call counter.
    pub fn seed(&self, token: &str, video_id: &str, author: &str, notes: Vec<Note>, pin: &str) {
        let mut state = self.inner.lock().unwrap();
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::minutes(state.rows.len() as i64);
        state.rows.push((
            SharedRecord {
                share_token: ShareToken::new(token),
                video_id: video_id.to_string(),
                author_name: author.to_string(),
                notes,
                created_at,
            },
            pin.to_string(),
        ));
    }

    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    pub fn record(&self, token: &str) -> Option<SharedRecord> {
        self.inner
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|(r, _)| r.share_token.as_str() == token)
            .map(|(r, _)| r.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    fn enter(&self) -> PortResult<std::sync::MutexGuard<'_, RepoState>> {
        let mut state = self.inner.lock().unwrap();
        state.calls += 1;
        if state.failing {
            return Err(PortError::Unexpected("store offline".to_string()));
        }
        Ok(state)
    }
}

#[async_trait]
impl SharedNotesRepository for RecordingRepository {
    async fn insert(&self, record: NewSharedRecord) -> PortResult<SharedRecord> {
        let mut state = self.enter()?;
        let n = state.rows.len();
        let stored = SharedRecord {
            share_token: ShareToken::new(format!("share-{n}")),
            video_id: record.video_id,
            author_name: record.author_name,
            notes: record.notes,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + Duration::minutes(n as i64),
        };
        state.rows.push((stored.clone(), record.pin.as_str().to_string()));
        Ok(stored)
    }

    async fn get_by_token(&self, token: &ShareToken) -> PortResult<SharedRecord> {
        let state = self.enter()?;
        state
            .rows
            .iter()
            .find(|(r, _)| &r.share_token == token)
            .map(|(r, _)| r.clone())
            .ok_or_else(|| PortError::NotFound(token.to_string()))
    }

    async fn get_pin(&self, token: &ShareToken) -> PortResult<String> {
        let state = self.enter()?;
        state
            .rows
            .iter()
            .find(|(r, _)| &r.share_token == token)
            .map(|(_, pin)| pin.clone())
            .ok_or_else(|| PortError::NotFound(token.to_string()))
    }

    async fn update_notes(&self, token: &ShareToken, author_name: &str, notes: &[Note]) -> PortResult<()> {
        let mut state = self.enter()?;
        let (record, _) = state
            .rows
            .iter_mut()
            .find(|(r, _)| &r.share_token == token)
            .ok_or_else(|| PortError::NotFound(token.to_string()))?;
        record.author_name = author_name.to_string();
        record.notes = notes.to_vec();
        Ok(())
    }

    async fn list_for_video(&self, video_id: &str) -> PortResult<Vec<AvailableNotes>> {
        let state = self.enter()?;
        let mut list: Vec<AvailableNotes> = state
            .rows
            .iter()
            .filter(|(r, _)| r.video_id == video_id)
            .map(|(r, _)| AvailableNotes {
                author_name: r.author_name.clone(),
                created_at: r.created_at,
                share_token: r.share_token.clone(),
            })
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }
}

/// Observable state of the fake video widget.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct PlayerState {
    pub time: f64,
    pub rate: f64,
    pub seeks: Vec<f64>,
}

#[allow(dead_code)]
pub struct FakePlayer(pub Arc<Mutex<PlayerState>>);

#[allow(dead_code)]
impl FakePlayer {
    pub fn at(time: f64) -> (Box<dyn VideoPlayer>, Arc<Mutex<PlayerState>>) {
        let state = Arc::new(Mutex::new(PlayerState {
            time,
            rate: 1.0,
            seeks: Vec::new(),
        }));
        (Box::new(FakePlayer(state.clone())), state)
    }
}

impl VideoPlayer for FakePlayer {
    fn current_time(&self) -> f64 {
        self.0.lock().unwrap().time
    }

    fn seek_to(&mut self, seconds: f64) {
        let mut state = self.0.lock().unwrap();
        state.time = seconds;
        state.seeks.push(seconds);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.0.lock().unwrap().rate = rate;
    }

    fn playback_rate(&self) -> f64 {
        self.0.lock().unwrap().rate
    }
}

#[allow(dead_code)]
#[derive(Default)]
pub struct FakeClipboard {
    pub writes: Mutex<Vec<String>>,
    pub failing: Mutex<bool>,
}

#[allow(dead_code)]
impl FakeClipboard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn last(&self) -> Option<String> {
        self.writes.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Clipboard for FakeClipboard {
    async fn write_text(&self, text: &str) -> PortResult<()> {
        if *self.failing.lock().unwrap() {
            return Err(PortError::Unexpected("clipboard denied".to_string()));
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[allow(dead_code)]
pub fn note(id: &str, timestamp: u64, content: &str) -> Note {
    Note {
        id: id.to_string(),
        content: content.to_string(),
        timestamp,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        tags: Vec::new(),
    }
}
