//! Video identifiers and the links built around them.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::ShareToken;

/// Base of the watch links emitted in exports.
pub const WATCH_URL: &str = "https://youtube.com/watch";

static VIDEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:youtube(?:-nocookie)?\.com/(?:watch\?(?:[^#]*&)?v=|embed/|shorts/|live/|v/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    )
    .expect("video url pattern compiles")
});

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id pattern compiles"));

/// Pulls the 11-character video id out of a watch, short, embed or shorts
/// link. A bare id is accepted as-is.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if BARE_ID.is_match(input) {
        return Some(input.to_string());
    }
    VIDEO_URL
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Link that opens the video at a given second.
pub fn watch_url(video_id: &str, seconds: u64) -> String {
    format!("{WATCH_URL}?v={video_id}&t={seconds}")
}

/// `<origin>/shared/<token>`, the link handed out after sharing.
pub fn share_url(origin: &str, token: &ShareToken) -> String {
    format!("{}/shared/{}", origin.trim_end_matches('/'), token)
}
