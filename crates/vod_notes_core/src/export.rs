//! crates/vod_notes_core/src/export.rs
//!
//! Text renderings of a note collection for the "copy as ..." actions.
//! Both outputs are a pure function of the notes and the video id.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::Note;
use crate::time::format_timestamp;
use crate::url::watch_url;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
    #[error("Failed to serialize notes: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Markdown, ExportFormat::Json];

    /// Stable identifier used to select the format.
    pub fn id(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Json => "json",
        }
    }

    /// Name shown to the user.
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "Markdown",
            ExportFormat::Json => "JSON",
        }
    }

    pub fn format(self, notes: &[Note], video_id: &str) -> Result<String, ExportError> {
        match self {
            ExportFormat::Markdown => Ok(to_markdown(notes, video_id)),
            ExportFormat::Json => to_json(notes, video_id),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExportError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sorted(notes: &[Note]) -> Vec<&Note> {
    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by_key(|n| n.timestamp);
    sorted
}

/// One `###` section per note, linked to the moment in the video.
pub fn to_markdown(notes: &[Note], video_id: &str) -> String {
    sorted(notes)
        .into_iter()
        .map(|note| {
            let tags = if note.tags.is_empty() {
                String::new()
            } else {
                format!("\nTags: {}", note.tags.join(", "))
            };
            format!(
                "### [{}]({})\n\n{}{}\n\n",
                format_timestamp(note.timestamp),
                watch_url(video_id, note.timestamp),
                note.content,
                tags
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    video_id: &'a str,
    notes: &'a [Note],
}

/// `{ "videoId": ..., "notes": [...] }`, pretty-printed with two spaces.
pub fn to_json(notes: &[Note], video_id: &str) -> Result<String, ExportError> {
    let doc = ExportDocument { video_id, notes };
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(id: &str, timestamp: u64, content: &str, tags: &[&str]) -> Note {
        Note {
            id: id.to_string(),
            content: content.to_string(),
            timestamp,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn markdown_links_heading_to_timestamp_and_lists_tags() {
        let out = to_markdown(&[note("1", 65, "hi", &["x"])], "abc");
        assert_eq!(
            out,
            "### [01:05](https://youtube.com/watch?v=abc&t=65)\n\nhi\nTags: x\n\n"
        );
    }

    #[test]
    fn markdown_orders_by_timestamp_and_omits_empty_tags() {
        let notes = vec![
            note("2", 3725, "later", &["a", "b", "c"]),
            note("1", 5, "early", &[]),
        ];
        let out = to_markdown(&notes, "vid");
        assert_eq!(
            out,
            "### [00:05](https://youtube.com/watch?v=vid&t=5)\n\nearly\n\n\
             \n\n\
             ### [1:02:05](https://youtube.com/watch?v=vid&t=3725)\n\nlater\nTags: a, b, c\n\n"
        );
    }

    #[test]
    fn markdown_of_no_notes_is_empty() {
        assert_eq!(to_markdown(&[], "vid"), "");
    }

    #[test]
    fn json_has_video_id_first_and_two_space_indent() {
        let out = to_json(&[note("1", 65, "hi", &["x"])], "abc").unwrap();
        assert!(out.starts_with("{\n  \"videoId\": \"abc\",\n  \"notes\": [\n    {\n      \"id\": \"1\""));
    }

    #[test]
    fn json_round_trips_every_note_field() {
        let original = vec![note("1", 65, "hi", &["x"])];
        let out = ExportFormat::Json.format(&original, "abc").unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["videoId"], "abc");
        let parsed: Vec<Note> = serde_json::from_value(value["notes"].clone()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn formats_are_selected_by_identifier() {
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!(
            "csv".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(f)) if f == "csv"
        ));
        assert_eq!(ExportFormat::Json.name(), "JSON");
    }
}
