//! Human-readable video positions.

/// Formats whole seconds as `H:MM:SS` once past the hour, `MM:SS` before it.
pub fn format_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds_under_an_hour() {
        assert_eq!(format_timestamp(0), "00:00");
        assert_eq!(format_timestamp(65), "01:05");
        assert_eq!(format_timestamp(3599), "59:59");
    }

    #[test]
    fn adds_unpadded_hours_from_one_hour_on() {
        assert_eq!(format_timestamp(3600), "1:00:00");
        assert_eq!(format_timestamp(3725), "1:02:05");
        assert_eq!(format_timestamp(36_000 + 61), "10:01:01");
    }
}
