//! Download filename conventions

use chrono::{DateTime, Utc};

/// Replace every non-alphanumeric character one-for-one with `_`
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// `{SanitizedTitle}.{ext}` for notes
pub fn note_filename(title: &str, ext: &str) -> String {
    format!("{}.{ext}", sanitize_title(title))
}

/// `Chat_{ISODate}.{ext}` for chat transcripts
pub fn chat_filename(updated_at: DateTime<Utc>, ext: &str) -> String {
    format!("Chat_{}.{ext}", updated_at.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_sanitize_replaces_one_for_one() {
        assert_eq!(note_filename("OS: Chapter 1!!", "pdf"), "OS__Chapter_1__.pdf");
    }

    #[test]
    fn test_plain_title_unchanged() {
        assert_eq!(sanitize_title("Summary2024"), "Summary2024");
    }

    #[test]
    fn test_chat_filename_uses_iso_date() {
        let when = Utc.with_ymd_and_hms(2024, 3, 9, 15, 30, 0).unwrap();
        assert_eq!(chat_filename(when, "docx"), "Chat_2024-03-09.docx");
    }
}
