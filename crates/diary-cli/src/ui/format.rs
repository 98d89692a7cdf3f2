//! String formatting for list and detail views.

use chrono::{DateTime, Utc};

/// Truncate to `max_len` characters, ending with "..." when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let kept: String = s.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}

/// Collapse newlines so a value fits one table cell.
pub fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Render a record timestamp. Unparseable values are shown as stored.
pub fn format_timestamp(raw: &str, parsed: Option<DateTime<Utc>>, pretty: bool) -> String {
    match parsed {
        Some(dt) if pretty => dt.format("%Y-%m-%d %H:%M").to_string(),
        Some(dt) => dt.to_rfc3339(),
        None => raw.to_string(),
    }
}

/// Render tags for display; empty shows a dash.
pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hello", 2), "he");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("caf\u{e9}s and more", 7), "caf\u{e9}...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("a\nb\r\nc"), "a b c");
    }

    #[test]
    fn test_format_timestamp() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
        assert_eq!(format_timestamp("x", Some(dt), true), "2024-01-01 09:30");
        assert_eq!(
            format_timestamp("x", Some(dt), false),
            "2024-01-01T09:30:00+00:00"
        );
        assert_eq!(format_timestamp("yesterday", None, true), "yesterday");
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(&[]), "-");
        assert_eq!(
            format_tags(&["x".to_string(), "y".to_string()]),
            "x, y"
        );
    }
}
