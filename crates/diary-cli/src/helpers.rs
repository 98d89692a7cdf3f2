//! Input and parsing helpers for the CLI.

use std::io::{self, IsTerminal, Read};

use chrono::{DateTime, NaiveDate, Utc};
use dialoguer::{Editor, Input};

/// Whether prompts may be shown.
pub fn is_interactive(no_input: bool) -> bool {
    !no_input && io::stdin().is_terminal()
}

/// Parse a datetime string (ISO-8601 or YYYY-MM-DD).
pub fn parse_datetime(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid date value: {}", value))?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    Err(anyhow::anyhow!(
        "Invalid date/time (expected ISO-8601 or YYYY-MM-DD): {}",
        value
    ))
}

/// Title from `--title`, else a prompt.
pub fn read_title(no_input: bool, title: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = title {
        return Ok(value);
    }
    if !is_interactive(no_input) {
        return Err(anyhow::anyhow!(
            "No title provided.\nHint: pass --title \"...\""
        ));
    }
    Input::<String>::new()
        .with_prompt("Title")
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read title: {}", e))
}

/// Body from `--body`, piped stdin, or `$EDITOR`.
pub fn read_body(no_input: bool, body: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = body {
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        return Ok(buffer.trim_end().to_string());
    }

    if no_input {
        return Err(anyhow::anyhow!(
            "No body provided.\nHint: pass --body \"...\" or pipe text on stdin"
        ));
    }

    let edited = Editor::new()
        .edit("")
        .map_err(|e| anyhow::anyhow!("Failed to open editor: {}", e))?;
    edited.ok_or_else(|| anyhow::anyhow!("Editor closed without saving; nothing to add"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_datetime_rfc3339() {
        let parsed = parse_datetime("2024-03-01T12:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_date_only() {
        let parsed = parse_datetime("2024-01-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        let err = parse_datetime("last tuesday").unwrap_err();
        assert!(err.to_string().contains("Invalid date/time"));
    }

    #[test]
    fn test_flags_bypass_prompts() {
        assert_eq!(read_title(true, Some("Hi".into())).unwrap(), "Hi");
        assert_eq!(read_body(true, Some("Body".into())).unwrap(), "Body");
    }
}
