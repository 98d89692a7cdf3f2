//! Output mode routing.

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Machine-readable JSON only
    Json,
    /// Stable line output for scripts and logs
    #[default]
    Plain,
    /// Tables and colors (TTY only)
    Pretty,
}

impl OutputMode {
    /// Resolve the mode from flags and the terminal.
    ///
    /// `--json` always wins. `--format plain` or `TERM=dumb` force plain.
    /// Otherwise a TTY gets pretty output and everything else plain.
    pub fn resolve(
        json_flag: bool,
        format_flag: Option<&str>,
        is_tty: bool,
        term_is_dumb: bool,
    ) -> Self {
        if json_flag {
            return Self::Json;
        }
        match format_flag {
            Some("json") => return Self::Json,
            Some("plain") => return Self::Plain,
            _ => {}
        }
        if is_tty && !term_is_dumb {
            Self::Pretty
        } else {
            Self::Plain
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json)
    }

    pub fn is_pretty(&self) -> bool {
        matches!(self, Self::Pretty)
    }
}

/// Check a `--format` value.
pub fn validate_format(value: &str) -> anyhow::Result<()> {
    match value {
        "table" | "plain" | "json" => Ok(()),
        other => Err(anyhow::anyhow!(
            "Unknown format \"{}\" (expected table, plain, or json)",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_flag_wins() {
        let mode = OutputMode::resolve(true, Some("plain"), true, false);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn test_format_plain_on_tty() {
        let mode = OutputMode::resolve(false, Some("plain"), true, false);
        assert_eq!(mode, OutputMode::Plain);
    }

    #[test]
    fn test_format_json_without_flag() {
        let mode = OutputMode::resolve(false, Some("json"), false, false);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn test_dumb_terminal_is_plain() {
        let mode = OutputMode::resolve(false, None, true, true);
        assert_eq!(mode, OutputMode::Plain);
    }

    #[test]
    fn test_tty_defaults_to_pretty() {
        assert_eq!(
            OutputMode::resolve(false, Some("table"), true, false),
            OutputMode::Pretty
        );
        assert_eq!(
            OutputMode::resolve(false, None, false, false),
            OutputMode::Plain
        );
    }

    #[test]
    fn test_validate_format() {
        assert!(validate_format("table").is_ok());
        assert!(validate_format("yaml").is_err());
    }
}
