//! Config path resolution.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::default_config_path;

/// `--config` / `DIARY_CONFIG`, else the XDG default.
pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    match cli.config.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => default_config_path(),
    }
}

/// Message for a missing config file.
pub fn missing_config_message(config_path: &Path) -> String {
    format!("No diary configured at {}", config_path.display())
}

/// Hint paired with [`missing_config_message`].
pub const MISSING_CONFIG_HINT: &str =
    "Hint: Run `diary init --address <WALLET>` or point DIARY_CONFIG at an existing config.";
