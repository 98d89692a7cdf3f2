//! Log setup for the CLI.
//!
//! Logs go to stderr so stdout stays clean for `--json` output.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "DIARY_LOG";

/// Resolve the filter: `DIARY_LOG` wins, else verbosity from `-v` flags.
fn filter_for(verbosity: u8) -> EnvFilter {
    if let Ok(directive) = std::env::var(LOG_ENV) {
        if let Ok(filter) = EnvFilter::try_new(&directive) {
            return filter;
        }
    }
    let level = match verbosity {
        0 => "warn",
        1 => "diary_core=debug,diary_cli=debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
