//! UI primitives for the Dear Diary CLI.
//!
//! - **Context**: Environment detection (TTY, width, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badges and owo-colors styles
//! - **Render**: Tables, headers, receipts, hints
//! - **Progress**: Spinner while entries hydrate
//! - **Format**: String utilities (truncate, timestamps, tags)

mod context;
pub mod format;
pub mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::validate_format;
pub use theme::Badge;

pub use render::{badge, header, hint, kv, print_error, receipt, table, Row};

pub use progress::Spinner;
