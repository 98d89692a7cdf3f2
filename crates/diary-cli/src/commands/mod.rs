//! Command handlers, one module per subcommand.

pub mod add;
pub mod init;
pub mod list;
pub mod misc;
pub mod show;
