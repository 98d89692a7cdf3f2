//! Application-level utilities for the Dear Diary CLI.
//!
//! - Config path resolution
//! - The lazily loaded application context
//! - The prompting wallet that supplies signatures

mod context;
mod resolver;
mod signature;

pub use context::AppContext;
