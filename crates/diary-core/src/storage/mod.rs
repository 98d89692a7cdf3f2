//! Storage abstraction for Dear Diary.
//!
//! Entries live in two external services: a content-addressed store that
//! holds each envelope, and a registry that records which identifiers
//! belong to which wallet. Neither ever sees plaintext of a sealed entry.
//!
//! - `traits`: the `Wallet`, `Registry` and `ContentStore` interfaces
//! - `local`: filesystem-backed implementations (used by the CLI)
//! - `memory`: in-memory implementations with failure injection

pub mod local;
pub mod memory;
pub mod traits;
pub mod types;

pub use local::{LocalContentStore, LocalRegistry};
pub use memory::{MemoryContentStore, MemoryRegistry, StaticWallet};
pub use traits::{ContentStore, Registry, Wallet};
pub use types::{ContentId, HydratedEntry, Receipt, StoredEntry, TransactionId};
