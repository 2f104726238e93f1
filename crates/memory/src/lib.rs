//! Debugging memory — bounded, persisted history of prior solution
//! attempts, keyed by problem statement.
//!
//! The store holds at most [`store::DEFAULT_RETENTION`] entries, newest
//! first, and persists to durable storage on every write. Matching is by
//! exact string equality on the problem statement; no fuzzy matching is
//! performed — a documented limitation, not a defect.

pub mod backend;
pub mod store;

pub use backend::{FileStorage, InMemoryStorage, StorageBackend};
pub use store::DebugMemoryStore;
