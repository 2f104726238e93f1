//! The debug memory store.
//!
//! Entries are loaded into memory on startup and flushed to storage on
//! every record. Writes are serialized through an `RwLock` writer guard
//! to preserve the eviction invariant; reads see some consistent prior
//! state. Scoped to one running instance — no cross-process locking.

use crate::backend::StorageBackend;
use snapsolve_core::PreviousSolution;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// How many attempts the store retains by default.
pub const DEFAULT_RETENTION: usize = 10;

/// Bounded, newest-first history of prior solution attempts.
///
/// Invariant: `len() <= retention` at all times; recording evicts the
/// oldest entries once the cap is exceeded.
pub struct DebugMemoryStore {
    entries: RwLock<Vec<PreviousSolution>>,
    backend: Arc<dyn StorageBackend>,
    retention: usize,
}

impl DebugMemoryStore {
    /// Load the store from durable storage. Absent or corrupt data starts
    /// an empty store; this never raises to the caller.
    pub async fn load(backend: Arc<dyn StorageBackend>) -> Self {
        let entries = match backend.read_all().await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<PreviousSolution>>(&bytes) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Debug memory corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Debug memory unreadable, starting empty");
                Vec::new()
            }
        };
        debug!(count = entries.len(), "Debug memory loaded");
        Self {
            entries: RwLock::new(entries),
            backend,
            retention: DEFAULT_RETENTION,
        }
    }

    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    /// Prepend a new attempt, evict beyond the cap, and persist.
    /// Persistence errors are logged, not propagated.
    pub async fn record(&self, solution: PreviousSolution) {
        // Persist while still holding the writer guard so concurrent
        // records cannot flush out of order.
        let mut entries = self.entries.write().await;
        entries.insert(0, solution);
        entries.truncate(self.retention);
        self.persist(&entries).await;
    }

    /// Up to `limit` entries whose problem statement matches exactly,
    /// newest first.
    pub async fn recent_for(&self, problem_statement: &str, limit: usize) -> Vec<PreviousSolution> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|s| s.problem_statement == problem_statement)
            .take(limit)
            .cloned()
            .collect()
    }

    /// The most recent successful attempt for a problem, if any.
    pub async fn last_working_for(&self, problem_statement: &str) -> Option<PreviousSolution> {
        self.entries
            .read()
            .await
            .iter()
            .find(|s| s.problem_statement == problem_statement && s.success)
            .cloned()
    }

    /// Number of retained entries.
    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Drop all entries and persist the empty state.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
        self.persist(&[]).await;
    }

    async fn persist(&self, entries: &[PreviousSolution]) {
        let bytes = match serde_json::to_vec(entries) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Failed to serialize debug memory");
                return;
            }
        };
        if let Err(e) = self.backend.write_all(&bytes).await {
            warn!(error = %e, "Failed to persist debug memory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FileStorage, InMemoryStorage};

    fn attempt(problem: &str, success: bool, code: &str) -> PreviousSolution {
        PreviousSolution::new(code, success, "python", problem)
    }

    async fn empty_store() -> DebugMemoryStore {
        DebugMemoryStore::load(Arc::new(InMemoryStorage::new())).await
    }

    #[tokio::test]
    async fn cap_keeps_ten_newest_first() {
        let store = empty_store().await;
        for i in 0..15 {
            store.record(attempt("Two Sum", false, &format!("v{i}"))).await;
        }

        assert_eq!(store.count().await, 10);
        let recent = store.recent_for("Two Sum", 10).await;
        assert_eq!(recent.len(), 10);
        // The 10 most recently recorded, newest first.
        assert_eq!(recent[0].code, "v14");
        assert_eq!(recent[9].code, "v5");
    }

    #[tokio::test]
    async fn exact_match_never_cross_matches() {
        let store = empty_store().await;
        store.record(attempt("Two Sum", false, "a")).await;
        store.record(attempt("Two Sum II", false, "b")).await;

        let recent = store.recent_for("Two Sum", 10).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].code, "a");

        let recent = store.recent_for("Two Sum II", 10).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].code, "b");
    }

    #[tokio::test]
    async fn last_working_skips_failures() {
        let store = empty_store().await;
        store.record(attempt("Two Sum", true, "working")).await;
        store.record(attempt("Two Sum", false, "broken")).await;

        let working = store.last_working_for("Two Sum").await.unwrap();
        assert_eq!(working.code, "working");
        assert!(store.last_working_for("Other Problem").await.is_none());
    }

    #[tokio::test]
    async fn limit_is_honored() {
        let store = empty_store().await;
        for i in 0..5 {
            store.record(attempt("Two Sum", false, &format!("v{i}"))).await;
        }
        assert_eq!(store.recent_for("Two Sum", 3).await.len(), 3);
    }

    #[tokio::test]
    async fn persistence_round_trip_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug_memory.json");

        let store = DebugMemoryStore::load(Arc::new(FileStorage::new(path.clone()))).await;
        for i in 0..4 {
            store.record(attempt("Reverse List", false, &format!("v{i}"))).await;
        }
        let before = store.recent_for("Reverse List", 10).await;

        let reloaded = DebugMemoryStore::load(Arc::new(FileStorage::new(path))).await;
        let after = reloaded.recent_for("Reverse List", 10).await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn corrupt_storage_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug_memory.json");
        std::fs::write(&path, b"this is not json").unwrap();

        let store = DebugMemoryStore::load(Arc::new(FileStorage::new(path))).await;
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn clear_persists_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug_memory.json");

        let store = DebugMemoryStore::load(Arc::new(FileStorage::new(path.clone()))).await;
        store.record(attempt("Two Sum", false, "a")).await;
        store.clear().await;

        let reloaded = DebugMemoryStore::load(Arc::new(FileStorage::new(path))).await;
        assert_eq!(reloaded.count().await, 0);
    }
}
