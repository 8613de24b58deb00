//! Test Store Manager
//!
//! Provides isolated card stores for testing:
//! - Fresh in-memory stores per test
//! - Pre-seeded stores with test data
//! - JSON snapshots written to a temporary directory and restored from disk

use std::path::{Path, PathBuf};
use std::sync::Once;

use cadence_core::{CardStore, InMemoryStore, ReviewOutcome};
use chrono::{DateTime, Utc};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use crate::mocks::TestDataFactory;

static TRACING: Once = Once::new();

/// Install a test subscriber once per process; honours `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Manager for test stores
///
/// Each manager owns its own store and snapshot directory, so tests never
/// share state. The directory is removed when the manager is dropped.
///
/// # Example
///
/// ```rust,ignore
/// let mut db = TestStoreManager::new_temp();
/// db.seed_cards(10, now);
///
/// db.take_snapshot();
/// db.clear();
/// db.restore_snapshot();
/// ```
pub struct TestStoreManager {
    /// The store instance
    pub store: InMemoryStore,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: TempDir,
    /// Path of the JSON snapshot file
    snapshot_path: PathBuf,
}

impl TestStoreManager {
    /// Create an empty store with a temporary snapshot directory
    pub fn new_temp() -> Self {
        init_tracing();
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let snapshot_path = temp_dir.path().join("cadence_snapshot.json");

        Self {
            store: InMemoryStore::new(),
            _temp_dir: temp_dir,
            snapshot_path,
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn card_count(&self) -> usize {
        self.store.len()
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Seed the store with new vocabulary/grammar cards
    pub fn seed_cards(&mut self, count: usize, now: DateTime<Utc>) -> Vec<String> {
        TestDataFactory::create_batch(&mut self.store, count, now)
    }

    /// Seed with one card per learning state
    pub fn seed_with_learning_states(&mut self, now: DateTime<Utc>) -> Vec<String> {
        TestDataFactory::create_scheduling_scenario(&mut self.store, now).card_ids
    }

    // ========================================================================
    // SNAPSHOT/RESTORE
    // ========================================================================

    /// Write the current store to the snapshot file
    pub fn take_snapshot(&self) {
        let json = self.store.export_json().expect("Failed to encode snapshot");
        std::fs::write(&self.snapshot_path, json).expect("Failed to write snapshot");
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot_path.exists()
    }

    /// Replace the store with the snapshot file's contents
    ///
    /// Ids and sync versions are preserved.
    pub fn restore_snapshot(&mut self) -> bool {
        if !self.has_snapshot() {
            return false;
        }
        let json = std::fs::read_to_string(&self.snapshot_path).expect("Failed to read snapshot");
        self.store = InMemoryStore::import_json(&json).expect("Failed to decode snapshot");
        true
    }

    // ========================================================================
    // PERSISTING REVIEWS
    // ========================================================================

    /// Persist a rated card and its log entry the way a host would
    ///
    /// A stale card surfaces as `SchedulerError::Store`.
    pub fn persist(&mut self, outcome: ReviewOutcome) -> cadence_core::Result<()> {
        self.store.save(outcome.card)?;
        self.store.append_log(outcome.log)?;
        Ok(())
    }

    // ========================================================================
    // CLEANUP
    // ========================================================================

    /// Drop all cards and logs; the snapshot file is kept
    pub fn clear(&mut self) {
        self.store = InMemoryStore::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_temp_store_creation() {
        let db = TestStoreManager::new_temp();
        assert!(db.is_empty());
        assert!(!db.has_snapshot());
    }

    #[test]
    fn test_seed_cards() {
        let mut db = TestStoreManager::new_temp();
        let ids = db.seed_cards(10, now());

        assert_eq!(ids.len(), 10);
        assert_eq!(db.card_count(), 10);
    }

    #[test]
    fn test_seed_learning_states() {
        let mut db = TestStoreManager::new_temp();
        assert_eq!(db.seed_with_learning_states(now()).len(), 4);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut db = TestStoreManager::new_temp();
        let ids = db.seed_cards(5, now());

        db.take_snapshot();
        assert!(db.has_snapshot());

        db.clear();
        assert!(db.is_empty());

        assert!(db.restore_snapshot());
        assert_eq!(db.card_count(), 5);
        for id in ids {
            assert!(db.store.load(&id).is_ok());
        }
    }

    #[test]
    fn test_restore_without_snapshot() {
        let mut db = TestStoreManager::new_temp();
        db.seed_cards(2, now());
        assert!(!db.restore_snapshot());
        assert_eq!(db.card_count(), 2);
    }

    #[test]
    fn test_persist_reports_stale_card_as_scheduler_error() {
        use cadence_core::{Rating, SchedulerError, SessionManager, StoreError, StudyScheduler};

        let mut db = TestStoreManager::new_temp();
        db.seed_cards(1, now());
        let pool = db.store.all().unwrap();

        let mut first = SessionManager::new(TestDataFactory::scheduler(1), StudyScheduler::new());
        let mut second = SessionManager::new(TestDataFactory::scheduler(2), StudyScheduler::new());
        first.start_at(pool.clone(), now()).unwrap();
        second.start_at(pool, now()).unwrap();

        db.persist(first.answer_at(Rating::Good, now()).unwrap()).unwrap();
        assert_eq!(db.store.logs().unwrap().len(), 1);

        // Both copies carry version 1; the second write loses
        let err = db.persist(second.answer_at(Rating::Again, now()).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::Store(StoreError::VersionConflict { stored: 1, incoming: 1, .. })
        ));
        assert_eq!(db.store.logs().unwrap().len(), 1);
    }
}
