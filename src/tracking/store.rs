//! Tracking record storage.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::persistence::PersistenceError;
use crate::source::RepositorySlug;

use super::TrackingRecord;

/// Loads and persists the tracking record of a repository.
///
/// Implementations must return exactly what was last persisted for the
/// repository, or an empty record when nothing was.
#[cfg_attr(test, mockall::automock)]
pub trait TrackingStore: Send + Sync {
    /// Loads the record for `repo`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the backing store cannot be read.
    fn load(&self, repo: &RepositorySlug) -> Result<TrackingRecord, PersistenceError>;

    /// Replaces the stored record for `repo` with `record`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the backing store cannot be written.
    fn persist(
        &self,
        repo: &RepositorySlug,
        record: &TrackingRecord,
    ) -> Result<(), PersistenceError>;
}

/// Process-local tracking store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryTrackingStore {
    records: Mutex<HashMap<String, TrackingRecord>>,
}

impl InMemoryTrackingStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackingStore for InMemoryTrackingStore {
    fn load(&self, repo: &RepositorySlug) -> Result<TrackingRecord, PersistenceError> {
        let records = self.records.lock().map_err(|_| PersistenceError::QueryFailed {
            message: "in-memory tracking store lock poisoned".to_owned(),
        })?;
        Ok(records.get(&repo.to_string()).cloned().unwrap_or_default())
    }

    fn persist(
        &self,
        repo: &RepositorySlug,
        record: &TrackingRecord,
    ) -> Result<(), PersistenceError> {
        let mut records = self.records.lock().map_err(|_| PersistenceError::WriteFailed {
            message: "in-memory tracking store lock poisoned".to_owned(),
        })?;
        records.insert(repo.to_string(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryTrackingStore, TrackingStore};
    use crate::source::RepositorySlug;
    use crate::source::test_support::{fixed_now, issue_open_for_days};
    use crate::tracking::TrackingRecord;

    #[test]
    fn in_memory_store_keeps_records_per_repository() {
        let store = InMemoryTrackingStore::new();
        let first = RepositorySlug::new("octo", "one").expect("slug should be valid");
        let second = RepositorySlug::new("octo", "two").expect("slug should be valid");
        let mut record = TrackingRecord::new();
        record.record_issue(&issue_open_for_days(1, 9, fixed_now()), fixed_now());

        store.persist(&first, &record).expect("persist should succeed");

        assert_eq!(store.load(&first).expect("load should succeed"), record);
        assert!(store.load(&second).expect("load should succeed").is_empty());
    }
}
