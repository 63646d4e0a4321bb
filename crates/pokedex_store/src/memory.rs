//! In-memory record store.

use crate::error::StoreResult;
use crate::record::{Record, RecordId};
use crate::store::{Predicate, RecordStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-memory record store.
///
/// Holds two views of the data: the *working* view that reads and writes
/// go through, and the *committed* view that `save` publishes to and
/// `rollback` restores from. Suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral sessions that don't need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use pokedex_store::{InMemoryStore, Record, RecordStore};
///
/// let store = InMemoryStore::new();
/// store.upsert(Record::new(1)).unwrap();
/// assert!(store.has_pending_changes());
/// store.rollback().unwrap();
/// assert_eq!(store.count().unwrap(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    working: RwLock<BTreeMap<RecordId, Record>>,
    committed: RwLock<BTreeMap<RecordId, Record>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose committed state already holds `records`.
    ///
    /// Useful for simulating rows left over from a prior session. Later
    /// records win over earlier ones with the same id.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let map: BTreeMap<RecordId, Record> = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            working: RwLock::new(map.clone()),
            committed: RwLock::new(map),
        }
    }

    /// Returns a copy of the committed rows in id order.
    #[must_use]
    pub fn committed(&self) -> Vec<Record> {
        self.committed.read().values().cloned().collect()
    }

    /// Returns true if the working view differs from the committed view.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        *self.working.read() != *self.committed.read()
    }

    /// Returns a copy of the working rows in id order.
    pub(crate) fn snapshot(&self) -> Vec<Record> {
        self.working.read().values().cloned().collect()
    }
}

impl RecordStore for InMemoryStore {
    fn fetch_one(&self, id: RecordId) -> StoreResult<Option<Record>> {
        Ok(self.working.read().get(&id).cloned())
    }

    fn fetch_all(&self, predicate: Option<Predicate<'_>>) -> StoreResult<Vec<Record>> {
        let working = self.working.read();
        let rows = match predicate {
            Some(matches) => working.values().filter(|r| matches(r)).cloned().collect(),
            None => working.values().cloned().collect(),
        };
        Ok(rows)
    }

    fn upsert(&self, record: Record) -> StoreResult<()> {
        self.working.write().insert(record.id, record);
        Ok(())
    }

    fn delete_all(&self) -> StoreResult<()> {
        self.working.write().clear();
        Ok(())
    }

    // Copy under one lock, then publish under the other; never hold both.
    fn save(&self) -> StoreResult<()> {
        let staged = self.working.read().clone();
        *self.committed.write() = staged;
        Ok(())
    }

    fn rollback(&self) -> StoreResult<()> {
        let restored = self.committed.read().clone();
        *self.working.write() = restored;
        Ok(())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.working.read().len())
    }
}
