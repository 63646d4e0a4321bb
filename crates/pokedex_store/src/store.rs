//! Record store trait definition.

use crate::error::StoreResult;
use crate::record::{Record, RecordId};

/// Row filter passed to [`RecordStore::fetch_all`].
pub type Predicate<'a> = &'a dyn Fn(&Record) -> bool;

/// A key-indexed store of [`Record`] rows.
///
/// # Invariants
///
/// - `id` uniquely identifies a row; `upsert` replaces, never duplicates
/// - Writes are staged until `save` commits them
/// - Reads (`fetch_one`, `fetch_all`) observe staged writes
/// - `fetch_all` returns rows in ascending id order
/// - Stores must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing
/// - [`super::FileStore`] - For persistent storage
pub trait RecordStore: Send + Sync {
    /// Fetches the row with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn fetch_one(&self, id: RecordId) -> StoreResult<Option<Record>>;

    /// Fetches every row, optionally restricted to rows matching `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn fetch_all(&self, predicate: Option<Predicate<'_>>) -> StoreResult<Vec<Record>>;

    /// Inserts the row, or replaces the existing row with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be staged.
    fn upsert(&self, record: Record) -> StoreResult<()>;

    /// Deletes every row.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete cannot be staged.
    fn delete_all(&self) -> StoreResult<()>;

    /// Commits all staged writes.
    ///
    /// After this returns successfully the committed state survives a
    /// reopen (for persistent stores).
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails. Staged writes are kept so the
    /// caller may retry or roll back.
    fn save(&self) -> StoreResult<()>;

    /// Discards all staged writes, restoring the last committed state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reset.
    fn rollback(&self) -> StoreResult<()>;

    /// Returns the number of rows visible to readers.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn count(&self) -> StoreResult<usize> {
        Ok(self.fetch_all(None)?.len())
    }
}
