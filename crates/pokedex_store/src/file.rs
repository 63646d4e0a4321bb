//! File-backed record store.
//!
//! The committed state lives in a single CBOR snapshot file:
//!
//! ```text
//! <path>          # CBOR snapshot { format_version, records }
//! <path>.lock     # Advisory lock for single-writer
//! <path>.tmp      # Temporary file for atomic snapshot writes
//! ```
//!
//! Staging is delegated to an [`InMemoryStore`]; `save` writes the working
//! view to disk and only then publishes it as committed.

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryStore;
use crate::record::{Record, RecordId};
use crate::store::{Predicate, RecordStore};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Snapshot format written by this version.
const FORMAT_VERSION: u16 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    format_version: u16,
    records: Vec<Record>,
}

/// A file-backed record store.
///
/// Data survives process restarts once `save` returns.
///
/// # Durability
///
/// `save` writes `<path>.tmp`, calls `File::sync_all()`, then renames it
/// over `<path>`. A crash mid-save leaves the previous snapshot intact.
///
/// # Locking
///
/// The store holds an exclusive advisory lock on `<path>.lock` for its
/// whole lifetime. A second `FileStore` on the same path fails with
/// [`StoreError::Locked`].
///
/// # Example
///
/// ```no_run
/// use pokedex_store::{FileStore, Record, RecordStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("pokedex.cbor")).unwrap();
/// store.upsert(Record::new(1).with_name("bulbasaur")).unwrap();
/// store.save().unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: InMemoryStore,
    _lock_file: File,
}

impl FileStore {
    /// Opens or creates a store at `path`, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The lock is held by another process
    /// - The snapshot exists but cannot be decoded
    /// - An I/O error occurs
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_path = sibling(path, ".lock");
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked { path: lock_path });
        }

        let records = read_snapshot(path)?;
        tracing::debug!(path = %path.display(), rows = records.len(), "opened file store");

        Ok(Self {
            path: path.to_path_buf(),
            inner: InMemoryStore::with_records(records),
            _lock_file: lock_file,
        })
    }

    /// Returns the path to the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self, records: Vec<Record>) -> StoreResult<()> {
        let temp_path = sibling(&self.path, ".tmp");
        let snapshot = Snapshot {
            format_version: FORMAT_VERSION,
            records,
        };

        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            ciborium::into_writer(&snapshot, &mut writer)
                .map_err(|e| StoreError::Encode(e.to_string()))?;
            writer.flush()?;
            writer
                .into_inner()
                .map_err(|e| StoreError::Io(e.into_error()))?
                .sync_all()?;
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn fetch_one(&self, id: RecordId) -> StoreResult<Option<Record>> {
        self.inner.fetch_one(id)
    }

    fn fetch_all(&self, predicate: Option<Predicate<'_>>) -> StoreResult<Vec<Record>> {
        self.inner.fetch_all(predicate)
    }

    fn upsert(&self, record: Record) -> StoreResult<()> {
        self.inner.upsert(record)
    }

    fn delete_all(&self) -> StoreResult<()> {
        self.inner.delete_all()
    }

    fn save(&self) -> StoreResult<()> {
        if !self.inner.has_pending_changes() && self.path.exists() {
            return Ok(());
        }
        self.write_snapshot(self.inner.snapshot())?;
        self.inner.save()
    }

    fn rollback(&self) -> StoreResult<()> {
        self.inner.rollback()
    }

    fn count(&self) -> StoreResult<usize> {
        self.inner.count()
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn read_snapshot(path: &Path) -> StoreResult<Vec<Record>> {
    if !path.exists() || fs::metadata(path)?.len() == 0 {
        return Ok(Vec::new());
    }

    let reader = BufReader::new(File::open(path)?);
    let snapshot: Snapshot =
        ciborium::from_reader(reader).map_err(|e| StoreError::Decode(e.to_string()))?;

    if snapshot.format_version != FORMAT_VERSION {
        return Err(StoreError::Corrupted(format!(
            "unsupported snapshot format version {}",
            snapshot.format_version
        )));
    }

    Ok(snapshot.records)
}
