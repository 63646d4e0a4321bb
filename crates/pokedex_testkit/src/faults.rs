//! Fault injection for record stores.
//!
//! [`FaultyStore`] wraps any [`RecordStore`] and fails selected operations
//! with [`StoreError::Unavailable`] until the fault is cleared.

use pokedex_store::{Predicate, Record, RecordId, RecordStore, StoreError, StoreResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A store operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// `fetch_one`.
    FetchOne,
    /// `fetch_all` and `count`.
    FetchAll,
    /// `upsert`.
    Upsert,
    /// `delete_all`.
    DeleteAll,
    /// `save`.
    Save,
}

impl StoreOp {
    const ALL: [StoreOp; 5] = [
        StoreOp::FetchOne,
        StoreOp::FetchAll,
        StoreOp::Upsert,
        StoreOp::DeleteAll,
        StoreOp::Save,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// A [`RecordStore`] wrapper that fails on demand.
#[derive(Debug, Default)]
pub struct FaultyStore<S> {
    inner: S,
    faults: [AtomicBool; 5],
    injected: AtomicUsize,
}

impl<S: RecordStore> FaultyStore<S> {
    /// Wraps `inner` with every operation healthy.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            faults: Default::default(),
            injected: AtomicUsize::new(0),
        }
    }

    /// Makes `op` fail until [`heal`](Self::heal) is called.
    pub fn fail(&self, op: StoreOp) {
        self.faults[op.index()].store(true, Ordering::SeqCst);
    }

    /// Makes every operation fail.
    pub fn fail_all(&self) {
        for op in StoreOp::ALL {
            self.fail(op);
        }
    }

    /// Clears the fault on `op`.
    pub fn heal(&self, op: StoreOp) {
        self.faults[op.index()].store(false, Ordering::SeqCst);
    }

    /// Clears every fault.
    pub fn heal_all(&self) {
        for op in StoreOp::ALL {
            self.heal(op);
        }
    }

    /// Number of failures injected so far.
    pub fn injected(&self) -> usize {
        self.injected.load(Ordering::SeqCst)
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self, op: StoreOp) -> StoreResult<()> {
        if self.faults[op.index()].load(Ordering::SeqCst) {
            self.injected.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::unavailable(format!("injected {op:?} failure")))
        } else {
            Ok(())
        }
    }
}

impl<S: RecordStore> RecordStore for FaultyStore<S> {
    fn fetch_one(&self, id: RecordId) -> StoreResult<Option<Record>> {
        self.check(StoreOp::FetchOne)?;
        self.inner.fetch_one(id)
    }

    fn fetch_all(&self, predicate: Option<Predicate<'_>>) -> StoreResult<Vec<Record>> {
        self.check(StoreOp::FetchAll)?;
        self.inner.fetch_all(predicate)
    }

    fn upsert(&self, record: Record) -> StoreResult<()> {
        self.check(StoreOp::Upsert)?;
        self.inner.upsert(record)
    }

    fn delete_all(&self) -> StoreResult<()> {
        self.check(StoreOp::DeleteAll)?;
        self.inner.delete_all()
    }

    fn save(&self) -> StoreResult<()> {
        self.check(StoreOp::Save)?;
        self.inner.save()
    }

    fn rollback(&self) -> StoreResult<()> {
        self.inner.rollback()
    }
}
