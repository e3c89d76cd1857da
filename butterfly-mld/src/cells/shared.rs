//! Publishing customized weights to concurrent readers
//!
//! Readers take an `Arc` snapshot and query it without holding any lock.
//! Writers customize a private copy and swap it in as a whole, so a reader
//! never sees a half-written matrix. Writers are serialized among
//! themselves so every customization starts from the latest publish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::CellStorage;

#[derive(Debug)]
pub struct SharedCellStorage {
    current: RwLock<Arc<CellStorage>>,
    generation: AtomicU64,
    writer: Mutex<()>,
}

impl SharedCellStorage {
    pub fn new(storage: CellStorage) -> Self {
        Self {
            current: RwLock::new(Arc::new(storage)),
            generation: AtomicU64::new(0),
            writer: Mutex::new(()),
        }
    }

    /// Current storage. Stays valid and unchanged after later publishes.
    pub fn snapshot(&self) -> Arc<CellStorage> {
        Arc::clone(&self.current.read())
    }

    /// Replace the current storage, returning the previous one
    pub fn publish(&self, storage: CellStorage) -> Arc<CellStorage> {
        let _writer = self.writer.lock();
        self.swap(storage)
    }

    /// Caller holds the writer lock
    fn swap(&self, storage: CellStorage) -> Arc<CellStorage> {
        let next = Arc::new(storage);
        let (previous, generation) = {
            let mut current = self.current.write();
            let previous = std::mem::replace(&mut *current, next);
            (previous, self.generation.fetch_add(1, Ordering::AcqRel) + 1)
        };
        tracing::debug!(generation, "published cell storage");
        previous
    }

    /// Copy the current weights, let `f` rewrite them, then publish.
    ///
    /// The boundary layout is shared with the previous storage, only the
    /// weight array is duplicated.
    pub fn customize<F>(&self, f: F) -> Arc<CellStorage>
    where
        F: FnOnce(&mut CellStorage),
    {
        let _writer = self.writer.lock();
        let mut next = CellStorage::clone(&self.snapshot());
        f(&mut next);
        self.swap(next)
    }

    /// Number of publishes so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Current storage together with the number of publishes that produced it
    pub fn snapshot_with_generation(&self) -> (Arc<CellStorage>, u64) {
        let current = self.current.read();
        (Arc::clone(&current), self.generation.load(Ordering::Acquire))
    }
}
