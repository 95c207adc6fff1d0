//! Thread-safe handle to a catalog
//!
//! Book lookups and field writes are not safe to interleave, so the whole
//! store sits behind one lock and every operation holds it from start to
//! finish. A concurrent `save` and `finish_reading` on the same book can
//! therefore never lose the read-count increment.

use crate::catalog::CatalogStore;
use crate::error::CatalogResult;
use crate::types::{Book, BookDraft, BookId};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Default)]
pub struct SharedCatalog {
    inner: Arc<Mutex<CatalogStore>>,
}

impl SharedCatalog {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogStore> {
        // Operations validate before writing, so a panicking holder cannot
        // have left a half-applied change behind
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run several operations under a single lock acquisition
    pub fn with<R>(&self, f: impl FnOnce(&mut CatalogStore) -> R) -> R {
        f(&mut *self.lock())
    }

    pub fn add(&self, draft: &BookDraft) -> CatalogResult<BookId> {
        self.lock().add(draft)
    }

    pub fn save(&self, id: BookId, draft: &BookDraft) -> CatalogResult<()> {
        self.lock().save(id, draft)
    }

    pub fn start_reading(&self, id: BookId) -> CatalogResult<()> {
        self.lock().start_reading(id)
    }

    pub fn finish_reading(&self, id: BookId) -> CatalogResult<()> {
        self.lock().finish_reading(id)
    }

    pub fn snapshot(&self) -> Vec<Book> {
        self.lock().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_reads_and_saves() {
        let catalog = SharedCatalog::default();
        let id = catalog
            .add(&BookDraft::new("Dune", "Frank Herbert", "SF", "1965").with_text("..."))
            .unwrap();

        let reader = {
            let catalog = catalog.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    catalog.start_reading(id).unwrap();
                    catalog.finish_reading(id).unwrap();
                }
            })
        };
        let editor = {
            let catalog = catalog.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    let draft = BookDraft::new(format!("Dune {}", i), "Frank Herbert", "SF", "1965");
                    catalog.save(id, &draft).unwrap();
                }
            })
        };
        reader.join().unwrap();
        editor.join().unwrap();

        let snapshot = catalog.snapshot();
        assert_eq!(snapshot[0].read_count(), 100);
        assert_eq!(snapshot[0].name, "Dune 99");
        assert_eq!(snapshot[0].text, "...");
    }

    #[test]
    fn test_with_runs_under_one_lock() {
        let catalog = SharedCatalog::new(CatalogStore::new());
        let count = catalog.with(|store| {
            store
                .add(&BookDraft::new("Emma", "Jane Austen", "Novel", "1815").with_text("..."))
                .unwrap();
            store.len()
        });
        assert_eq!(count, 1);
    }
}
