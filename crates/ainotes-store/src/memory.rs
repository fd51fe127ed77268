//! In-memory note cache.

use std::sync::{Arc, RwLock};

use ainotes_core::{LocalCacheStore, Note, Result};

/// Process-local cache. Clones share the same collection.
#[derive(Clone, Default)]
pub struct MemoryCache {
    notes: Arc<RwLock<Vec<Note>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache pre-populated with `notes`.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: Arc::new(RwLock::new(notes)),
        }
    }
}

impl LocalCacheStore for MemoryCache {
    fn read_all(&self) -> Vec<Note> {
        match self.notes.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write_all(&self, notes: &[Note]) -> Result<()> {
        let mut guard = match self.notes.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = notes.to_vec();
        Ok(())
    }
}
