//! In-memory store backend, for tests and embedding.

use crate::error::StoreError;
use crate::key::StateKey;
use crate::StateStore;
use std::collections::BTreeMap;

/// A `BTreeMap`-backed [`StateStore`]. Deterministic and allocation-only —
/// never touches the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<StateKey, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: StateKey, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key, value);
        Ok(())
    }
}
