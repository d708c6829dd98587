//! The persistent key-value port of the tally election ledger.
//!
//! Every backend (the host chain's state trie, LMDB, in-memory for testing)
//! implements the [`StateStore`] trait. The election crate depends only on
//! the trait, so atomicity and testability are uniform: all reads go through
//! `get`, all writes are staged into a [`WriteBatch`] and land in a single
//! `apply` call.

pub mod batch;
pub mod error;
pub mod key;
pub mod memory;

pub use batch::WriteBatch;
pub use error::StoreError;
pub use key::{columns, StateKey};
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;

/// The single storage port — a namespaced key-value store with atomic
/// batched writes.
pub trait StateStore {
    /// Read the raw bytes stored under a key, if any.
    fn get(&self, key: &StateKey) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write raw bytes under a key.
    fn put(&mut self, key: StateKey, value: Vec<u8>) -> Result<(), StoreError>;

    /// Apply a batch of writes. Backends with real transactions should make
    /// this all-or-nothing; the default applies writes in order.
    fn apply(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        for (key, value) in batch.into_ops() {
            self.put(key, value)?;
        }
        Ok(())
    }

    /// Read and decode a stored value.
    fn get_value<T: DeserializeOwned>(&self, key: &StateKey) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    /// Whether a key is present.
    fn contains(&self, key: &StateKey) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}
