//! Batched writes, applied atomically.

use crate::error::StoreError;
use crate::key::StateKey;
use serde::Serialize;

/// An ordered set of writes staged by one ledger operation.
///
/// Operations validate first, stage every mutation here, and hand the whole
/// batch to [`crate::StateStore::apply`] last — so a failure anywhere before
/// the apply leaves the store untouched.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<(StateKey, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage raw bytes under a key. A later write to the same key within the
    /// batch wins, matching apply-in-order semantics.
    pub fn put(&mut self, key: StateKey, value: Vec<u8>) {
        self.ops.push((key, value));
    }

    /// Encode and stage a value under a key.
    pub fn put_value<T: Serialize>(&mut self, key: StateKey, value: &T) -> Result<(), StoreError> {
        let bytes =
            bincode::serialize(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.put(key, bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Consume the batch, yielding the staged writes in order.
    pub fn into_ops(self) -> Vec<(StateKey, Vec<u8>)> {
        self.ops
    }
}
