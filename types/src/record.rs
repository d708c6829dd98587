//! Voting-record identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte voting-record id — the hash of the transaction that cast the
/// vote, supplied by the host chain and unique by construction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId([u8; 32]);

impl RecordId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Hex form, used as the store key for the record.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_zero() {
        assert!(RecordId::ZERO.is_zero());
        assert!(!RecordId::new([1u8; 32]).is_zero());
    }

    #[test]
    fn hex_is_64_chars() {
        let id = RecordId::new([0xab; 32]);
        assert_eq!(id.to_hex().len(), 64);
        assert!(id.to_hex().starts_with("abab"));
    }
}
