//! Identity key and derived address types.
//!
//! An identity is known by the hex encoding of its recovered public key; the
//! host chain hands that string to every operation. A short on-chain address
//! is derived from the key via Blake2 hashing.

use blake2::{Blake2s256, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex-encoded public key identifying a voter or candidate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Create an identity key from its hex string form.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Return the raw hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `limit` characters of the key, used as the default alias when a
    /// candidate announces without proposing one.
    pub fn truncated(&self, limit: usize) -> String {
        self.0.chars().take(limit).collect()
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IdentityKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Short address derived from an identity key, always prefixed with `tly_`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all tally addresses.
    pub const PREFIX: &'static str = "tly_";

    /// Derive the address for an identity key (Blake2 digest, hex-encoded,
    /// truncated to 20 bytes).
    pub fn from_identity(key: &IdentityKey) -> Self {
        let mut hasher = Blake2s256::new();
        hasher.update(key.as_str().as_bytes());
        let digest = hasher.finalize();
        Self(format!("{}{}", Self::PREFIX, hex::encode(&digest[..20])))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
