//! Calendar timestamp type.
//!
//! Timestamps are Unix epoch seconds (UTC). The ledger never reads a wall
//! clock of its own — every timestamp is derived from the chain-start
//! timestamp plus the consensus age.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// This timestamp plus a number of whole days.
    pub fn plus_days(&self, days: u64) -> Self {
        Self(self.0.saturating_add(days.saturating_mul(86_400)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_days_adds_whole_days() {
        let t = Timestamp::new(1_000);
        assert_eq!(t.plus_days(2).as_secs(), 1_000 + 2 * 86_400);
    }

    #[test]
    fn plus_days_saturates() {
        let t = Timestamp::new(u64::MAX - 10);
        assert_eq!(t.plus_days(1), Timestamp::new(u64::MAX));
    }
}
