//! Election parameters.

use crate::amount::TicketAmount;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the election ledger.
///
/// Defaults match the chain's launch configuration: locks between 90 days and
/// 3 years, aliases capped at 20 characters, and a 100 000-unit candidacy
/// bond held while an identity is registered as a candidate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElectionParams {
    /// Minimum vote lock duration, in days (inclusive).
    pub min_lock_days: u64,

    /// Maximum vote lock duration, in days (inclusive).
    pub max_lock_days: u64,

    /// Maximum alias length; longer (or empty) proposals fall back to a
    /// truncation of the identity key.
    pub alias_limit: usize,

    /// Stake locked by a candidate while registered, released on quitting.
    pub candidacy_bond: TicketAmount,
}

impl ElectionParams {
    /// Whether a lock duration is inside the legal `[min, max]` window.
    pub fn lock_days_in_range(&self, lock_days: u64) -> bool {
        lock_days >= self.min_lock_days && lock_days <= self.max_lock_days
    }
}

impl Default for ElectionParams {
    fn default() -> Self {
        Self {
            min_lock_days: 90,
            max_lock_days: 1095,
            alias_limit: 20,
            candidacy_bond: TicketAmount::new(100_000),
        }
    }
}
