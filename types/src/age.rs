//! The consensus age counter.
//!
//! Age is a discrete, monotonically increasing time unit maintained by the
//! consensus rounds — one unit per day of chain operation. It is distinct
//! from calendar time and is what lock maturity is compared against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A consensus age, in days since chain start.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Age(u64);

impl Age {
    pub const ZERO: Self = Self(0);

    pub fn new(days: u64) -> Self {
        Self(days)
    }

    pub fn days(&self) -> u64 {
        self.0
    }

    /// The age `days` later — used to derive a record's unlock age from its
    /// vote age and lock duration.
    pub fn plus_days(&self, days: u64) -> Self {
        Self(self.0.saturating_add(days))
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "age {}", self.0)
    }
}
