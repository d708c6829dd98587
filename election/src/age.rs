//! Consensus-age to calendar-time conversion.

use tally_types::{Age, Timestamp};

/// Converts consensus ages to calendar timestamps, given the fixed chain-start
/// timestamp. Pure — holds no mutable state.
#[derive(Clone, Copy, Debug)]
pub struct AgeClock {
    chain_start: Timestamp,
}

impl AgeClock {
    pub fn new(chain_start: Timestamp) -> Self {
        Self { chain_start }
    }

    /// The chain-start timestamp (age zero).
    pub fn chain_start(&self) -> Timestamp {
        self.chain_start
    }

    /// The calendar timestamp at a given age: chain start plus one day per
    /// age unit.
    pub fn timestamp_at(&self, age: Age) -> Timestamp {
        self.chain_start.plus_days(age.days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_zero_is_chain_start() {
        let clock = AgeClock::new(Timestamp::new(1_600_000_000));
        assert_eq!(clock.timestamp_at(Age::ZERO), Timestamp::new(1_600_000_000));
    }

    #[test]
    fn each_age_unit_is_one_day() {
        let clock = AgeClock::new(Timestamp::new(1_000));
        assert_eq!(
            clock.timestamp_at(Age::new(90)),
            Timestamp::new(1_000 + 90 * 86_400)
        );
    }
}
