//! Dividend-weight strategy.
//!
//! A vote's weight determines its share of term rewards. The formula is
//! pluggable; any implementation must be monotonically non-decreasing in both
//! the amount and the lock duration, and is computed exactly once at cast
//! time — the stored weight never changes afterwards.

use tally_types::TicketAmount;

/// Computes the dividend weight of a vote from its amount and lock duration.
pub trait WeightStrategy {
    /// Must be monotonically non-decreasing in both arguments.
    fn weight(&self, amount: TicketAmount, lock_days: u64) -> u64;
}

/// The launch formula: `amount * lock_days / 270 + amount * 2 / 3`.
///
/// Linear in the amount, and rewarding longer locks — a 270-day lock roughly
/// doubles the base two-thirds weight. Integer arithmetic throughout.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardWeight;

impl WeightStrategy for StandardWeight {
    fn weight(&self, amount: TicketAmount, lock_days: u64) -> u64 {
        let amount = amount.raw();
        let term_component = amount.saturating_mul(lock_days) / 270;
        let base_component = amount.saturating_mul(2) / 3;
        term_component.saturating_add(base_component)
    }
}
