//! Injected collaborator ports.
//!
//! The ledger never inspects collaborator state — it issues calls and expects
//! each to either complete or abort the whole enclosing operation. Both ports
//! run inside the host's transaction, so their own concurrency control is out
//! of scope here.

use crate::records::VotingRecord;
use tally_types::{IdentityKey, TicketAmount};
use thiserror::Error;

/// A collaborator rejected a call; the enclosing operation aborts.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("token vault rejected the call: {0}")]
    Vault(String),

    #[error("dividend book rejected the call: {0}")]
    Dividends(String),
}

/// Token custody for stake locked behind votes and candidacy bonds.
pub trait TokenVault {
    /// Lock `amount` of `identity`'s tokens.
    fn lock(&mut self, identity: &IdentityKey, amount: TicketAmount) -> Result<(), PortError>;

    /// Release `amount` back to `identity`.
    fn unlock(&mut self, identity: &IdentityKey, amount: TicketAmount) -> Result<(), PortError>;
}

/// The reward-distribution engine's weight ledger.
pub trait DividendBook {
    /// Add `weight`, effective from `effective_term` onwards.
    fn add_weight(&mut self, weight: u64, effective_term: u64) -> Result<(), PortError>;

    /// Subtract `weight` for `term` onwards.
    fn sub_weight(&mut self, weight: u64, term: u64) -> Result<(), PortError>;

    /// Pay out the dividends accrued by a voting record.
    fn transfer_dividends(&mut self, record: &VotingRecord) -> Result<(), PortError>;
}

/// Deterministic, programmatically controllable port implementations for
/// tests and embedding without a real token or dividend engine.
pub mod nullable {
    use super::*;
    use std::collections::HashMap;
    use tally_types::RecordId;

    /// In-memory token vault. Tracks locked balances per identity and can be
    /// told to reject the next call.
    #[derive(Debug, Default)]
    pub struct NullVault {
        locked: HashMap<IdentityKey, u64>,
        fail_next: bool,
    }

    impl NullVault {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make the next `lock`/`unlock` call fail.
        pub fn fail_next_call(&mut self) {
            self.fail_next = true;
        }

        /// Currently locked balance for an identity.
        pub fn locked(&self, identity: &IdentityKey) -> u64 {
            self.locked.get(identity).copied().unwrap_or(0)
        }

        fn take_failure(&mut self) -> bool {
            std::mem::take(&mut self.fail_next)
        }
    }

    impl TokenVault for NullVault {
        fn lock(&mut self, identity: &IdentityKey, amount: TicketAmount) -> Result<(), PortError> {
            if self.take_failure() {
                return Err(PortError::Vault("programmed lock failure".into()));
            }
            let entry = self.locked.entry(identity.clone()).or_insert(0);
            *entry = entry.saturating_add(amount.raw());
            Ok(())
        }

        fn unlock(
            &mut self,
            identity: &IdentityKey,
            amount: TicketAmount,
        ) -> Result<(), PortError> {
            if self.take_failure() {
                return Err(PortError::Vault("programmed unlock failure".into()));
            }
            match self.locked.get_mut(identity) {
                Some(entry) if *entry >= amount.raw() => {
                    *entry -= amount.raw();
                    Ok(())
                }
                _ => Err(PortError::Vault(format!(
                    "unlock of {} exceeds locked balance of {}",
                    amount, identity
                ))),
            }
        }
    }

    /// A call recorded by [`NullDividendBook`].
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum DividendCall {
        Added { weight: u64, effective_term: u64 },
        Subtracted { weight: u64, term: u64 },
        Transferred { record: RecordId },
    }

    /// In-memory dividend book. Records every call for later assertion.
    #[derive(Debug, Default)]
    pub struct NullDividendBook {
        calls: Vec<DividendCall>,
    }

    impl NullDividendBook {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> &[DividendCall] {
            &self.calls
        }
    }

    impl DividendBook for NullDividendBook {
        fn add_weight(&mut self, weight: u64, effective_term: u64) -> Result<(), PortError> {
            self.calls.push(DividendCall::Added {
                weight,
                effective_term,
            });
            Ok(())
        }

        fn sub_weight(&mut self, weight: u64, term: u64) -> Result<(), PortError> {
            self.calls.push(DividendCall::Subtracted { weight, term });
            Ok(())
        }

        fn transfer_dividends(&mut self, record: &VotingRecord) -> Result<(), PortError> {
            self.calls.push(DividendCall::Transferred { record: record.id });
            Ok(())
        }
    }
}
