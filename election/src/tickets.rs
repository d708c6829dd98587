//! Per-identity ticket aggregates.
//!
//! One `Tickets` value per identity tracks the stake it currently has locked
//! behind outgoing votes, the stake locked behind votes it has received as a
//! candidate, the lifetime totals of both, and the ids of every voting record
//! it is party to. Lifetime totals are monotone — withdrawal only decrements
//! the current tallies.
//!
//! Mutators perform no validation; the orchestrator enforces all
//! preconditions before staging these updates.

use serde::{Deserialize, Serialize};
use tally_store::{columns, StateKey, StateStore, StoreError, WriteBatch};
use tally_types::{IdentityKey, RecordId, TicketAmount};

/// Ticket aggregate for one identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tickets {
    /// Stake currently locked behind this identity's outgoing votes.
    pub voted_tickets: TicketAmount,
    /// Lifetime stake ever locked behind outgoing votes. Never decremented.
    pub history_voted_tickets: TicketAmount,
    /// Stake currently locked behind votes received as a candidate.
    pub obtained_tickets: TicketAmount,
    /// Lifetime stake ever received as a candidate. Never decremented.
    pub history_obtained_tickets: TicketAmount,
    /// Records of votes this identity cast.
    pub voting_records_out: Vec<RecordId>,
    /// Records of votes this identity received.
    pub voting_records_in: Vec<RecordId>,
}

impl Tickets {
    /// Account for a new outgoing vote.
    pub fn record_outgoing(&mut self, id: RecordId, amount: TicketAmount) {
        self.voting_records_out.push(id);
        self.voted_tickets = self.voted_tickets.saturating_add(amount);
        self.history_voted_tickets = self.history_voted_tickets.saturating_add(amount);
    }

    /// Account for a new incoming vote.
    pub fn record_incoming(&mut self, id: RecordId, amount: TicketAmount) {
        self.voting_records_in.push(id);
        self.obtained_tickets = self.obtained_tickets.saturating_add(amount);
        self.history_obtained_tickets = self.history_obtained_tickets.saturating_add(amount);
    }

    /// Release withdrawn outgoing stake. Lifetime total unaffected.
    pub fn release_outgoing(&mut self, amount: TicketAmount) {
        self.voted_tickets = self.voted_tickets.saturating_sub(amount);
    }

    /// Release withdrawn incoming stake. Lifetime total unaffected.
    pub fn release_incoming(&mut self, amount: TicketAmount) {
        self.obtained_tickets = self.obtained_tickets.saturating_sub(amount);
    }
}

/// Store-backed view over the per-identity ticket aggregates.
pub struct TicketLedger;

impl TicketLedger {
    fn key(identity: &IdentityKey) -> StateKey {
        StateKey::new(columns::TICKETS, identity.as_str())
    }

    /// The aggregate for an identity, if it was ever party to a vote.
    pub fn get<S: StateStore>(
        store: &S,
        identity: &IdentityKey,
    ) -> Result<Option<Tickets>, StoreError> {
        store.get_value(&Self::key(identity))
    }

    /// The aggregate for an identity, zeroed if absent.
    pub fn get_or_default<S: StateStore>(
        store: &S,
        identity: &IdentityKey,
    ) -> Result<Tickets, StoreError> {
        Ok(Self::get(store, identity)?.unwrap_or_default())
    }

    /// Stage an aggregate.
    pub fn save(
        batch: &mut WriteBatch,
        identity: &IdentityKey,
        tickets: &Tickets,
    ) -> Result<(), StoreError> {
        batch.put_value(Self::key(identity), tickets)
    }
}
