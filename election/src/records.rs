//! The authoritative per-vote record.
//!
//! One record per vote, keyed by the casting transaction's id. Immutable once
//! created except for the two withdrawal fields, which transition exactly
//! once: `Active` → (implicitly) `Matured` once the consensus age reaches the
//! unlock age → `Withdrawn`, terminal. Records are never deleted.

use crate::error::ElectionError;
use serde::{Deserialize, Serialize};
use tally_store::{columns, StateKey, StateStore, WriteBatch};
use tally_types::{Age, IdentityKey, RecordId, TicketAmount, Timestamp};

/// A single time-locked vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingRecord {
    /// Id of the transaction that cast the vote.
    pub id: RecordId,
    /// The voter.
    pub from: IdentityKey,
    /// The candidate voted for.
    pub to: IdentityKey,
    /// Locked stake backing the vote.
    pub amount: TicketAmount,
    /// Round number at cast time.
    pub round_number: u64,
    /// Term number at cast time.
    pub term_number: u64,
    /// Lock duration in days.
    pub lock_days: u64,
    /// Consensus age at cast time.
    pub vote_age: Age,
    /// Age at which withdrawal becomes legal: `vote_age + lock_days`.
    pub unlock_age: Age,
    /// Calendar timestamp of the cast, derived from the age clock.
    pub vote_timestamp: Timestamp,
    /// Calendar timestamp of the unlock, derived from the age clock.
    pub unlock_timestamp: Timestamp,
    /// Dividend weight, computed once at cast time. Never changes.
    pub weight: u64,
    /// Whether the vote has been withdrawn.
    pub withdrawn: bool,
    /// When the vote was withdrawn, if it has been.
    pub withdraw_timestamp: Option<Timestamp>,
}

impl VotingRecord {
    /// Whether withdrawal is legal at `age`.
    pub fn is_mature(&self, age: Age) -> bool {
        age >= self.unlock_age
    }

    /// Transition to `Withdrawn`. Fails `InvalidOperation` if the record was
    /// already withdrawn or has not matured.
    pub fn mark_withdrawn(
        &mut self,
        current_age: Age,
        withdrawal_timestamp: Timestamp,
    ) -> Result<(), ElectionError> {
        if self.withdrawn {
            return Err(ElectionError::InvalidOperation(format!(
                "voting record {} has already been withdrawn",
                self.id
            )));
        }
        if !self.is_mature(current_age) {
            return Err(ElectionError::InvalidOperation(format!(
                "voting record {} cannot be withdrawn before {} (now at {})",
                self.id, self.unlock_age, current_age
            )));
        }
        self.withdrawn = true;
        self.withdraw_timestamp = Some(withdrawal_timestamp);
        Ok(())
    }
}

/// Store-backed view over the voting-record column.
pub struct VotingRecordStore;

impl VotingRecordStore {
    fn key(id: &RecordId) -> StateKey {
        StateKey::new(columns::RECORD, id.to_hex())
    }

    /// The record for an id, if one exists.
    pub fn get<S: StateStore>(
        store: &S,
        id: &RecordId,
    ) -> Result<Option<VotingRecord>, ElectionError> {
        Ok(store.get_value(&Self::key(id))?)
    }

    /// Insert a freshly cast record. Ids are caller-supplied and unique by
    /// construction; a collision is an internal invariant violation.
    pub fn create<S: StateStore>(
        store: &S,
        batch: &mut WriteBatch,
        record: &VotingRecord,
    ) -> Result<(), ElectionError> {
        if store.contains(&Self::key(&record.id))? {
            return Err(ElectionError::AttemptFailed(format!(
                "voting record {} already exists",
                record.id
            )));
        }
        batch.put_value(Self::key(&record.id), record)?;
        Ok(())
    }

    /// Stage an updated record (withdrawal fields only ever change).
    pub fn save(batch: &mut WriteBatch, record: &VotingRecord) -> Result<(), ElectionError> {
        batch.put_value(Self::key(&record.id), record)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_store::MemoryStore;

    fn identity(name: &str) -> IdentityKey {
        IdentityKey::new(format!("04{name}"))
    }

    fn sample_record(seed: u8) -> VotingRecord {
        VotingRecord {
            id: RecordId::new([seed; 32]),
            from: identity("voter"),
            to: identity("candidate"),
            amount: TicketAmount::new(100),
            round_number: 7,
            term_number: 2,
            lock_days: 90,
            vote_age: Age::ZERO,
            unlock_age: Age::new(90),
            vote_timestamp: Timestamp::new(1_000),
            unlock_timestamp: Timestamp::new(1_000 + 90 * 86_400),
            weight: 96,
            withdrawn: false,
            withdraw_timestamp: None,
        }
    }

    #[test]
    fn maturity_is_inclusive() {
        let record = sample_record(1);
        assert!(!record.is_mature(Age::new(89)));
        assert!(record.is_mature(Age::new(90)));
        assert!(record.is_mature(Age::new(91)));
    }

    #[test]
    fn withdraw_before_maturity_fails() {
        let mut record = sample_record(1);
        let err = record
            .mark_withdrawn(Age::new(89), Timestamp::new(2_000))
            .unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));
        assert!(!record.withdrawn);
        assert!(record.withdraw_timestamp.is_none());
    }

    #[test]
    fn withdraw_happens_exactly_once() {
        let mut record = sample_record(1);
        record
            .mark_withdrawn(Age::new(90), Timestamp::new(2_000))
            .unwrap();
        assert!(record.withdrawn);
        assert_eq!(record.withdraw_timestamp, Some(Timestamp::new(2_000)));

        let before = record.clone();
        let err = record
            .mark_withdrawn(Age::new(91), Timestamp::new(3_000))
            .unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));
        assert_eq!(record, before);
    }

    #[test]
    fn create_rejects_id_collision() {
        let mut store = MemoryStore::new();
        let record = sample_record(1);

        let mut batch = WriteBatch::new();
        VotingRecordStore::create(&store, &mut batch, &record).unwrap();
        store.apply(batch).unwrap();

        let mut batch = WriteBatch::new();
        let err = VotingRecordStore::create(&store, &mut batch, &record).unwrap_err();
        assert!(matches!(err, ElectionError::AttemptFailed(_)));
    }

    #[test]
    fn get_roundtrips() {
        let mut store = MemoryStore::new();
        let record = sample_record(9);
        let mut batch = WriteBatch::new();
        VotingRecordStore::create(&store, &mut batch, &record).unwrap();
        store.apply(batch).unwrap();

        let loaded = VotingRecordStore::get(&store, &record.id).unwrap();
        assert_eq!(loaded, Some(record));
        assert_eq!(
            VotingRecordStore::get(&store, &RecordId::new([0xee; 32])).unwrap(),
            None
        );
    }
}
