//! The election service — the public operation surface.
//!
//! Exclusively owns the candidate registry, ticket ledger, voting records,
//! and global counters; nothing else mutates them. Every operation follows
//! the same discipline: validate every precondition with reads only, call the
//! collaborator ports, stage all mutations into one [`WriteBatch`], and apply
//! the batch last. A failure anywhere before the apply leaves the ledger
//! untouched.

use crate::age::AgeClock;
use crate::candidates::{CandidateRegistry, Candidates};
use crate::context::OpContext;
use crate::error::ElectionError;
use crate::ports::{DividendBook, TokenVault};
use crate::records::{VotingRecord, VotingRecordStore};
use crate::tickets::{TicketLedger, Tickets};
use crate::weight::{StandardWeight, WeightStrategy};
use std::collections::HashMap;
use tally_store::{StateKey, StateStore, WriteBatch};
use tally_types::{ElectionParams, IdentityKey, RecordId, TicketAmount};
use tracing::debug;

/// Number of votes ever cast. Never decremented.
const VOTES_COUNT: &str = "votes_count";
/// Stake currently locked behind votes. Decremented on withdrawal.
const TICKETS_COUNT: &str = "tickets_count";

/// Orchestrates elections over an injected store, token vault, dividend book,
/// and weight strategy.
pub struct ElectionService<S, V, D, W = StandardWeight> {
    store: S,
    vault: V,
    dividends: D,
    weight: W,
    params: ElectionParams,
    clock: AgeClock,
}

impl<S, V, D> ElectionService<S, V, D, StandardWeight>
where
    S: StateStore,
    V: TokenVault,
    D: DividendBook,
{
    /// Service with the launch weight formula.
    pub fn new(store: S, vault: V, dividends: D, clock: AgeClock, params: ElectionParams) -> Self {
        Self::with_weight_strategy(store, vault, dividends, clock, params, StandardWeight)
    }
}

impl<S, V, D, W> ElectionService<S, V, D, W>
where
    S: StateStore,
    V: TokenVault,
    D: DividendBook,
    W: WeightStrategy,
{
    pub fn with_weight_strategy(
        store: S,
        vault: V,
        dividends: D,
        clock: AgeClock,
        params: ElectionParams,
        weight: W,
    ) -> Self {
        Self {
            store,
            vault,
            dividends,
            weight,
            params,
            clock,
        }
    }

    /// Announce candidacy, returning the assigned alias.
    ///
    /// The caller must not already be a candidate, and every vote it ever
    /// cast must be withdrawn — a candidate cannot hold live outgoing votes.
    /// Locks the candidacy bond.
    pub fn announce_election(
        &mut self,
        ctx: &OpContext,
        proposed_alias: &str,
    ) -> Result<String, ElectionError> {
        if let Some(tickets) = TicketLedger::get(&self.store, &ctx.caller)? {
            for id in &tickets.voting_records_out {
                if let Some(record) = VotingRecordStore::get(&self.store, id)? {
                    if !record.withdrawn {
                        return Err(ElectionError::InvalidOperation(
                            "cannot announce election while holding live voting records".into(),
                        ));
                    }
                }
            }
        }

        let mut registry = CandidateRegistry::load(&self.store)?;
        if registry.is_candidate(&ctx.caller) {
            return Err(ElectionError::InvalidOperation(
                "already announced election".into(),
            ));
        }

        let alias = CandidateRegistry::resolve_alias(&self.params, &ctx.caller, proposed_alias);
        let alias_already_owned = match CandidateRegistry::alias_owner(&self.store, &alias)? {
            Some(owner) if owner != ctx.caller => {
                return Err(ElectionError::InvalidOperation(format!(
                    "alias {alias} is already taken"
                )));
            }
            Some(_) => true,
            None => false,
        };

        self.vault.lock(&ctx.caller, self.params.candidacy_bond)?;

        let mut batch = WriteBatch::new();
        registry.admit(ctx.caller.clone());
        registry.save(&mut batch)?;
        if !alias_already_owned {
            CandidateRegistry::assign_alias(&self.store, &mut batch, &ctx.caller, &alias)?;
        }
        self.store.apply(batch)?;

        debug!(identity = %ctx.caller, %alias, "candidacy announced");
        Ok(alias)
    }

    /// Quit candidacy, releasing the bond.
    pub fn quit_election(&mut self, ctx: &OpContext) -> Result<(), ElectionError> {
        let mut registry = CandidateRegistry::load(&self.store)?;
        if !registry.is_candidate(&ctx.caller) {
            return Err(ElectionError::InvalidOperation(
                "not announced election".into(),
            ));
        }
        if !registry.expel(&ctx.caller) {
            return Err(ElectionError::AttemptFailed(format!(
                "failed to remove {} from the candidate set",
                ctx.caller
            )));
        }

        self.vault.unlock(&ctx.caller, self.params.candidacy_bond)?;

        let mut batch = WriteBatch::new();
        registry.save(&mut batch)?;
        self.store.apply(batch)?;

        debug!(identity = %ctx.caller, "candidacy quit");
        Ok(())
    }

    /// Lock `amount` behind a vote for `candidate` for `lock_days` days.
    /// Returns the id of the created voting record.
    pub fn vote(
        &mut self,
        ctx: &OpContext,
        candidate: &IdentityKey,
        amount: TicketAmount,
        lock_days: u64,
    ) -> Result<RecordId, ElectionError> {
        if !self.params.lock_days_in_range(lock_days) {
            return Err(ElectionError::InvalidOperation(format!(
                "lock duration of {lock_days} days is outside [{}, {}]",
                self.params.min_lock_days, self.params.max_lock_days
            )));
        }

        let registry = CandidateRegistry::load(&self.store)?;
        if registry.candidates().is_empty() {
            return Err(ElectionError::NotFound(
                "no candidate has announced election".into(),
            ));
        }
        if !registry.is_candidate(candidate) {
            return Err(ElectionError::InvalidOperation(format!(
                "{candidate} didn't announce election"
            )));
        }
        if registry.is_candidate(&ctx.caller) {
            return Err(ElectionError::InvalidOperation(
                "a candidate cannot vote".into(),
            ));
        }
        if VotingRecordStore::get(&self.store, &ctx.txn_id)?.is_some() {
            return Err(ElectionError::AttemptFailed(format!(
                "voting record {} already exists",
                ctx.txn_id
            )));
        }

        self.vault.lock(&ctx.caller, amount)?;

        let weight = self.weight.weight(amount, lock_days);
        let unlock_age = ctx.current_age.plus_days(lock_days);
        let record = VotingRecord {
            id: ctx.txn_id,
            from: ctx.caller.clone(),
            to: candidate.clone(),
            amount,
            round_number: ctx.round_number,
            term_number: ctx.term_number,
            lock_days,
            vote_age: ctx.current_age,
            unlock_age,
            vote_timestamp: self.clock.timestamp_at(ctx.current_age),
            unlock_timestamp: self.clock.timestamp_at(unlock_age),
            weight,
            withdrawn: false,
            withdraw_timestamp: None,
        };

        let mut batch = WriteBatch::new();
        VotingRecordStore::create(&self.store, &mut batch, &record)?;

        let mut voter_tickets = TicketLedger::get_or_default(&self.store, &ctx.caller)?;
        voter_tickets.record_outgoing(record.id, amount);
        TicketLedger::save(&mut batch, &ctx.caller, &voter_tickets)?;

        let mut candidate_tickets = TicketLedger::get_or_default(&self.store, candidate)?;
        candidate_tickets.record_incoming(record.id, amount);
        TicketLedger::save(&mut batch, candidate, &candidate_tickets)?;

        let votes = self.counter(VOTES_COUNT)?.saturating_add(1);
        batch.put_value(StateKey::meta(VOTES_COUNT), &votes)?;
        let tickets = self.counter(TICKETS_COUNT)?.saturating_add(amount.raw());
        batch.put_value(StateKey::meta(TICKETS_COUNT), &tickets)?;

        // Weight changes apply to the next term, never retroactively.
        self.dividends.add_weight(weight, ctx.term_number + 1)?;

        self.store.apply(batch)?;

        debug!(record = %record.id, weight, "vote cast");
        Ok(record.id)
    }

    /// Withdraw one matured vote, returning the voter's refreshed aggregate.
    ///
    /// The unlocked stake always returns to the recorded voter, whoever the
    /// caller is.
    pub fn withdraw_by_transaction_id(
        &mut self,
        ctx: &OpContext,
        id: &RecordId,
    ) -> Result<Tickets, ElectionError> {
        let mut record = VotingRecordStore::get(&self.store, id)?
            .ok_or_else(|| ElectionError::NotFound(format!("voting record {id} not found")))?;

        record.mark_withdrawn(ctx.current_age, self.clock.timestamp_at(ctx.current_age))?;

        let mut voter_tickets = TicketLedger::get_or_default(&self.store, &record.from)?;
        voter_tickets.release_outgoing(record.amount);

        let mut candidate_tickets = TicketLedger::get_or_default(&self.store, &record.to)?;
        candidate_tickets.release_incoming(record.amount);

        let tickets_count = self
            .counter(TICKETS_COUNT)?
            .saturating_sub(record.amount.raw());

        self.vault.unlock(&record.from, record.amount)?;
        self.dividends.sub_weight(record.weight, ctx.term_number)?;

        let mut batch = WriteBatch::new();
        VotingRecordStore::save(&mut batch, &record)?;
        TicketLedger::save(&mut batch, &record.from, &voter_tickets)?;
        TicketLedger::save(&mut batch, &record.to, &candidate_tickets)?;
        batch.put_value(StateKey::meta(TICKETS_COUNT), &tickets_count)?;
        self.store.apply(batch)?;

        debug!(record = %id, amount = %record.amount, "vote withdrawn");
        Ok(voter_tickets)
    }

    /// Withdraw every matured vote of the caller in one batch, skipping
    /// immature records without error. Returns the refreshed aggregate.
    pub fn withdraw_all(&mut self, ctx: &OpContext) -> Result<Tickets, ElectionError> {
        let mut caller_tickets = TicketLedger::get(&self.store, &ctx.caller)?.ok_or_else(|| {
            ElectionError::NotFound(format!("tickets information of {} not found", ctx.caller))
        })?;

        // Read-only pass: resolve every record and keep the withdrawable ones.
        let mut due = Vec::new();
        for id in &caller_tickets.voting_records_out {
            let record = VotingRecordStore::get(&self.store, id)?
                .ok_or_else(|| ElectionError::NotFound(format!("voting record {id} not found")))?;
            if record.withdrawn || !record.is_mature(ctx.current_age) {
                continue;
            }
            due.push(record);
        }

        let mut per_candidate: HashMap<IdentityKey, TicketAmount> = HashMap::new();
        for record in &due {
            if TicketLedger::get(&self.store, &record.to)?.is_none() {
                return Err(ElectionError::NotFound(format!(
                    "tickets information of {} not found",
                    record.to
                )));
            }
            let entry = per_candidate
                .entry(record.to.clone())
                .or_insert(TicketAmount::ZERO);
            *entry = entry.saturating_add(record.amount);
        }

        let withdrawal_timestamp = self.clock.timestamp_at(ctx.current_age);
        let mut batch = WriteBatch::new();
        let mut withdrawn_total = TicketAmount::ZERO;
        for mut record in due {
            // Cannot fail: maturity and withdrawal state were checked above.
            record.mark_withdrawn(ctx.current_age, withdrawal_timestamp)?;
            self.vault.unlock(&record.from, record.amount)?;
            self.dividends.sub_weight(record.weight, ctx.term_number)?;
            withdrawn_total = withdrawn_total.saturating_add(record.amount);
            VotingRecordStore::save(&mut batch, &record)?;
        }

        caller_tickets.release_outgoing(withdrawn_total);
        TicketLedger::save(&mut batch, &ctx.caller, &caller_tickets)?;

        for (candidate, amount) in per_candidate {
            let mut candidate_tickets = TicketLedger::get_or_default(&self.store, &candidate)?;
            candidate_tickets.release_incoming(amount);
            TicketLedger::save(&mut batch, &candidate, &candidate_tickets)?;
        }

        let tickets_count = self
            .counter(TICKETS_COUNT)?
            .saturating_sub(withdrawn_total.raw());
        batch.put_value(StateKey::meta(TICKETS_COUNT), &tickets_count)?;
        self.store.apply(batch)?;

        debug!(identity = %ctx.caller, total = %withdrawn_total, "withdrew all matured votes");
        Ok(caller_tickets)
    }

    /// Pay out the dividends of one voting record. Only the recorded voter
    /// may claim. Mutates nothing in this ledger.
    pub fn receive_dividends_by_transaction_id(
        &mut self,
        ctx: &OpContext,
        id: &RecordId,
    ) -> Result<(), ElectionError> {
        let record = VotingRecordStore::get(&self.store, id)?
            .ok_or_else(|| ElectionError::NotFound(format!("voting record {id} not found")))?;

        if record.from != ctx.caller {
            return Err(ElectionError::NoPermission(format!(
                "no permission to receive dividends of record {id}"
            )));
        }

        self.dividends.transfer_dividends(&record)?;
        Ok(())
    }

    /// Pay out the dividends of every vote the caller has cast. A dangling
    /// record id is a consistency violation, not a normal-path skip.
    pub fn receive_all_dividends(&mut self, ctx: &OpContext) -> Result<(), ElectionError> {
        let tickets = TicketLedger::get(&self.store, &ctx.caller)?.ok_or_else(|| {
            ElectionError::NotFound(format!("tickets information of {} not found", ctx.caller))
        })?;
        if tickets.voting_records_out.is_empty() {
            return Err(ElectionError::NotFound("voting records not found".into()));
        }

        let mut records = Vec::with_capacity(tickets.voting_records_out.len());
        for id in &tickets.voting_records_out {
            let record = VotingRecordStore::get(&self.store, id)?
                .ok_or_else(|| ElectionError::NotFound(format!("voting record {id} not found")))?;
            records.push(record);
        }
        for record in &records {
            self.dividends.transfer_dividends(record)?;
        }
        Ok(())
    }

    // ── Read-side queries ────────────────────────────────────────────────

    /// Ticket aggregate of an identity, if it was ever party to a vote.
    pub fn tickets_of(&self, identity: &IdentityKey) -> Result<Option<Tickets>, ElectionError> {
        Ok(TicketLedger::get(&self.store, identity)?)
    }

    /// A voting record by id.
    pub fn record(&self, id: &RecordId) -> Result<Option<VotingRecord>, ElectionError> {
        VotingRecordStore::get(&self.store, id)
    }

    /// The current candidate set.
    pub fn candidates(&self) -> Result<Candidates, ElectionError> {
        Ok(CandidateRegistry::load(&self.store)?.candidates().clone())
    }

    /// Whether an identity is currently a candidate.
    pub fn is_candidate(&self, identity: &IdentityKey) -> Result<bool, ElectionError> {
        Ok(CandidateRegistry::load(&self.store)?.is_candidate(identity))
    }

    /// The current alias of an identity, if it ever announced.
    pub fn alias_of(&self, identity: &IdentityKey) -> Result<Option<String>, ElectionError> {
        Ok(CandidateRegistry::alias_of(&self.store, identity)?)
    }

    /// Number of votes ever cast.
    pub fn votes_count(&self) -> Result<u64, ElectionError> {
        self.counter(VOTES_COUNT)
    }

    /// Stake currently locked behind votes, ledger-wide.
    pub fn tickets_count(&self) -> Result<u64, ElectionError> {
        self.counter(TICKETS_COUNT)
    }

    /// The injected token vault.
    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Mutable access to the injected token vault.
    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    /// The injected dividend book.
    pub fn dividends(&self) -> &D {
        &self.dividends
    }

    fn counter(&self, name: &str) -> Result<u64, ElectionError> {
        Ok(self
            .store
            .get_value::<u64>(&StateKey::meta(name))?
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::nullable::{NullDividendBook, NullVault};
    use tally_store::MemoryStore;
    use tally_types::{Age, Timestamp};

    type TestService = ElectionService<MemoryStore, NullVault, NullDividendBook>;

    fn service() -> TestService {
        ElectionService::new(
            MemoryStore::new(),
            NullVault::new(),
            NullDividendBook::new(),
            AgeClock::new(Timestamp::new(1_600_000_000)),
            ElectionParams::default(),
        )
    }

    fn identity(name: &str) -> IdentityKey {
        IdentityKey::new(format!("04{name:0<62}"))
    }

    fn ctx(name: &str, txn_seed: u8, age: u64) -> OpContext {
        OpContext::new(identity(name), RecordId::new([txn_seed; 32]), Age::new(age), 1, 10)
    }

    #[test]
    fn announce_assigns_default_alias_from_key() {
        let mut svc = service();
        let alias = svc.announce_election(&ctx("alice", 1, 0), "").unwrap();
        assert_eq!(alias, identity("alice").truncated(20));
        assert!(svc.is_candidate(&identity("alice")).unwrap());
        assert_eq!(
            svc.alias_of(&identity("alice")).unwrap(),
            Some(alias.clone())
        );
    }

    #[test]
    fn announce_twice_fails() {
        let mut svc = service();
        svc.announce_election(&ctx("alice", 1, 0), "alice").unwrap();
        let err = svc
            .announce_election(&ctx("alice", 2, 0), "alice2")
            .unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));
    }

    #[test]
    fn announce_locks_the_candidacy_bond() {
        let mut svc = service();
        svc.announce_election(&ctx("alice", 1, 0), "alice").unwrap();
        assert_eq!(svc.vault().locked(&identity("alice")), 100_000);

        svc.quit_election(&ctx("alice", 2, 0)).unwrap();
        assert_eq!(svc.vault().locked(&identity("alice")), 0);
    }

    #[test]
    fn alias_collision_with_other_identity_is_rejected() {
        let mut svc = service();
        svc.announce_election(&ctx("alice", 1, 0), "shared").unwrap();
        let err = svc
            .announce_election(&ctx("bob", 2, 0), "shared")
            .unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));
        assert!(!svc.is_candidate(&identity("bob")).unwrap());
    }

    #[test]
    fn reannounce_with_own_old_alias_is_a_noop_on_the_index() {
        let mut svc = service();
        svc.announce_election(&ctx("alice", 1, 0), "alice").unwrap();
        svc.quit_election(&ctx("alice", 2, 0)).unwrap();

        // Same alias again: registration succeeds, alias state unchanged.
        let alias = svc.announce_election(&ctx("alice", 3, 0), "alice").unwrap();
        assert_eq!(alias, "alice");
        assert!(svc.is_candidate(&identity("alice")).unwrap());
    }

    #[test]
    fn quit_without_announcing_fails() {
        let mut svc = service();
        let err = svc.quit_election(&ctx("alice", 1, 0)).unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));
    }

    #[test]
    fn vote_requires_announced_candidate() {
        let mut svc = service();
        let err = svc
            .vote(&ctx("bob", 1, 0), &identity("alice"), TicketAmount::new(10), 90)
            .unwrap_err();
        assert!(matches!(err, ElectionError::NotFound(_)));

        svc.announce_election(&ctx("alice", 2, 0), "alice").unwrap();
        let err = svc
            .vote(&ctx("bob", 3, 0), &identity("carol"), TicketAmount::new(10), 90)
            .unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));
    }

    #[test]
    fn candidate_cannot_vote() {
        let mut svc = service();
        svc.announce_election(&ctx("alice", 1, 0), "alice").unwrap();
        svc.announce_election(&ctx("bob", 2, 0), "bob").unwrap();
        let err = svc
            .vote(&ctx("bob", 3, 0), &identity("alice"), TicketAmount::new(10), 90)
            .unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));
    }

    #[test]
    fn lock_day_boundaries() {
        let mut svc = service();
        svc.announce_election(&ctx("alice", 1, 0), "alice").unwrap();
        let alice = identity("alice");
        let amount = TicketAmount::new(10);

        let err = svc.vote(&ctx("bob", 2, 0), &alice, amount, 89).unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));
        let err = svc.vote(&ctx("bob", 3, 0), &alice, amount, 1096).unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));

        svc.vote(&ctx("bob", 4, 0), &alice, amount, 90).unwrap();
        svc.vote(&ctx("bob", 5, 0), &alice, amount, 1095).unwrap();
    }

    #[test]
    fn duplicate_transaction_id_fails() {
        let mut svc = service();
        svc.announce_election(&ctx("alice", 1, 0), "alice").unwrap();
        svc.vote(&ctx("bob", 7, 0), &identity("alice"), TicketAmount::new(10), 90)
            .unwrap();
        let err = svc
            .vote(&ctx("bob", 7, 0), &identity("alice"), TicketAmount::new(10), 90)
            .unwrap_err();
        assert!(matches!(err, ElectionError::AttemptFailed(_)));
    }

    #[test]
    fn announce_with_live_votes_fails_until_withdrawn() {
        let mut svc = service();
        svc.announce_election(&ctx("alice", 1, 0), "alice").unwrap();
        let id = svc
            .vote(&ctx("bob", 2, 0), &identity("alice"), TicketAmount::new(10), 90)
            .unwrap();

        let err = svc.announce_election(&ctx("bob", 3, 0), "bob").unwrap_err();
        assert!(matches!(err, ElectionError::InvalidOperation(_)));

        svc.withdraw_by_transaction_id(&ctx("bob", 4, 90), &id)
            .unwrap();
        svc.announce_election(&ctx("bob", 5, 90), "bob").unwrap();
    }

    #[test]
    fn receive_dividends_requires_ownership() {
        let mut svc = service();
        svc.announce_election(&ctx("alice", 1, 0), "alice").unwrap();
        let id = svc
            .vote(&ctx("bob", 2, 0), &identity("alice"), TicketAmount::new(10), 90)
            .unwrap();

        let err = svc
            .receive_dividends_by_transaction_id(&ctx("carol", 3, 0), &id)
            .unwrap_err();
        assert!(matches!(err, ElectionError::NoPermission(_)));

        svc.receive_dividends_by_transaction_id(&ctx("bob", 4, 0), &id)
            .unwrap();
    }

    #[test]
    fn receive_all_dividends_requires_some_votes() {
        let mut svc = service();
        let err = svc.receive_all_dividends(&ctx("bob", 1, 0)).unwrap_err();
        assert!(matches!(err, ElectionError::NotFound(_)));
    }
}
