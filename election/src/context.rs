//! Per-operation context supplied by the host chain.

use tally_types::{Age, IdentityKey, RecordId};

/// Read-only inputs to one ledger operation: the authenticated caller, the
/// id of the enclosing transaction, and the consensus counters at execution
/// time. Owned by the host's transaction machinery — this ledger never reads
/// ambient state.
#[derive(Clone, Debug)]
pub struct OpContext {
    /// Identity recovered from the transaction signature.
    pub caller: IdentityKey,
    /// Hash of the enclosing transaction; keys the voting record a `vote`
    /// call creates.
    pub txn_id: RecordId,
    /// Current consensus age.
    pub current_age: Age,
    /// Current term number.
    pub term_number: u64,
    /// Current round number.
    pub round_number: u64,
}

impl OpContext {
    pub fn new(
        caller: IdentityKey,
        txn_id: RecordId,
        current_age: Age,
        term_number: u64,
        round_number: u64,
    ) -> Self {
        Self {
            caller,
            txn_id,
            current_age,
            term_number,
            round_number,
        }
    }
}
