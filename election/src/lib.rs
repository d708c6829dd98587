//! Election and voting ledger for delegated-proof-of-stake consensus.
//!
//! Identities announce candidacy, other identities lock stake as time-weighted
//! votes ("tickets") for candidates, and locked stake converts into a dividend
//! weight consumed by the reward-distribution engine. The host chain supplies
//! a global total order over calls; every operation here validates fully, then
//! applies one atomic batch of mutations — no partial state is ever observable.
//!
//! ## Module overview
//!
//! - [`service`] — the public operation surface (announce, quit, vote,
//!   withdraw, dividends) and the cross-component invariants.
//! - [`candidates`] — candidate set, alias index, alias history.
//! - [`tickets`] — per-identity ticket aggregates and record indexes.
//! - [`records`] — the authoritative per-vote record and its lifecycle.
//! - [`weight`] — pluggable dividend-weight strategy.
//! - [`age`] — consensus-age to calendar-time conversion.
//! - [`context`] — per-operation read-only context (caller, age, term, round).
//! - [`ports`] — injected collaborators (token vault, dividend book).
//! - [`error`] — election error types.

pub mod age;
pub mod candidates;
pub mod context;
pub mod error;
pub mod ports;
pub mod records;
pub mod service;
pub mod tickets;
pub mod weight;

pub use age::AgeClock;
pub use candidates::{CandidateHistory, CandidateRegistry, Candidates};
pub use context::OpContext;
pub use error::ElectionError;
pub use ports::{DividendBook, PortError, TokenVault};
pub use records::{VotingRecord, VotingRecordStore};
pub use service::ElectionService;
pub use tickets::{TicketLedger, Tickets};
pub use weight::{StandardWeight, WeightStrategy};
