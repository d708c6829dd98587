//! Fundamental types for the tally election ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: identity keys, derived addresses, voting-record ids, ticket
//! amounts, the consensus age counter, timestamps, and election parameters.

pub mod age;
pub mod amount;
pub mod identity;
pub mod params;
pub mod record;
pub mod time;

pub use age::Age;
pub use amount::TicketAmount;
pub use identity::{Address, IdentityKey};
pub use params::ElectionParams;
pub use record::RecordId;
pub use time::Timestamp;
