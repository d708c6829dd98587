//! Namespaced state keys.

use std::fmt;

/// Column names used by the election ledger.
pub mod columns {
    /// The candidate set (single entry).
    pub const CANDIDATES: &str = "candidates";
    /// alias → identity key.
    pub const ALIAS: &str = "alias";
    /// identity key → current alias.
    pub const ALIAS_OF: &str = "alias_of";
    /// identity key → alias history.
    pub const HISTORY: &str = "history";
    /// identity key → ticket aggregate.
    pub const TICKETS: &str = "tickets";
    /// record id (hex) → voting record.
    pub const RECORD: &str = "record";
    /// Global counters and bookkeeping.
    pub const META: &str = "meta";
}

/// A state key: a static column name plus a key string within the column.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateKey {
    pub column: &'static str,
    pub key: String,
}

impl StateKey {
    pub fn new(column: &'static str, key: impl Into<String>) -> Self {
        Self {
            column,
            key: key.into(),
        }
    }

    /// Key into the meta column.
    pub fn meta(key: impl Into<String>) -> Self {
        Self::new(columns::META, key)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.column, self.key)
    }
}
