//! Candidate set, alias index, and alias history.
//!
//! The candidate set is a unique list of identity keys with a parallel list
//! of derived addresses. The alias index maps each alias to at most one
//! identity; every alias an identity has ever used is kept in its history,
//! with the current one marked.

use crate::error::ElectionError;
use serde::{Deserialize, Serialize};
use tally_store::{columns, StateKey, StateStore, StoreError, WriteBatch};
use tally_types::{Address, ElectionParams, IdentityKey};

/// The announced candidate set: unique keys plus parallel derived addresses.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Candidates {
    keys: Vec<IdentityKey>,
    addresses: Vec<Address>,
}

impl Candidates {
    pub fn contains(&self, identity: &IdentityKey) -> bool {
        self.keys.contains(identity)
    }

    /// Add a candidate. Returns false (and changes nothing) if already present.
    pub fn add(&mut self, identity: IdentityKey) -> bool {
        if self.contains(&identity) {
            return false;
        }
        self.addresses.push(Address::from_identity(&identity));
        self.keys.push(identity);
        true
    }

    /// Remove a candidate. Returns false if the entry was not present.
    pub fn remove(&mut self, identity: &IdentityKey) -> bool {
        match self.keys.iter().position(|k| k == identity) {
            Some(index) => {
                self.keys.remove(index);
                self.addresses.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn keys(&self) -> &[IdentityKey] {
        &self.keys
    }

    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Every alias an identity has used, with the current one marked.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CandidateHistory {
    pub aliases: Vec<String>,
    pub current_alias: String,
}

impl CandidateHistory {
    /// Record `alias` as current, appending it to the history if new.
    pub fn adopt(&mut self, alias: &str) {
        if !self.aliases.iter().any(|a| a == alias) {
            self.aliases.push(alias.to_string());
        }
        self.current_alias = alias.to_string();
    }
}

/// Store-backed view over the candidate set and alias columns.
pub struct CandidateRegistry {
    candidates: Candidates,
}

impl CandidateRegistry {
    fn set_key() -> StateKey {
        StateKey::new(columns::CANDIDATES, "set")
    }

    fn alias_key(alias: &str) -> StateKey {
        StateKey::new(columns::ALIAS, alias)
    }

    fn alias_of_key(identity: &IdentityKey) -> StateKey {
        StateKey::new(columns::ALIAS_OF, identity.as_str())
    }

    fn history_key(identity: &IdentityKey) -> StateKey {
        StateKey::new(columns::HISTORY, identity.as_str())
    }

    /// Load the candidate set (empty if nothing announced yet).
    pub fn load<S: StateStore>(store: &S) -> Result<Self, StoreError> {
        let candidates = store
            .get_value::<Candidates>(&Self::set_key())?
            .unwrap_or_default();
        Ok(Self { candidates })
    }

    pub fn is_candidate(&self, identity: &IdentityKey) -> bool {
        self.candidates.contains(identity)
    }

    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    /// Register an identity as a candidate. Returns false if already present.
    pub fn admit(&mut self, identity: IdentityKey) -> bool {
        self.candidates.add(identity)
    }

    /// Deregister a candidate. Returns false if the entry was not present.
    pub fn expel(&mut self, identity: &IdentityKey) -> bool {
        self.candidates.remove(identity)
    }

    /// Stage the candidate set.
    pub fn save(&self, batch: &mut WriteBatch) -> Result<(), StoreError> {
        batch.put_value(Self::set_key(), &self.candidates)
    }

    /// Pick the alias an announcing identity ends up with: the proposal if it
    /// is non-empty and within the limit, otherwise the identity key
    /// truncated to the limit.
    pub fn resolve_alias(
        params: &ElectionParams,
        identity: &IdentityKey,
        proposed: &str,
    ) -> String {
        if proposed.is_empty() || proposed.chars().count() > params.alias_limit {
            identity.truncated(params.alias_limit)
        } else {
            proposed.to_string()
        }
    }

    /// The identity an alias currently maps to, if any.
    pub fn alias_owner<S: StateStore>(
        store: &S,
        alias: &str,
    ) -> Result<Option<IdentityKey>, StoreError> {
        store.get_value(&Self::alias_key(alias))
    }

    /// The current alias of an identity, if it ever announced.
    pub fn alias_of<S: StateStore>(
        store: &S,
        identity: &IdentityKey,
    ) -> Result<Option<String>, StoreError> {
        store.get_value(&Self::alias_of_key(identity))
    }

    /// The alias history of an identity, if any.
    pub fn history<S: StateStore>(
        store: &S,
        identity: &IdentityKey,
    ) -> Result<Option<CandidateHistory>, StoreError> {
        store.get_value(&Self::history_key(identity))
    }

    /// Stage the alias index and history updates for an identity adopting
    /// `alias`. The caller has already checked ownership of the alias.
    pub fn assign_alias<S: StateStore>(
        store: &S,
        batch: &mut WriteBatch,
        identity: &IdentityKey,
        alias: &str,
    ) -> Result<(), ElectionError> {
        batch.put_value(Self::alias_key(alias), identity)?;
        batch.put_value(Self::alias_of_key(identity), &alias.to_string())?;

        let mut history = Self::history(store, identity)?.unwrap_or_default();
        history.adopt(alias);
        batch.put_value(Self::history_key(identity), &history)?;
        Ok(())
    }
}
