use crate::models::{Bet, BetCreate, BetUpdate};
use crate::utils::aggregation::{summarize, Summary};
use crate::utils::filtering::BetFilter;
use crate::utils::validation::{validate, ValidationError};
use chrono::Utc;
use std::collections::BTreeMap;
use thiserror::Error;

/// Failures from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Bet not found")]
    NotFound,
    #[error("validation failed")]
    Invalid(Vec<ValidationError>),
}

/// In-memory bet ledger. Owns id assignment and timestamp stamping;
/// every write path re-validates the whole record before it lands.
#[derive(Debug)]
pub struct BetStore {
    bets: BTreeMap<i64, Bet>,
    next_id: i64,
}

impl Default for BetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BetStore {
    pub fn new() -> Self {
        BetStore {
            bets: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Restore a previously saved ledger, keeping ids stable
    pub fn load(&mut self, bets: Vec<Bet>) {
        for bet in bets {
            self.next_id = self.next_id.max(bet.id + 1);
            self.bets.insert(bet.id, bet);
        }
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// Validate and insert a new bet, assigning its id and `created_at`
    pub fn create(&mut self, input: &BetCreate) -> Result<Bet, StoreError> {
        let validated = validate(input).map_err(StoreError::Invalid)?;

        let id = self.next_id;
        self.next_id += 1;

        let bet = validated.into_record(id, Utc::now(), None);
        self.bets.insert(id, bet.clone());
        Ok(bet)
    }

    pub fn get(&self, id: i64) -> Result<Bet, StoreError> {
        self.bets.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    /// Newest wagers first, then the filter's criteria and skip/limit
    /// window
    pub fn list(&self, filter: &BetFilter) -> Vec<Bet> {
        let mut all: Vec<Bet> = self.bets.values().cloned().collect();
        all.sort_by(|a, b| b.bet_placed_date.cmp(&a.bet_placed_date));
        filter.apply(&all)
    }

    /// Merge a partial update onto the stored record, re-validate the
    /// whole thing, and stamp `updated_at`. Nothing is applied when
    /// validation fails.
    pub fn update(&mut self, id: i64, patch: &BetUpdate) -> Result<Bet, StoreError> {
        let existing = self.bets.get(&id).ok_or(StoreError::NotFound)?;
        let created_at = existing.created_at;

        let mut merged = patch.merge_into(existing.to_create());
        // The stored description tracks the fields it was built from
        // unless the patch pins one explicitly
        if patch.description.is_none() && patch.affects_description() {
            merged.description = None;
        }

        let validated = validate(&merged).map_err(StoreError::Invalid)?;
        let bet = validated.into_record(id, created_at, Some(Utc::now()));
        self.bets.insert(id, bet.clone());
        Ok(bet)
    }

    /// Replace the whole record, keeping its id and `created_at`
    pub fn replace(&mut self, id: i64, input: &BetCreate) -> Result<Bet, StoreError> {
        let existing = self.bets.get(&id).ok_or(StoreError::NotFound)?;
        let created_at = existing.created_at;

        let validated = validate(input).map_err(StoreError::Invalid)?;
        let bet = validated.into_record(id, created_at, Some(Utc::now()));
        self.bets.insert(id, bet.clone());
        Ok(bet)
    }

    /// Hard delete. Unknown ids are an error, not a no-op.
    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.bets
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    /// Summary over the full ledger
    pub fn summary(&self) -> Summary {
        let all: Vec<Bet> = self.bets.values().cloned().collect();
        summarize(&all)
    }
}
