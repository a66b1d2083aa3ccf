//! In-memory ledgers for amounts owed ("fiados") and loaned containers
//! ("envases").
//!
//! Both ledgers share one shape: entries are created from a draft, later
//! settled, and the outstanding total is the sum over unsettled entries.
//! Nothing here is persisted; the remote API remains the record of truth.

pub mod containers;
pub mod debt;

pub use containers::{ContainerLedger, ContainerLoan, ContainerType, NewContainerLoan};
pub use debt::{DebtEntry, DebtLedger, NewDebt};

use chrono::{DateTime, Utc};
use std::iter::Sum;

use crate::error::{RepartoError, Result};

/// Local identifier, milliseconds since the epoch at creation time.
pub type EntryId = i64;

/// An entry kind a [`Ledger`] can hold.
pub trait LedgerEntry: Sized {
    /// Form input used to create an entry.
    type Draft;
    /// What settling an entry takes (payment amount, nothing for returns).
    type Settlement;
    /// Unit the outstanding total is measured in.
    type Amount: Copy + Sum<Self::Amount>;

    /// Reject drafts that must not produce an entry.
    fn validate(draft: &Self::Draft) -> Result<()>;

    fn open(id: EntryId, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    fn id(&self) -> EntryId;

    fn is_settled(&self) -> bool;

    fn settle(&mut self, settlement: Self::Settlement, at: DateTime<Utc>) -> Result<()>;

    /// Amount this entry contributes while unsettled.
    fn amount(&self) -> Self::Amount;
}

/// Ordered list of entries, newest first.
#[derive(Debug, Clone)]
pub struct Ledger<E> {
    entries: Vec<E>,
    last_id: EntryId,
}

impl<E> Default for Ledger<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            last_id: 0,
        }
    }
}

impl<E: LedgerEntry> Ledger<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing entries, e.g. ones fetched from the API.
    ///
    /// Entries are kept in the given order.
    pub fn from_entries(entries: Vec<E>) -> Self {
        let last_id = entries.iter().map(E::id).max().unwrap_or(0);
        Self { entries, last_id }
    }

    /// Create an entry stamped with the current time.
    pub fn create(&mut self, draft: E::Draft) -> Result<&E> {
        self.create_at(draft, Utc::now())
    }

    /// Create an entry stamped with `now`.
    ///
    /// An invalid draft returns `Validation` and leaves the ledger untouched.
    /// The new entry is prepended.
    pub fn create_at(&mut self, draft: E::Draft, now: DateTime<Utc>) -> Result<&E> {
        E::validate(&draft)?;
        let next = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepartoError::Validation("ledger ids exhausted".into()))?;
        let id = now.timestamp_millis().max(next);
        self.last_id = id;
        self.entries.insert(0, E::open(id, now, draft));
        Ok(&self.entries[0])
    }

    pub fn settle(&mut self, id: EntryId, settlement: E::Settlement) -> Result<&E> {
        self.settle_at(id, settlement, Utc::now())
    }

    /// Settle one entry. Settling an entry that is already settled changes
    /// nothing and succeeds.
    pub fn settle_at(
        &mut self,
        id: EntryId,
        settlement: E::Settlement,
        now: DateTime<Utc>,
    ) -> Result<&E> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| RepartoError::NotFound(format!("ledger entry {}", id)))?;
        let entry = &mut self.entries[idx];
        if entry.is_settled() {
            tracing::debug!(id, "entry already settled");
        } else {
            entry.settle(settlement, now)?;
        }
        Ok(&self.entries[idx])
    }

    /// Sum of amounts over unsettled entries.
    pub fn total_outstanding(&self) -> E::Amount {
        self.outstanding().map(E::amount).sum()
    }

    pub fn outstanding(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().filter(|e| !e.is_settled())
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&E> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
