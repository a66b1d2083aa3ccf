use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{EntryId, Ledger, LedgerEntry};
use crate::error::{RepartoError, Result};

pub type ContainerLedger = Ledger<ContainerLoan>;

/// Returnable container sizes handled by the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    #[serde(rename = "bottle_500ml")]
    Bottle500ml,
    #[serde(rename = "bottle_1l")]
    Bottle1L,
    #[serde(rename = "bottle_2l")]
    Bottle2L,
    #[serde(rename = "jug_10l")]
    Jug10L,
    #[serde(rename = "jug_12l")]
    Jug12L,
    #[serde(rename = "jug_20l")]
    Jug20L,
}

impl ContainerType {
    pub const ALL: [ContainerType; 6] = [
        ContainerType::Bottle500ml,
        ContainerType::Bottle1L,
        ContainerType::Bottle2L,
        ContainerType::Jug10L,
        ContainerType::Jug12L,
        ContainerType::Jug20L,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContainerType::Bottle500ml => "Botella 500ml",
            ContainerType::Bottle1L => "Botella 1L",
            ContainerType::Bottle2L => "Botella 2L",
            ContainerType::Jug10L => "Bidón 10L",
            ContainerType::Jug12L => "Bidón 12L",
            ContainerType::Jug20L => "Bidón 20L",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Containers left with a client, tracked until returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerLoan {
    pub id: EntryId,
    pub container_type: ContainerType,
    pub quantity: u32,
    pub loaned_at: DateTime<Utc>,
    pub returned: bool,
    pub returned_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewContainerLoan {
    pub container_type: ContainerType,
    pub quantity: u32,
    pub note: Option<String>,
}

impl NewContainerLoan {
    pub fn new(container_type: ContainerType, quantity: u32) -> Self {
        Self {
            container_type,
            quantity,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl LedgerEntry for ContainerLoan {
    type Draft = NewContainerLoan;
    /// Returns are all-or-nothing.
    type Settlement = ();
    type Amount = u32;

    fn validate(draft: &NewContainerLoan) -> Result<()> {
        if draft.quantity == 0 {
            return Err(RepartoError::Validation(
                "container quantity must be positive".into(),
            ));
        }
        Ok(())
    }

    fn open(id: EntryId, created_at: DateTime<Utc>, draft: NewContainerLoan) -> Self {
        Self {
            id,
            container_type: draft.container_type,
            quantity: draft.quantity,
            loaned_at: created_at,
            returned: false,
            returned_at: None,
            note: draft.note.filter(|n| !n.trim().is_empty()),
        }
    }

    fn id(&self) -> EntryId {
        self.id
    }

    fn is_settled(&self) -> bool {
        self.returned
    }

    fn settle(&mut self, _: (), at: DateTime<Utc>) -> Result<()> {
        self.returned = true;
        self.returned_at = Some(at);
        Ok(())
    }

    fn amount(&self) -> u32 {
        self.quantity
    }
}

impl Ledger<ContainerLoan> {
    /// Mark a loan as fully returned.
    pub fn mark_returned(&mut self, id: EntryId) -> Result<&ContainerLoan> {
        self.settle(id, ())
    }

    /// Unreturned quantities per container type.
    pub fn outstanding_by_type(&self) -> BTreeMap<ContainerType, u32> {
        let mut totals = BTreeMap::new();
        for loan in self.outstanding() {
            *totals.entry(loan.container_type).or_insert(0) += loan.quantity;
        }
        totals
    }
}
