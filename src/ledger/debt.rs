use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EntryId, Ledger, LedgerEntry};
use crate::error::{RepartoError, Result};

pub type DebtLedger = Ledger<DebtEntry>;

/// Amount a client owes from a credit sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtEntry {
    pub id: EntryId,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub amount_paid: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct NewDebt {
    pub amount: Decimal,
    pub note: Option<String>,
}

impl NewDebt {
    pub fn new(amount: Decimal) -> Self {
        Self { amount, note: None }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl LedgerEntry for DebtEntry {
    type Draft = NewDebt;
    type Settlement = Decimal;
    type Amount = Decimal;

    fn validate(draft: &NewDebt) -> Result<()> {
        if draft.amount <= Decimal::ZERO {
            return Err(RepartoError::Validation(format!(
                "debt amount must be positive, got {}",
                draft.amount
            )));
        }
        Ok(())
    }

    fn open(id: EntryId, created_at: DateTime<Utc>, draft: NewDebt) -> Self {
        Self {
            id,
            amount: draft.amount,
            created_at,
            note: draft.note.filter(|n| !n.trim().is_empty()),
            paid: false,
            paid_at: None,
            amount_paid: None,
        }
    }

    fn id(&self) -> EntryId {
        self.id
    }

    fn is_settled(&self) -> bool {
        self.paid
    }

    /// Record a payment. It must be positive and no larger than the debt.
    fn settle(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(RepartoError::Validation(format!(
                "payment must be positive, got {}",
                amount
            )));
        }
        if amount > self.amount {
            return Err(RepartoError::Validation(format!(
                "payment {} exceeds debt of {}",
                amount, self.amount
            )));
        }
        self.paid = true;
        self.paid_at = Some(at);
        self.amount_paid = Some(amount);
        Ok(())
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Ledger<DebtEntry> {
    /// Mark a debt as paid with the given amount.
    pub fn pay(&mut self, id: EntryId, amount: Decimal) -> Result<&DebtEntry> {
        self.settle(id, amount)
    }

    /// Mark a debt as paid for its full amount.
    pub fn pay_in_full(&mut self, id: EntryId) -> Result<&DebtEntry> {
        let amount = self
            .get(id)
            .map(|d| d.amount)
            .ok_or_else(|| RepartoError::NotFound(format!("ledger entry {}", id)))?;
        self.settle(id, amount)
    }
}
