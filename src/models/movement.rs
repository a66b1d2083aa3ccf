use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::ContainerType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Sale,
    Payment,
    CreditSale,
    ContainerLoan,
    ContainerReturn,
    NotFound,
}

/// One line of a client's movement history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,
    pub client_id: String,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub date: DateTime<Utc>,
    pub amount: Option<Decimal>,
    pub container_type: Option<ContainerType>,
    pub quantity: Option<u32>,
    pub note: Option<String>,
}
