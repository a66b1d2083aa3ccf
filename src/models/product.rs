use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::ContainerType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    /// Returnable container the product ships in, if any.
    pub container_type: Option<ContainerType>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub container_type: Option<ContainerType>,
}
