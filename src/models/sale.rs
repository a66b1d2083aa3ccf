use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ledger::ContainerType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Debit,
    /// Store credit ("fiado"): the amount is owed until paid.
    Credit,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Cash,
        PaymentMethod::Transfer,
        PaymentMethod::Debit,
        PaymentMethod::Credit,
    ];
}

// ---------------------------------------------------------------------------
// SaleItem / ContainerMovement — payload building blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl SaleItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerMovement {
    pub container_type: ContainerType,
    pub quantity: u32,
}

// ---------------------------------------------------------------------------
// SalePayload — body of the quick-delivery sale endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePayload {
    pub client_id: String,
    pub items: Vec<SaleItem>,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_balance: Option<Decimal>,
    pub deliverer_id: Option<String>,
    #[serde(default)]
    pub container_loans: Vec<ContainerMovement>,
    #[serde(default)]
    pub container_returns: Vec<ContainerMovement>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    pub client_id: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub deliverer_id: Option<String>,
    pub note: Option<String>,
}

/// Visit where the client was not at the address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotFoundPayload {
    pub client_id: String,
    pub deliverer_id: Option<String>,
    pub visited_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Acknowledgement returned by write endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Receipt {
    /// Some back ends answer with a numeric id; it is kept as text.
    #[serde(deserialize_with = "id_as_string")]
    pub id: Option<String>,
    pub message: Option<String>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Sale — a persisted sale as listed in the sales history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub client_id: String,
    pub client_name: Option<String>,
    #[serde(default)]
    pub items: Vec<SaleItem>,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    #[serde(default = "default_fully_paid")]
    pub fully_paid: bool,
    pub remaining_balance: Option<Decimal>,
    pub deliverer_id: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_fully_paid() -> bool {
    true
}
