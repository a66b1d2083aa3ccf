use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::sale::PaymentMethod;

/// Sales summary computed server-side for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_sales: Decimal,
    pub sale_count: u32,
    #[serde(default)]
    pub by_payment_method: HashMap<PaymentMethod, Decimal>,
    #[serde(default)]
    pub credit_outstanding: Decimal,
}
