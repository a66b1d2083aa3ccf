//! Quick-delivery ("repartidor-rapido") operations performed at the door.
//!
//! Every operation is stamped with the deliverer id. Payloads that already
//! carry one keep it; otherwise the session's deliverer is used.

use chrono::Utc;
use rust_decimal::Decimal;

use crate::config;
use crate::error::{RepartoError, Result};
use crate::http::ApiClient;
use crate::models::{NotFoundPayload, PaymentMethod, PaymentPayload, Receipt, SalePayload};

pub struct DeliveryEndpoint<'a> {
    api: &'a ApiClient,
}

impl<'a> DeliveryEndpoint<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Register a paid (or partially paid) sale.
    pub fn register_sale(&self, sale: &SalePayload) -> Result<Receipt> {
        if sale.payment_method == PaymentMethod::Credit {
            return self.register_credit_sale(sale);
        }
        let payload = self.stamp(sale)?;
        check_sale(&payload)?;
        tracing::debug!(client = %payload.client_id, total = %payload.total, "registering sale");
        self.post(config::QUICK_SALE_PATH, &payload)
    }

    /// Register a sale on store credit: the whole total becomes debt.
    pub fn register_credit_sale(&self, sale: &SalePayload) -> Result<Receipt> {
        let mut payload = self.stamp(sale)?;
        payload.payment_method = PaymentMethod::Credit;
        payload.fully_paid = Some(false);
        payload.remaining_balance = Some(payload.total);
        check_sale(&payload)?;
        tracing::debug!(client = %payload.client_id, total = %payload.total, "registering credit sale");
        self.post(config::QUICK_CREDIT_PATH, &payload)
    }

    /// Register a payment towards a client's debt.
    pub fn register_payment(
        &self,
        client_id: &str,
        amount: Decimal,
        method: PaymentMethod,
        note: Option<String>,
    ) -> Result<Receipt> {
        if amount <= Decimal::ZERO {
            return Err(RepartoError::Validation(format!(
                "payment must be positive, got {}",
                amount
            )));
        }
        if method == PaymentMethod::Credit {
            return Err(RepartoError::InvalidArgument(
                "a payment cannot itself be on credit".into(),
            ));
        }
        let payload = PaymentPayload {
            client_id: client_id.to_string(),
            amount,
            payment_method: method,
            deliverer_id: Some(self.api.require_deliverer_id()?),
            note,
        };
        self.post(config::QUICK_PAYMENT_PATH, &payload)
    }

    /// Register a visit where the client was not found.
    pub fn register_not_found(&self, client_id: &str, note: Option<String>) -> Result<Receipt> {
        let payload = NotFoundPayload {
            client_id: client_id.to_string(),
            deliverer_id: Some(self.api.require_deliverer_id()?),
            visited_at: Utc::now(),
            note,
        };
        self.post(config::QUICK_NOT_FOUND_PATH, &payload)
    }

    fn stamp(&self, sale: &SalePayload) -> Result<SalePayload> {
        let mut payload = sale.clone();
        if payload.deliverer_id.is_none() {
            payload.deliverer_id = Some(self.api.require_deliverer_id()?);
        }
        Ok(payload)
    }

    fn post<B: serde::Serialize>(&self, path: &str, body: &B) -> Result<Receipt> {
        let receipt: Option<Receipt> = self.api.post(path, body)?;
        Ok(receipt.unwrap_or_default())
    }
}

/// Reject payloads the API would store inconsistently.
fn check_sale(sale: &SalePayload) -> Result<()> {
    if sale.items.is_empty() {
        return Err(RepartoError::Validation("sale has no products".into()));
    }
    if let Some(item) = sale.items.iter().find(|i| i.quantity == 0) {
        return Err(RepartoError::Validation(format!(
            "product {} has zero quantity",
            item.product_id
        )));
    }
    let computed: Decimal = sale.items.iter().map(|i| i.subtotal()).sum();
    if computed != sale.total {
        return Err(RepartoError::Validation(format!(
            "sale total {} does not match its lines ({})",
            sale.total, computed
        )));
    }
    if let Some(balance) = sale.remaining_balance {
        if balance.is_sign_negative() || balance > sale.total {
            return Err(RepartoError::Validation(format!(
                "remaining balance {} out of range",
                balance
            )));
        }
    }
    Ok(())
}
