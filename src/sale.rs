//! Sale construction from an in-memory product catalog.
//!
//! A [`SaleBuilder`] accumulates one quantity per product, keeps a running
//! total, and produces the [`SalePayload`] the quick-delivery endpoints take.

use rust_decimal::Decimal;

use crate::error::{RepartoError, Result};
use crate::ledger::ContainerType;
use crate::models::{ContainerMovement, PaymentMethod, Product, SaleItem, SalePayload};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Products available for sale, in display order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from the active products of `products`.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().filter(|p| p.active).collect(),
        }
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive name substring search.
    pub fn search(&self, name: &str) -> Vec<&Product> {
        let needle = name.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SaleBuilder
// ---------------------------------------------------------------------------

/// Sale being assembled for one client.
///
/// Lines keep the order in which products were first added. The unit price is
/// taken from the catalog when the line is created.
#[derive(Debug, Clone)]
pub struct SaleBuilder<'a> {
    catalog: &'a Catalog,
    client_id: String,
    lines: Vec<SaleItem>,
    payment_method: PaymentMethod,
    amount_received: Option<Decimal>,
    note: Option<String>,
    container_loans: Vec<ContainerMovement>,
    container_returns: Vec<ContainerMovement>,
}

impl<'a> SaleBuilder<'a> {
    pub fn new(client_id: impl Into<String>, catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            client_id: client_id.into(),
            lines: Vec::new(),
            payment_method: PaymentMethod::Cash,
            amount_received: None,
            note: None,
            container_loans: Vec::new(),
            container_returns: Vec::new(),
        }
    }

    /// Set the quantity of a product. Zero removes the line.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> Result<&mut Self> {
        let catalog = self.catalog;
        let product = catalog
            .get(product_id)
            .ok_or_else(|| RepartoError::NotFound(format!("product {}", product_id)))?;

        match self.lines.iter().position(|l| l.product_id == product_id) {
            Some(idx) if quantity == 0 => {
                self.lines.remove(idx);
            }
            Some(idx) => self.lines[idx].quantity = quantity,
            None if quantity == 0 => {}
            None => self.lines.push(SaleItem {
                product_id: product.id.clone(),
                quantity,
                unit_price: product.price,
            }),
        }
        Ok(self)
    }

    pub fn increment(&mut self, product_id: &str) -> Result<&mut Self> {
        let qty = self.quantity(product_id).saturating_add(1);
        self.set_quantity(product_id, qty)
    }

    /// Decrease by one; a line at one is removed.
    pub fn decrement(&mut self, product_id: &str) -> Result<&mut Self> {
        let qty = self.quantity(product_id).saturating_sub(1);
        self.set_quantity(product_id, qty)
    }

    pub fn quantity(&self, product_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    pub fn lines(&self) -> &[SaleItem] {
        &self.lines
    }

    /// Unit price times quantity, summed over all lines.
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(SaleItem::subtotal).sum()
    }

    pub fn payment_method(&mut self, method: PaymentMethod) -> &mut Self {
        self.payment_method = method;
        self
    }

    /// Amount handed over by the client; less than the total leaves a balance.
    pub fn amount_received(&mut self, amount: Decimal) -> &mut Self {
        self.amount_received = Some(amount);
        self
    }

    pub fn note(&mut self, note: impl Into<String>) -> &mut Self {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
        self
    }

    pub fn lend_containers(&mut self, container_type: ContainerType, quantity: u32) -> &mut Self {
        push_movement(&mut self.container_loans, container_type, quantity);
        self
    }

    pub fn collect_containers(&mut self, container_type: ContainerType, quantity: u32) -> &mut Self {
        push_movement(&mut self.container_returns, container_type, quantity);
        self
    }

    /// Produce the request body.
    ///
    /// Credit sales leave the whole total as balance. Otherwise a received
    /// amount below the total marks the sale as partially paid.
    pub fn build(&self, deliverer_id: Option<String>) -> Result<SalePayload> {
        if self.lines.is_empty() {
            return Err(RepartoError::Validation("sale has no products".into()));
        }
        let total = self.total();

        let (fully_paid, remaining_balance) = match (self.payment_method, self.amount_received) {
            (PaymentMethod::Credit, _) => (Some(false), Some(total)),
            (_, Some(received)) if received < Decimal::ZERO => {
                return Err(RepartoError::Validation(format!(
                    "amount received must not be negative, got {}",
                    received
                )));
            }
            (_, Some(received)) if received < total => (Some(false), Some(total - received)),
            (_, Some(_)) => (Some(true), Some(Decimal::ZERO)),
            (_, None) => (None, None),
        };

        Ok(SalePayload {
            client_id: self.client_id.clone(),
            items: self.lines.clone(),
            total,
            payment_method: self.payment_method,
            fully_paid,
            remaining_balance,
            deliverer_id,
            container_loans: self.container_loans.clone(),
            container_returns: self.container_returns.clone(),
            note: self.note.clone(),
        })
    }
}

fn push_movement(list: &mut Vec<ContainerMovement>, container_type: ContainerType, quantity: u32) {
    if quantity == 0 {
        return;
    }
    match list.iter_mut().find(|m| m.container_type == container_type) {
        Some(m) => m.quantity = m.quantity.saturating_add(quantity),
        None => list.push(ContainerMovement {
            container_type,
            quantity,
        }),
    }
}
