//! Client-side listing helpers and sales balance aggregation.
//!
//! The API returns small lists (tens to hundreds of rows), so filtering,
//! paging and totals are computed locally over the fetched data.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{PaymentMethod, Sale};

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One page of a locally paginated list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number, clamped to the last page.
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice `items` into pages of `page_size` and return page `page` (1-based).
///
/// Page 0 is treated as page 1; a page past the end returns the last page.
/// A `page_size` of 0 puts everything on one page.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let total_items = items.len();
    let page_size = if page_size == 0 { total_items.max(1) } else { page_size };
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    Page {
        items: items[start..end].to_vec(),
        page,
        page_size,
        total_items,
        total_pages,
    }
}

// ---------------------------------------------------------------------------
// SalesBalance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesBalance {
    pub sale_count: usize,
    pub total: Decimal,
    pub by_payment_method: HashMap<PaymentMethod, Decimal>,
    /// Amount still owed across credit and partially paid sales.
    pub outstanding: Decimal,
    /// Total minus outstanding.
    pub collected: Decimal,
}

impl SalesBalance {
    pub fn from_sales(sales: &[Sale]) -> Self {
        let mut balance = SalesBalance::default();
        for sale in sales {
            balance.sale_count += 1;
            balance.total += sale.total;
            *balance
                .by_payment_method
                .entry(sale.payment_method)
                .or_insert(Decimal::ZERO) += sale.total;
            balance.outstanding += owed(sale);
        }
        balance.collected = balance.total - balance.outstanding;
        balance
    }

    /// Balance over sales whose date falls within `[from, to]`.
    pub fn for_period(sales: &[Sale], from: NaiveDate, to: NaiveDate) -> Self {
        let in_range: Vec<Sale> = sales
            .iter()
            .filter(|s| {
                let day = s.created_at.date_naive();
                day >= from && day <= to
            })
            .cloned()
            .collect();
        Self::from_sales(&in_range)
    }

    pub fn method_total(&self, method: PaymentMethod) -> Decimal {
        self.by_payment_method
            .get(&method)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

fn owed(sale: &Sale) -> Decimal {
    if sale.payment_method == PaymentMethod::Credit && sale.remaining_balance.is_none() {
        return sale.total;
    }
    if sale.fully_paid && sale.payment_method != PaymentMethod::Credit {
        return Decimal::ZERO;
    }
    sale.remaining_balance.unwrap_or(Decimal::ZERO)
}
