use chrono::NaiveDate;

use crate::config;
use crate::endpoints::{ItemBody, ListBody};
use crate::error::{RepartoError, Result};
use crate::http::ApiClient;
use crate::models::{Sale, SalesSummary};
use crate::report::SalesBalance;

pub struct ReportEndpoint<'a> {
    api: &'a ApiClient,
}

impl<'a> ReportEndpoint<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Server-computed summary for `[from, to]`.
    pub fn sales_summary(&self, from: NaiveDate, to: NaiveDate) -> Result<SalesSummary> {
        let query = range_query(from, to)?;
        let body: ItemBody<SalesSummary> = self.api.get_query(config::SALES_SUMMARY_PATH, &query)?;
        Ok(body.into_inner())
    }

    /// Sales history for `[from, to]`, newest first.
    pub fn sales_history(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Sale>> {
        let query = range_query(from, to)?;
        let body: ListBody<Sale> = self.api.get_query(config::SALES_PATH, &query)?;
        let mut sales = body.into_vec();
        sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sales)
    }

    /// Balance computed locally from the sales history.
    pub fn balance(&self, from: NaiveDate, to: NaiveDate) -> Result<SalesBalance> {
        Ok(SalesBalance::for_period(&self.sales_history(from, to)?, from, to))
    }
}

fn range_query(from: NaiveDate, to: NaiveDate) -> Result<[(&'static str, String); 2]> {
    if from > to {
        return Err(RepartoError::InvalidArgument(format!(
            "date range starts after it ends: {} > {}",
            from, to
        )));
    }
    Ok([
        ("desde", from.format("%Y-%m-%d").to_string()),
        ("hasta", to.format("%Y-%m-%d").to_string()),
    ])
}
