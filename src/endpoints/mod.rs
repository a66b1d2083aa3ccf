//! Endpoint modules for the remote business API.
//!
//! Each module provides a struct that borrows the [`ApiClient`](crate::http::ApiClient)
//! and exposes typed methods returning `Result<T>`.

pub mod clients;
pub mod delivery;
pub mod movements;
pub mod products;
pub mod reports;

pub use clients::{filter_clients, ClientEndpoint, SearchClientsParams};
pub use delivery::DeliveryEndpoint;
pub use movements::MovementEndpoint;
pub use products::ProductEndpoint;
pub use reports::ReportEndpoint;

use serde::Deserialize;

/// List bodies come either bare or wrapped as `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListBody<T> {
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListBody<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Wrapped { data } => data,
            ListBody::Bare(items) => items,
        }
    }
}

/// Single-object bodies, bare or wrapped as `{ "data": {...} }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ItemBody<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> ItemBody<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            ItemBody::Wrapped { data } => data,
            ItemBody::Bare(item) => item,
        }
    }
}
