use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::route::Coordinate;

// ---------------------------------------------------------------------------
// Client — a delivery customer as returned by the API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    #[default]
    Regular,
    /// Buys in bulk for resale ("revendedor").
    Reseller,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub zone: Option<String>,
    pub deliverer_id: Option<String>,
    pub delivery_day: Option<DeliveryDay>,
    #[serde(default)]
    pub client_type: ClientType,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_purchase: Option<DateTime<Utc>>,
    #[serde(default)]
    pub purchase_count: u32,
    #[serde(default)]
    pub pending_debts: u32,
    #[serde(default)]
    pub loaned_containers: u32,
}

impl Client {
    /// Geographic position, when both coordinates are known.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate { lat, lon }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// NewClient / ClientUpdate — write payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub zone: Option<String>,
    pub deliverer_id: Option<String>,
    pub delivery_day: Option<DeliveryDay>,
    pub client_type: ClientType,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Partial update; `None` fields are left out of the request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliverer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_day: Option<DeliveryDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_type: Option<ClientType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}
