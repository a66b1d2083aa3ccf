//! Client directory: CRUD against the API plus local search and paging.

use crate::config;
use crate::endpoints::{ItemBody, ListBody};
use crate::error::{RepartoError, Result};
use crate::http::ApiClient;
use crate::models::{Client, ClientType, ClientUpdate, DeliveryDay, NewClient};
use crate::route::RoutePoint;

// ---------------------------------------------------------------------------
// SearchClientsParams
// ---------------------------------------------------------------------------

/// Filters applied locally to the fetched client list.
#[derive(Debug, Clone, Default)]
pub struct SearchClientsParams {
    /// Case-insensitive substring of the name, phone or address.
    pub text: Option<String>,
    pub zone: Option<String>,
    pub deliverer_id: Option<String>,
    pub delivery_day: Option<DeliveryDay>,
    pub client_type: Option<ClientType>,
    /// Only clients with pending debts.
    pub with_debt: bool,
    /// Only clients holding loaned containers.
    pub with_containers: bool,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Apply `params` to `clients`, keeping their order.
pub fn filter_clients(clients: Vec<Client>, params: &SearchClientsParams) -> Vec<Client> {
    let text = params.text.as_ref().map(|t| t.trim().to_lowercase());
    let text = text.filter(|t| !t.is_empty());

    let filtered = clients.into_iter().filter(|c| {
        if let Some(t) = &text {
            let hit = [Some(&c.name), c.phone.as_ref(), c.address.as_ref()]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(t.as_str()));
            if !hit {
                return false;
            }
        }
        if let Some(zone) = &params.zone {
            let matches = c
                .zone
                .as_deref()
                .map(|z| z.eq_ignore_ascii_case(zone))
                .unwrap_or(false);
            if !matches {
                return false;
            }
        }
        if let Some(d) = &params.deliverer_id {
            if c.deliverer_id.as_deref() != Some(d.as_str()) {
                return false;
            }
        }
        if params.delivery_day.is_some() && c.delivery_day != params.delivery_day {
            return false;
        }
        if let Some(kind) = params.client_type {
            if c.client_type != kind {
                return false;
            }
        }
        if params.with_debt && c.pending_debts == 0 {
            return false;
        }
        if params.with_containers && c.loaned_containers == 0 {
            return false;
        }
        true
    });

    filtered
        .skip(params.offset.unwrap_or(0))
        .take(params.limit.unwrap_or(usize::MAX))
        .collect()
}

// ---------------------------------------------------------------------------
// ClientEndpoint
// ---------------------------------------------------------------------------

pub struct ClientEndpoint<'a> {
    api: &'a ApiClient,
}

impl<'a> ClientEndpoint<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub fn list(&self) -> Result<Vec<Client>> {
        let body: ListBody<Client> = self.api.get(config::CLIENTS_PATH)?;
        Ok(body.into_vec())
    }

    pub fn get(&self, id: &str) -> Result<Client> {
        let path = format!("{}/{}", config::CLIENTS_PATH, id);
        match self.api.get::<ItemBody<Client>>(&path) {
            Ok(body) => Ok(body.into_inner()),
            Err(RepartoError::Api { status: 404, .. }) => {
                Err(RepartoError::NotFound(format!("client {}", id)))
            }
            Err(e) => Err(e),
        }
    }

    pub fn create(&self, client: &NewClient) -> Result<Client> {
        if client.name.trim().is_empty() {
            return Err(RepartoError::Validation("client name is required".into()));
        }
        let body: ItemBody<Client> = self.api.post(config::CLIENTS_PATH, client)?;
        Ok(body.into_inner())
    }

    pub fn update(&self, id: &str, update: &ClientUpdate) -> Result<Client> {
        if matches!(&update.name, Some(n) if n.trim().is_empty()) {
            return Err(RepartoError::Validation("client name must not be blank".into()));
        }
        let path = format!("{}/{}", config::CLIENTS_PATH, id);
        let body: ItemBody<Client> = self.api.put(&path, update)?;
        Ok(body.into_inner())
    }

    /// Fetch all clients and filter them locally.
    pub fn search(&self, params: &SearchClientsParams) -> Result<Vec<Client>> {
        Ok(filter_clients(self.list()?, params))
    }

    /// Map stops for every geocoded client.
    pub fn geocoded(&self) -> Result<Vec<RoutePoint>> {
        Ok(self
            .list()?
            .iter()
            .filter_map(RoutePoint::from_client)
            .collect())
    }
}
