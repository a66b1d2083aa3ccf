use crate::config;
use crate::endpoints::ListBody;
use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Movement, MovementKind};

pub struct MovementEndpoint<'a> {
    api: &'a ApiClient,
}

impl<'a> MovementEndpoint<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Movement history of a client, newest first.
    pub fn by_client(&self, client_id: &str) -> Result<Vec<Movement>> {
        let path = format!("{}/{}", config::MOVEMENTS_PATH, client_id);
        let body: ListBody<Movement> = self.api.get(&path)?;
        let mut movements = body.into_vec();
        movements.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(movements)
    }

    /// History of a client restricted to one kind of movement.
    pub fn by_client_and_kind(&self, client_id: &str, kind: MovementKind) -> Result<Vec<Movement>> {
        Ok(self
            .by_client(client_id)?
            .into_iter()
            .filter(|m| m.kind == kind)
            .collect())
    }
}
