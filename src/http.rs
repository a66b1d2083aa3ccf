//! Blocking JSON client for the remote business API.
//!
//! Every endpoint module goes through [`ApiClient`], which joins paths onto the
//! configured base URL, encodes bodies as JSON, and turns non-2xx responses into
//! [`RepartoError::Api`] carrying the server's message when it sends one.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{RepartoError, Result};
use crate::session::DelivererIdProvider;

/// HTTP access to the business API, configured explicitly at construction.
pub struct ApiClient {
    base_url: String,
    client: Client,
    deliverer: Arc<dyn DelivererIdProvider>,
}

impl ApiClient {
    /// Create a client for `base_url` (with or without a trailing slash).
    pub fn new(
        base_url: &str,
        timeout: Duration,
        deliverer: Arc<dyn DelivererIdProvider>,
    ) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RepartoError::InvalidArgument(
                "API base URL must not be empty".into(),
            ));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            client,
            deliverer,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// The deliverer id of the current session, if any.
    pub fn deliverer_id(&self) -> Option<String> {
        self.deliverer.deliverer_id()
    }

    /// Like [`deliverer_id`](Self::deliverer_id) but an error when nobody is
    /// logged in.
    pub fn require_deliverer_id(&self) -> Result<String> {
        self.deliverer_id().ok_or_else(|| {
            RepartoError::InvalidArgument("no deliverer is logged in".into())
        })
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        self.send(self.client.get(&url))
    }

    pub fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        self.send(self.client.get(&url).query(query))
    }

    pub fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        self.send(self.client.post(&url).json(body))
    }

    pub fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(%url, "PUT");
        self.send(self.client.put(&url).json(body))
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request.send()?;
        let resp = check_status(resp)?;
        let bytes = resp.bytes()?;
        // Some write endpoints answer 2xx with an empty body.
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::warn!(status = status.as_u16(), %message, "API request failed");
    Err(RepartoError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ..}`, `{"error": ..}` or a plain-text body.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => value
            .get("message")
            .or_else(|| value.get("error"))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        Err(_) => Some(trimmed.to_string()),
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
