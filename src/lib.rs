//! Reparto SDK for Rust.
//!
//! Client library for a beverage delivery business. Clients, products,
//! sales and movement history live behind a remote HTTP API; this crate
//! provides typed access to it together with the local logic delivery
//! screens need: route assembly against a routing service, debt and
//! container-loan ledgers, and sale construction.
//!
//! # Quick start
//!
//! ```no_run
//! use reparto_sdk::RepartoSdk;
//!
//! let sdk = RepartoSdk::builder()
//!     .base_url("https://api.example.com")
//!     .deliverer_id("rep-7")
//!     .build()
//!     .unwrap();
//!
//! // List clients
//! let clients = sdk.clients().list().unwrap();
//!
//! // Plan today's route and fetch its street geometry
//! let mut route = sdk.plan_route().unwrap();
//! sdk.refresh_route(&mut route);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod ledger;
pub mod models;
pub mod report;
pub mod route;
pub mod sale;
pub mod session;

#[cfg(feature = "async")]
pub use async_client::AsyncRepartoSdk;
pub use error::{RepartoError, Result};
pub use http::ApiClient;
pub use ledger::{ContainerLedger, DebtLedger};
pub use route::{Coordinate, RoutePlanner, RouteState};
pub use sale::{Catalog, SaleBuilder};
pub use session::{DelivererIdProvider, SessionFile, StaticDeliverer};

use std::env;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use route::{Completion, OsrmProvider, RoutePoint};
use session::NoDeliverer;

// ---------------------------------------------------------------------------
// RepartoSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`RepartoSdk`] instance.
///
/// Use [`RepartoSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](RepartoSdkBuilder::build) to create the SDK.
#[derive(Clone)]
pub struct RepartoSdkBuilder {
    base_url: Option<String>,
    routing_url: String,
    depot: Coordinate,
    timeout: Duration,
    deliverer: Arc<dyn DelivererIdProvider>,
}

impl Default for RepartoSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            routing_url: config::ROUTING_BASE.to_string(),
            depot: config::DEPOT,
            timeout: Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
            deliverer: Arc::new(NoDeliverer),
        }
    }
}

impl RepartoSdkBuilder {
    /// Start from the environment.
    ///
    /// Loads a `.env` file if present, then reads `REPARTO_API_URL`,
    /// `REPARTO_ROUTING_URL` and `REPARTO_DELIVERER_ID`. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let mut builder = Self::default();
        if let Ok(url) = env::var(config::API_URL_ENV) {
            builder = builder.base_url(url);
        }
        if let Ok(url) = env::var(config::ROUTING_URL_ENV) {
            builder = builder.routing_url(url);
        }
        if let Ok(id) = env::var(config::DELIVERER_ID_ENV) {
            if !id.trim().is_empty() {
                builder = builder.deliverer_id(id.trim());
            }
        }
        builder
    }

    /// Base URL of the business API. Required.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// OSRM-compatible routing service, pointing at the profile
    /// (defaults to the public OSRM driving profile).
    pub fn routing_url(mut self, url: impl Into<String>) -> Self {
        self.routing_url = url.into();
        self
    }

    /// Where routes start and end.
    pub fn depot(mut self, depot: Coordinate) -> Self {
        self.depot = depot;
        self
    }

    /// HTTP timeout for API and routing requests. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a fixed deliverer id for every operation.
    pub fn deliverer_id(self, id: impl Into<String>) -> Self {
        self.deliverer_provider(StaticDeliverer(id.into()))
    }

    /// Read the deliverer id from a session file on each operation.
    pub fn session_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.deliverer_provider(SessionFile::new(path))
    }

    /// Use any deliverer id source.
    pub fn deliverer_provider<P: DelivererIdProvider + 'static>(mut self, provider: P) -> Self {
        self.deliverer = Arc::new(provider);
        self
    }

    /// Build the SDK. Fails when no base URL was given or the depot is not
    /// a valid coordinate.
    pub fn build(self) -> Result<RepartoSdk> {
        let base_url = self.base_url.ok_or_else(|| {
            RepartoError::InvalidArgument(format!(
                "API base URL not configured (set it on the builder or via {})",
                config::API_URL_ENV
            ))
        })?;
        if !self.depot.is_valid() {
            return Err(RepartoError::InvalidArgument(format!(
                "invalid depot coordinate {:?}",
                self.depot
            )));
        }
        let api = ApiClient::new(&base_url, self.timeout, self.deliverer)?;
        let router = OsrmProvider::new(&self.routing_url, self.timeout)?;
        Ok(RepartoSdk {
            api,
            router,
            depot: self.depot,
        })
    }
}

// ---------------------------------------------------------------------------
// RepartoSdk
// ---------------------------------------------------------------------------

/// The main entry point for the Reparto SDK.
///
/// Owns the API client and the routing provider, and exposes one
/// lightweight borrowing wrapper per API resource.
pub struct RepartoSdk {
    api: ApiClient,
    router: OsrmProvider,
    depot: Coordinate,
}

impl RepartoSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> RepartoSdkBuilder {
        RepartoSdkBuilder::default()
    }

    // -- Endpoint accessors ------------------------------------------------

    /// Client directory: list, fetch, create, update and local search.
    pub fn clients(&self) -> endpoints::ClientEndpoint<'_> {
        endpoints::ClientEndpoint::new(&self.api)
    }

    pub fn products(&self) -> endpoints::ProductEndpoint<'_> {
        endpoints::ProductEndpoint::new(&self.api)
    }

    /// Quick-delivery operations: sales, credit sales, payments, missed visits.
    pub fn delivery(&self) -> endpoints::DeliveryEndpoint<'_> {
        endpoints::DeliveryEndpoint::new(&self.api)
    }

    pub fn movements(&self) -> endpoints::MovementEndpoint<'_> {
        endpoints::MovementEndpoint::new(&self.api)
    }

    /// Sales summaries, history and balance.
    pub fn reports(&self) -> endpoints::ReportEndpoint<'_> {
        endpoints::ReportEndpoint::new(&self.api)
    }

    // -- Routes ------------------------------------------------------------

    pub fn depot(&self) -> Coordinate {
        self.depot
    }

    pub fn router(&self) -> &OsrmProvider {
        &self.router
    }

    /// Route state over the given stops, starting and ending at the depot.
    pub fn route_state(&self, points: Vec<RoutePoint>) -> RouteState {
        RouteState::new(RoutePlanner::new(self.depot, points))
    }

    /// Route state over every geocoded client, in API order.
    pub fn plan_route(&self) -> Result<RouteState> {
        Ok(self.route_state(self.clients().geocoded()?))
    }

    /// Fetch street geometry for the current plan. Failures leave an empty path.
    pub fn refresh_route(&self, state: &mut RouteState) -> Completion {
        state.refresh(&self.router)
    }

    // -- Misc --------------------------------------------------------------

    /// Return a reference to the underlying [`ApiClient`] for advanced usage.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for RepartoSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RepartoSdk(base_url={}, deliverer={}, depot=({}, {}))",
            self.api.base_url(),
            self.api.deliverer_id().as_deref().unwrap_or("none"),
            self.depot.lat,
            self.depot.lon
        )
    }
}
