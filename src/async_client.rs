//! Async wrapper around [`RepartoSdk`] for use in async runtimes (Tokio, etc.).
//!
//! The SDK uses blocking HTTP clients, so every operation runs on the blocking
//! thread pool via [`tokio::task::spawn_blocking`], keeping the async event
//! loop free.
//!
//! # Example
//!
//! ```no_run
//! use reparto_sdk::AsyncRepartoSdk;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncRepartoSdk::builder()
//!         .base_url("https://api.example.com")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     // Run any sync SDK method via closure
//!     let clients = sdk.run(|s| s.clients().list()).await.unwrap();
//!
//!     // Route refreshes: start, fetch, complete. Stale answers are dropped.
//!     let mut route = sdk.run(|s| s.plan_route()).await.unwrap();
//!     if let Some(req) = route.begin_refresh() {
//!         let result = sdk.fetch_route(req.waypoints).await;
//!         route.complete(req.token, result);
//!     }
//! }
//! ```

use std::sync::Arc;

use crate::error::{RepartoError, Result};
use crate::route::{Coordinate, RouteGeometry, RouteProvider};
use crate::{RepartoSdk, RepartoSdkBuilder};

// ---------------------------------------------------------------------------
// AsyncRepartoSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for an [`AsyncRepartoSdk`]; accepts the same settings as
/// [`RepartoSdkBuilder`].
#[derive(Clone, Default)]
pub struct AsyncRepartoSdkBuilder {
    inner: RepartoSdkBuilder,
}

impl AsyncRepartoSdkBuilder {
    pub fn from_env() -> Self {
        Self {
            inner: RepartoSdkBuilder::from_env(),
        }
    }

    /// Adjust the underlying sync builder.
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(RepartoSdkBuilder) -> RepartoSdkBuilder,
    {
        self.inner = f(self.inner);
        self
    }

    pub fn base_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.configure(|b| b.base_url(url))
    }

    pub fn deliverer_id(self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.configure(|b| b.deliverer_id(id))
    }

    /// Build the async SDK.
    ///
    /// The blocking HTTP clients are created on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncRepartoSdk> {
        let inner = self.inner;
        tokio::task::spawn_blocking(move || {
            let sdk = inner.build()?;
            Ok(AsyncRepartoSdk {
                inner: Some(Arc::new(sdk)),
            })
        })
        .await
        .map_err(|e| RepartoError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncRepartoSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`RepartoSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`].
pub struct AsyncRepartoSdk {
    // Only `None` while dropping.
    inner: Option<Arc<RepartoSdk>>,
}

impl AsyncRepartoSdk {
    pub fn builder() -> AsyncRepartoSdkBuilder {
        AsyncRepartoSdkBuilder::default()
    }

    fn sdk(&self) -> Result<Arc<RepartoSdk>> {
        self.inner
            .clone()
            .ok_or_else(|| RepartoError::InvalidArgument("SDK is closed".into()))
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&RepartoSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.sdk()?;
        tokio::task::spawn_blocking(move || f(&sdk))
            .await
            .map_err(|e| RepartoError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Fetch street geometry for `waypoints` from the configured router.
    ///
    /// Hand the result to [`RouteState::complete`](crate::route::RouteState::complete)
    /// with the request's token; concurrent refreshes then resolve in favour of
    /// the newest request regardless of arrival order.
    pub async fn fetch_route(&self, waypoints: Vec<Coordinate>) -> Result<RouteGeometry> {
        self.run(move |s| s.router().fetch_route(&waypoints)).await
    }

    /// Release the SDK, dropping the blocking clients off the async thread.
    pub async fn close(mut self) -> Result<()> {
        if let Some(sdk) = self.inner.take() {
            tokio::task::spawn_blocking(move || drop(sdk))
                .await
                .map_err(|e| RepartoError::InvalidArgument(format!("Task join error: {e}")))?;
        }
        Ok(())
    }
}

impl Drop for AsyncRepartoSdk {
    fn drop(&mut self) {
        // Blocking HTTP clients must not be dropped on a runtime thread.
        if let Some(sdk) = self.inner.take() {
            if tokio::runtime::Handle::try_current().is_ok() {
                tokio::task::spawn_blocking(move || drop(sdk));
            }
        }
    }
}
