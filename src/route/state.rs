//! Rendered route state guarded against out-of-order responses.
//!
//! Every refresh takes a new [`RequestToken`]. A completion is applied only
//! when it carries the most recent token, so a slow response to an older
//! request can never replace the path of a newer one.

use super::{Coordinate, RouteGeometry, RoutePlanner, RouteProvider};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// A route fetch to perform: send `waypoints` to a provider, then hand the
/// result back with [`RouteState::complete`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub token: RequestToken,
    pub waypoints: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The path was replaced with the provider's geometry.
    Applied,
    /// The request failed, was rejected, or the route is hidden; the path is empty.
    Cleared,
    /// A newer request exists; nothing changed.
    Stale,
}

#[derive(Debug, Clone)]
pub struct RouteState {
    planner: RoutePlanner,
    geometry: RouteGeometry,
    latest: u64,
}

impl RouteState {
    pub fn new(planner: RoutePlanner) -> Self {
        Self {
            planner,
            geometry: RouteGeometry::default(),
            latest: 0,
        }
    }

    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    /// Rendered path; empty until a request completes successfully.
    pub fn path(&self) -> &[Coordinate] {
        &self.geometry.path
    }

    pub fn geometry(&self) -> &RouteGeometry {
        &self.geometry
    }

    /// Current waypoints, recomputed from the planner on every call.
    pub fn waypoints(&self) -> Vec<Coordinate> {
        self.planner.waypoints()
    }

    /// Toggle a client and start a refresh for the new plan.
    pub fn toggle(&mut self, client_id: &str) -> Result<Option<RouteRequest>> {
        self.planner.toggle(client_id)?;
        Ok(self.begin_refresh())
    }

    pub fn set_excluded(&mut self, client_id: &str, excluded: bool) -> Result<Option<RouteRequest>> {
        self.planner.set_excluded(client_id, excluded)?;
        Ok(self.begin_refresh())
    }

    pub fn set_show_route(&mut self, show: bool) -> Option<RouteRequest> {
        self.planner.set_show_route(show);
        self.begin_refresh()
    }

    /// Start a refresh.
    ///
    /// Any request still in flight becomes stale. Returns `None`, with the
    /// path cleared, when the route is hidden or the plan is not routable.
    pub fn begin_refresh(&mut self) -> Option<RouteRequest> {
        self.latest += 1;
        let token = RequestToken(self.latest);

        if !self.planner.show_route() {
            self.clear();
            return None;
        }
        if let Err(e) = self.planner.validate() {
            tracing::debug!(error = %e, "route not requested");
            self.clear();
            return None;
        }
        Some(RouteRequest {
            token,
            waypoints: self.planner.waypoints(),
        })
    }

    /// Apply the outcome of a request started with [`begin_refresh`](Self::begin_refresh).
    pub fn complete(&mut self, token: RequestToken, result: Result<RouteGeometry>) -> Completion {
        if token.0 != self.latest {
            tracing::debug!(token = token.0, latest = self.latest, "discarding stale route response");
            return Completion::Stale;
        }
        match result {
            Ok(geometry) if !geometry.path.is_empty() => {
                self.geometry = geometry;
                Completion::Applied
            }
            Ok(_) => {
                tracing::warn!("route provider returned an empty path");
                self.clear();
                Completion::Cleared
            }
            Err(e) => {
                tracing::warn!(error = %e, "route request failed");
                self.clear();
                Completion::Cleared
            }
        }
    }

    /// Start and finish a refresh in one blocking call.
    pub fn refresh<P: RouteProvider>(&mut self, provider: &P) -> Completion {
        match self.begin_refresh() {
            Some(req) => {
                let result = provider.fetch_route(&req.waypoints);
                self.complete(req.token, result)
            }
            None => Completion::Cleared,
        }
    }

    fn clear(&mut self) {
        self.geometry = RouteGeometry::default();
    }
}
