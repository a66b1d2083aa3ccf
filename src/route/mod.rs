//! Delivery route assembly.
//!
//! A route starts at the depot, visits every client that is not excluded in
//! the order the caller gave, and returns to the depot. The street-following
//! geometry between those waypoints comes from a [`RouteProvider`]; the
//! [`RouteState`] keeps the rendered path in sync with the latest request.

pub mod provider;
pub mod state;

pub use provider::{parse_route_response, OsrmProvider, RouteGeometry, RouteProvider};
pub use state::{Completion, RequestToken, RouteRequest, RouteState};

use serde::{Deserialize, Serialize};

use crate::error::{RepartoError, Result};
use crate::models::Client;

const EARTH_RADIUS_KM: f64 = 6371.0;

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Great-circle distance in kilometres.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

// ---------------------------------------------------------------------------
// RoutePoint
// ---------------------------------------------------------------------------

/// A client stop on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePoint {
    pub client_id: String,
    pub name: String,
    pub coordinate: Coordinate,
    #[serde(default)]
    pub excluded: bool,
}

impl RoutePoint {
    pub fn new(client_id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            client_id: client_id.into(),
            name: name.into(),
            coordinate,
            excluded: false,
        }
    }

    /// Stop for a client, or `None` when the client is not geocoded.
    ///
    /// A client with an out-of-range coordinate starts excluded so it cannot
    /// block the rest of the route.
    pub fn from_client(client: &Client) -> Option<Self> {
        let coordinate = client.coordinate()?;
        let mut point = Self::new(client.id.clone(), client.name.clone(), coordinate);
        if !coordinate.is_valid() {
            tracing::warn!(client = %client.id, ?coordinate, "invalid client coordinate, excluding");
            point.excluded = true;
        }
        Some(point)
    }
}

// ---------------------------------------------------------------------------
// RoutePlanner
// ---------------------------------------------------------------------------

/// Ordered stops plus the exclusion flags and the "show route" toggle.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    depot: Coordinate,
    points: Vec<RoutePoint>,
    show_route: bool,
}

impl RoutePlanner {
    /// Plan over `points` in the given order. The route is shown by default.
    pub fn new(depot: Coordinate, points: Vec<RoutePoint>) -> Self {
        Self {
            depot,
            points,
            show_route: true,
        }
    }

    /// Plan over the geocoded subset of `clients`, keeping their order.
    pub fn from_clients(depot: Coordinate, clients: &[Client]) -> Self {
        Self::new(depot, clients.iter().filter_map(RoutePoint::from_client).collect())
    }

    pub fn depot(&self) -> Coordinate {
        self.depot
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn included(&self) -> impl Iterator<Item = &RoutePoint> {
        self.points.iter().filter(|p| !p.excluded)
    }

    pub fn show_route(&self) -> bool {
        self.show_route
    }

    pub fn set_show_route(&mut self, show: bool) {
        self.show_route = show;
    }

    /// Flip a client's exclusion flag and return the new value.
    pub fn toggle(&mut self, client_id: &str) -> Result<bool> {
        let point = self.point_mut(client_id)?;
        point.excluded = !point.excluded;
        Ok(point.excluded)
    }

    pub fn set_excluded(&mut self, client_id: &str, excluded: bool) -> Result<()> {
        self.point_mut(client_id)?.excluded = excluded;
        Ok(())
    }

    pub fn include_all(&mut self) {
        for p in &mut self.points {
            p.excluded = false;
        }
    }

    /// Depot, included clients in order, depot.
    pub fn waypoints(&self) -> Vec<Coordinate> {
        let mut out = Vec::with_capacity(self.points.len() + 2);
        out.push(self.depot);
        out.extend(self.included().map(|p| p.coordinate));
        out.push(self.depot);
        out
    }

    /// Check the plan can be sent to a route provider.
    ///
    /// Excluded stops are never sent, so only included ones are checked.
    pub fn validate(&self) -> Result<()> {
        if !self.depot.is_valid() {
            return Err(RepartoError::Validation(format!(
                "invalid depot coordinate {:?}",
                self.depot
            )));
        }
        if let Some(bad) = self.included().find(|p| !p.coordinate.is_valid()) {
            return Err(RepartoError::Validation(format!(
                "invalid coordinate for client {}",
                bad.client_id
            )));
        }
        if self.included().next().is_none() {
            return Err(RepartoError::Validation(
                "route needs at least one included client".into(),
            ));
        }
        Ok(())
    }

    /// Reorder stops with [`nearest_neighbor_order`]. Never applied implicitly.
    pub fn optimize_nearest_neighbor(&mut self) {
        self.points = nearest_neighbor_order(self.depot, &self.points);
    }

    fn point_mut(&mut self, client_id: &str) -> Result<&mut RoutePoint> {
        self.points
            .iter_mut()
            .find(|p| p.client_id == client_id)
            .ok_or_else(|| RepartoError::NotFound(format!("client {} is not on the map", client_id)))
    }
}

/// Greedy ordering: from the depot, always visit the closest unvisited stop.
///
/// Ties keep the original relative order. Excluded stops are ordered too, so
/// re-including one later puts it back in a sensible place.
pub fn nearest_neighbor_order(depot: Coordinate, points: &[RoutePoint]) -> Vec<RoutePoint> {
    let mut remaining: Vec<&RoutePoint> = points.iter().collect();
    let mut ordered = Vec::with_capacity(points.len());
    let mut current = depot;
    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, p) in remaining.iter().enumerate() {
            let d = current.distance_km(&p.coordinate);
            if d < best_dist {
                best = i;
                best_dist = d;
            }
        }
        let next = remaining.remove(best);
        current = next.coordinate;
        ordered.push(next.clone());
    }
    ordered
}
