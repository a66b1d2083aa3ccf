//! Street-following route geometry from an external routing service.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::Coordinate;
use crate::config;
use crate::error::{RepartoError, Result};

/// Detailed path between consecutive waypoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteGeometry {
    pub path: Vec<Coordinate>,
    /// Metres, when the provider reports it.
    pub distance: Option<f64>,
    /// Seconds, when the provider reports it.
    pub duration: Option<f64>,
}

/// Anything that can turn ordered waypoints into a road-following path.
pub trait RouteProvider {
    fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<RouteGeometry>;
}

impl<P: RouteProvider + ?Sized> RouteProvider for &P {
    fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<RouteGeometry> {
        (**self).fetch_route(waypoints)
    }
}

// ---------------------------------------------------------------------------
// OsrmProvider
// ---------------------------------------------------------------------------

/// Client for an OSRM-compatible `route` service.
#[derive(Debug, Clone)]
pub struct OsrmProvider {
    base_url: String,
    client: Client,
}

impl OsrmProvider {
    /// `base_url` points at the profile, e.g. `.../route/v1/driving`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Provider for the public OSRM demo server.
    pub fn public(timeout: Duration) -> Result<Self> {
        Self::new(config::ROUTING_BASE, timeout)
    }

    /// Request URL for the given waypoints (`lon,lat` pairs joined by `;`).
    pub fn route_url(&self, waypoints: &[Coordinate]) -> String {
        let coords = waypoints
            .iter()
            .map(|c| format!("{},{}", c.lon, c.lat))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{}/{}?overview=full&geometries=geojson",
            self.base_url, coords
        )
    }
}

impl RouteProvider for OsrmProvider {
    fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<RouteGeometry> {
        if waypoints.len() < 2 {
            return Err(RepartoError::InvalidArgument(
                "a route needs at least two waypoints".into(),
            ));
        }
        let url = self.route_url(waypoints);
        tracing::debug!(%url, waypoints = waypoints.len(), "requesting route");
        let resp = self.client.get(&url).send()?;
        let status = resp.status();
        if !status.is_success() {
            // OSRM reports rejected queries as 4xx with a JSON `code`.
            let body: Value = resp.json().unwrap_or(Value::Null);
            let code = body.get("code").and_then(|v| v.as_str()).unwrap_or("unknown");
            return Err(RepartoError::Routing(format!(
                "routing service answered {} with code {:?}",
                status, code
            )));
        }
        let body: Value = resp.json()?;
        parse_route_response(&body)
    }
}

/// Extract the first route's geometry from an OSRM response.
///
/// Only a response with `code == "Ok"` and at least one route is accepted.
/// GeoJSON positions are `[lon, lat]`.
pub fn parse_route_response(body: &Value) -> Result<RouteGeometry> {
    let code = body.get("code").and_then(|v| v.as_str()).unwrap_or("");
    if code != "Ok" {
        let message = body
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("no message");
        return Err(RepartoError::Routing(format!(
            "provider answered code {:?}: {}",
            code, message
        )));
    }

    let route = body
        .get("routes")
        .and_then(|v| v.as_array())
        .and_then(|routes| routes.first())
        .ok_or_else(|| RepartoError::Routing("provider returned no routes".into()))?;

    let positions = route
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(|c| c.as_array())
        .ok_or_else(|| RepartoError::Routing("route has no geometry coordinates".into()))?;

    let mut path = Vec::with_capacity(positions.len());
    for pos in positions {
        let pair = pos.as_array().filter(|p| p.len() >= 2);
        let (lon, lat) = match pair.map(|p| (p[0].as_f64(), p[1].as_f64())) {
            Some((Some(lon), Some(lat))) => (lon, lat),
            _ => {
                return Err(RepartoError::Routing(format!(
                    "malformed position {}",
                    pos
                )))
            }
        };
        path.push(Coordinate { lat, lon });
    }

    Ok(RouteGeometry {
        path,
        distance: route.get("distance").and_then(|v| v.as_f64()),
        duration: route.get("duration").and_then(|v| v.as_f64()),
    })
}
