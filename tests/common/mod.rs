//! Shared test fixtures for the Reparto SDK integration tests.
//!
//! Provides sample clients and products, a scripted [`RouteProvider`], and
//! `serve_once()`, a single-request HTTP responder bound to localhost for
//! exercising the blocking API client without a real server.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use reparto_sdk::models::{Client, Product};
use reparto_sdk::route::{Coordinate, RouteGeometry, RoutePoint, RouteProvider};
use reparto_sdk::{RepartoError, Result};
use rust_decimal::Decimal;

pub fn depot() -> Coordinate {
    Coordinate::new(-34.60, -58.38)
}

pub fn sample_points() -> Vec<RoutePoint> {
    vec![
        RoutePoint::new("c1", "Almacén Don José", Coordinate::new(-34.61, -58.39)),
        RoutePoint::new("c2", "Kiosco Lupe", Coordinate::new(-34.62, -58.40)),
        RoutePoint::new("c3", "Bar El Puerto", Coordinate::new(-34.63, -58.41)),
    ]
}

pub fn sample_clients() -> Vec<Client> {
    let rows = serde_json::json!([
        {
            "id": "c1",
            "name": "Almacén Don José",
            "phone": "11-5555-0101",
            "address": "Av. Siempre Viva 742",
            "zone": "Norte",
            "delivererId": "rep-1",
            "deliveryDay": "monday",
            "clientType": "regular",
            "latitude": -34.61,
            "longitude": -58.39,
            "purchaseCount": 12,
            "pendingDebts": 2,
            "loanedContainers": 3
        },
        {
            "id": "c2",
            "name": "Kiosco Lupe",
            "phone": "11-5555-0202",
            "address": "Calle Falsa 123",
            "zone": "Sur",
            "delivererId": "rep-2",
            "deliveryDay": "tuesday",
            "clientType": "reseller",
            "latitude": -34.62,
            "longitude": -58.40
        },
        {
            "id": "c3",
            "name": "Bar El Puerto",
            "zone": "norte",
            "delivererId": "rep-1",
            "deliveryDay": "monday",
            "loanedContainers": 1
        }
    ]);
    serde_json::from_value(rows).unwrap()
}

pub fn sample_products() -> Vec<Product> {
    vec![
        product("p1", "Soda 2L", 800, true),
        product("p2", "Agua 1L", 400, true),
        product("p3", "Bidón 20L", 2500, true),
        product("p4", "Jugo discontinuado", 300, false),
    ]
}

pub fn product(id: &str, name: &str, price: i64, active: bool) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        price: Decimal::from(price),
        container_type: None,
        active,
    }
}

// ---------------------------------------------------------------------------
// Scripted route provider
// ---------------------------------------------------------------------------

/// Returns queued results in order and records the waypoints it was asked for.
pub struct ScriptedProvider {
    results: RefCell<Vec<Result<RouteGeometry>>>,
    pub calls: RefCell<Vec<Vec<Coordinate>>>,
}

impl ScriptedProvider {
    pub fn new(results: Vec<Result<RouteGeometry>>) -> Self {
        Self {
            results: RefCell::new(results),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Always answers with a path through the requested waypoints.
    pub fn echo() -> Self {
        Self::new(Vec::new())
    }
}

impl RouteProvider for ScriptedProvider {
    fn fetch_route(&self, waypoints: &[Coordinate]) -> Result<RouteGeometry> {
        self.calls.borrow_mut().push(waypoints.to_vec());
        let mut results = self.results.borrow_mut();
        if results.is_empty() {
            return Ok(geometry(waypoints.to_vec()));
        }
        results.remove(0)
    }
}

pub fn geometry(path: Vec<Coordinate>) -> RouteGeometry {
    RouteGeometry {
        path,
        distance: Some(1000.0),
        duration: Some(120.0),
    }
}

pub fn routing_failure() -> RepartoError {
    RepartoError::Routing("provider answered code \"NoRoute\"".into())
}

// ---------------------------------------------------------------------------
// One-shot HTTP responder
// ---------------------------------------------------------------------------

/// Serve exactly one HTTP request with `status` and a JSON `body`.
///
/// Returns the base URL to point the client at and a handle yielding the raw
/// request (head and body) once it has been answered.
pub fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        request
    });

    (format!("http://{}", addr), handle)
}

fn read_request(stream: &mut std::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let head_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// JSON body of a captured request.
pub fn request_json(request: &str) -> serde_json::Value {
    let body = request.split("\r\n\r\n").nth(1).unwrap_or("");
    serde_json::from_str(body).unwrap()
}

/// Request line of a captured request, e.g. `GET /clientes HTTP/1.1`.
pub fn request_line(request: &str) -> &str {
    request.lines().next().unwrap_or("")
}
