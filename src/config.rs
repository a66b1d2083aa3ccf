use std::path::PathBuf;

use crate::route::Coordinate;

/// Public OSRM demo server, driving profile.
pub const ROUTING_BASE: &str = "https://router.project-osrm.org/route/v1/driving";

pub const API_URL_ENV: &str = "REPARTO_API_URL";
pub const ROUTING_URL_ENV: &str = "REPARTO_ROUTING_URL";
pub const DELIVERER_ID_ENV: &str = "REPARTO_DELIVERER_ID";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Warehouse every delivery route starts from and returns to.
pub const DEPOT: Coordinate = Coordinate {
    lat: -34.6037,
    lon: -58.3816,
};

// Remote API paths, relative to the configured base URL.
pub const CLIENTS_PATH: &str = "clientes";
pub const PRODUCTS_PATH: &str = "productos";
pub const MOVEMENTS_PATH: &str = "movimientos/cliente";
pub const SALES_PATH: &str = "ventas";
pub const SALES_SUMMARY_PATH: &str = "ventas/resumen";
pub const QUICK_SALE_PATH: &str = "repartidor-rapido/venta";
pub const QUICK_PAYMENT_PATH: &str = "repartidor-rapido/pago";
pub const QUICK_CREDIT_PATH: &str = "repartidor-rapido/fiado";
pub const QUICK_NOT_FOUND_PATH: &str = "repartidor-rapido/no-encontrado";

pub fn default_session_file() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("reparto-sdk").join("session")
    } else {
        PathBuf::from(".reparto-sdk-session")
    }
}
