//! Endpoint integration tests against a local one-shot HTTP responder.

mod common;

use chrono::NaiveDate;
use reparto_sdk::models::{ClientUpdate, MovementKind, NewClient, PaymentMethod};
use reparto_sdk::{Catalog, RepartoError, RepartoSdk, SaleBuilder};
use rust_decimal::Decimal;

fn sdk(base_url: &str) -> RepartoSdk {
    RepartoSdk::builder()
        .base_url(base_url)
        .deliverer_id("rep-9")
        .build()
        .unwrap()
}

fn clients_json() -> String {
    serde_json::to_string(&common::sample_clients()).unwrap()
}

// ---------------------------------------------------------------------------
// builder
// ---------------------------------------------------------------------------

#[test]
fn build_without_base_url_fails() {
    let err = RepartoSdk::builder().build().err().unwrap();
    assert!(matches!(err, RepartoError::InvalidArgument(_)));
}

#[test]
fn build_rejects_invalid_depot() {
    let err = RepartoSdk::builder()
        .base_url("http://localhost:1")
        .depot(reparto_sdk::Coordinate::new(120.0, 0.0))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, RepartoError::InvalidArgument(_)));
}

#[test]
fn url_joins_paths_with_single_slash() {
    let sdk = sdk("http://api.local/v1/");
    assert_eq!(sdk.api().url("/clientes"), "http://api.local/v1/clientes");
    assert_eq!(sdk.api().url("productos"), "http://api.local/v1/productos");
}

#[test]
fn sdk_can_be_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RepartoSdk>();
}

#[test]
fn display_shows_base_url_and_deliverer() {
    let sdk = sdk("http://api.local");
    let text = sdk.to_string();
    assert!(text.contains("base_url=http://api.local"));
    assert!(text.contains("deliverer=rep-9"));
}

// ---------------------------------------------------------------------------
// clients
// ---------------------------------------------------------------------------

#[test]
fn list_clients_bare_array() {
    let (url, server) = common::serve_once(200, &clients_json());
    let clients = sdk(&url).clients().list().unwrap();
    let request = server.join().unwrap();

    assert_eq!(common::request_line(&request), "GET /clientes HTTP/1.1");
    assert_eq!(clients.len(), 3);
    assert_eq!(clients[0].name, "Almacén Don José");
}

#[test]
fn list_clients_wrapped_in_data() {
    let body = format!("{{\"data\": {}}}", clients_json());
    let (url, server) = common::serve_once(200, &body);
    let clients = sdk(&url).clients().list().unwrap();
    server.join().unwrap();
    assert_eq!(clients.len(), 3);
}

#[test]
fn search_filters_fetched_clients() {
    let (url, server) = common::serve_once(200, &clients_json());
    let params = reparto_sdk::endpoints::SearchClientsParams {
        zone: Some("sur".into()),
        ..Default::default()
    };
    let found = sdk(&url).clients().search(&params).unwrap();
    server.join().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "c2");
}

#[test]
fn geocoded_returns_route_points() {
    let (url, server) = common::serve_once(200, &clients_json());
    let points = sdk(&url).clients().geocoded().unwrap();
    server.join().unwrap();
    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|p| !p.excluded));
}

#[test]
fn get_missing_client_is_not_found() {
    let (url, server) = common::serve_once(404, r#"{"message": "Cliente no encontrado"}"#);
    let err = sdk(&url).clients().get("c404").unwrap_err();
    let request = server.join().unwrap();

    assert_eq!(common::request_line(&request), "GET /clientes/c404 HTTP/1.1");
    assert!(matches!(err, RepartoError::NotFound(_)));
}

#[test]
fn server_error_carries_message() {
    let (url, server) = common::serve_once(500, r#"{"error": "db down"}"#);
    let err = sdk(&url).clients().list().unwrap_err();
    server.join().unwrap();
    match err {
        RepartoError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "db down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn create_client_posts_camel_case_body() {
    let created = serde_json::json!({"id": "c9", "name": "Nuevo", "zone": "Oeste"});
    let (url, server) = common::serve_once(201, &created.to_string());
    let client = sdk(&url)
        .clients()
        .create(&NewClient {
            name: "Nuevo".into(),
            zone: Some("Oeste".into()),
            deliverer_id: Some("rep-9".into()),
            ..Default::default()
        })
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(common::request_line(&request), "POST /clientes HTTP/1.1");
    let body = common::request_json(&request);
    assert_eq!(body["name"], "Nuevo");
    assert_eq!(body["delivererId"], "rep-9");
    assert_eq!(client.id, "c9");
    assert_eq!(client.purchase_count, 0);
}

#[test]
fn create_client_requires_name() {
    let sdk = sdk("http://127.0.0.1:9");
    let err = sdk.clients().create(&NewClient::default()).unwrap_err();
    assert!(matches!(err, RepartoError::Validation(_)));
}

#[test]
fn update_client_sends_only_set_fields() {
    let updated = serde_json::json!({"data": {"id": "c1", "name": "Almacén Don José", "phone": "11-0000-0000"}});
    let (url, server) = common::serve_once(200, &updated.to_string());
    let client = sdk(&url)
        .clients()
        .update(
            "c1",
            &ClientUpdate {
                phone: Some("11-0000-0000".into()),
                ..Default::default()
            },
        )
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(common::request_line(&request), "PUT /clientes/c1 HTTP/1.1");
    let body = common::request_json(&request);
    assert_eq!(body, serde_json::json!({"phone": "11-0000-0000"}));
    assert_eq!(client.phone.as_deref(), Some("11-0000-0000"));
}

// ---------------------------------------------------------------------------
// products
// ---------------------------------------------------------------------------

#[test]
fn catalog_from_products_endpoint() {
    let body = serde_json::to_string(&common::sample_products()).unwrap();
    let (url, server) = common::serve_once(200, &body);
    let catalog = sdk(&url).products().catalog().unwrap();
    server.join().unwrap();
    assert_eq!(catalog.len(), 3);
}

// ---------------------------------------------------------------------------
// delivery
// ---------------------------------------------------------------------------

fn sale_payload(method: PaymentMethod) -> reparto_sdk::models::SalePayload {
    let catalog = Catalog::new(common::sample_products());
    let mut sale = SaleBuilder::new("c1", &catalog);
    sale.set_quantity("p1", 2).unwrap();
    sale.set_quantity("p2", 1).unwrap();
    sale.payment_method(method);
    sale.build(None).unwrap()
}

#[test]
fn register_sale_stamps_session_deliverer() {
    let (url, server) = common::serve_once(200, r#"{"id": "v1", "message": "ok"}"#);
    let receipt = sdk(&url)
        .delivery()
        .register_sale(&sale_payload(PaymentMethod::Cash))
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(common::request_line(&request), "POST /repartidor-rapido/venta HTTP/1.1");
    let body = common::request_json(&request);
    assert_eq!(body["delivererId"], "rep-9");
    assert_eq!(body["total"].as_f64(), Some(2000.0));
    assert_eq!(receipt.id.as_deref(), Some("v1"));
}

#[test]
fn numeric_receipt_id_is_accepted() {
    let (url, server) = common::serve_once(201, r#"{"id": 17, "message": "venta registrada"}"#);
    let receipt = sdk(&url)
        .delivery()
        .register_sale(&sale_payload(PaymentMethod::Cash))
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(common::request_line(&request), "POST /repartidor-rapido/venta HTTP/1.1");
    assert_eq!(receipt.id.as_deref(), Some("17"));
    assert_eq!(receipt.message.as_deref(), Some("venta registrada"));
}

#[test]
fn receipt_tolerates_null_or_missing_id() {
    let r: reparto_sdk::models::Receipt = serde_json::from_str(r#"{"id": null}"#).unwrap();
    assert!(r.id.is_none());
    let r: reparto_sdk::models::Receipt = serde_json::from_str(r#"{"message": "ok"}"#).unwrap();
    assert!(r.id.is_none());
}

#[test]
fn credit_sale_goes_to_credit_endpoint() {
    let (url, server) = common::serve_once(200, "{}");
    sdk(&url)
        .delivery()
        .register_sale(&sale_payload(PaymentMethod::Credit))
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(common::request_line(&request), "POST /repartidor-rapido/fiado HTTP/1.1");
    let body = common::request_json(&request);
    assert_eq!(body["paymentMethod"], "credit");
    assert_eq!(body["fullyPaid"], false);
    assert_eq!(body["remainingBalance"].as_f64(), Some(2000.0));
}

#[test]
fn tampered_total_is_rejected_before_sending() {
    let sdk = sdk("http://127.0.0.1:9");
    let mut payload = sale_payload(PaymentMethod::Cash);
    payload.total = Decimal::from(1);
    let err = sdk.delivery().register_sale(&payload).unwrap_err();
    assert!(matches!(err, RepartoError::Validation(_)));
}

#[test]
fn payment_requires_logged_in_deliverer() {
    let sdk = RepartoSdk::builder()
        .base_url("http://127.0.0.1:9")
        .build()
        .unwrap();
    let err = sdk
        .delivery()
        .register_payment("c1", Decimal::from(500), PaymentMethod::Cash, None)
        .unwrap_err();
    assert!(matches!(err, RepartoError::InvalidArgument(_)));
}

#[test]
fn payment_must_be_positive() {
    let sdk = sdk("http://127.0.0.1:9");
    let err = sdk
        .delivery()
        .register_payment("c1", Decimal::ZERO, PaymentMethod::Cash, None)
        .unwrap_err();
    assert!(matches!(err, RepartoError::Validation(_)));
}

#[test]
fn register_payment_posts_amount() {
    let (url, server) = common::serve_once(200, "{}");
    sdk(&url)
        .delivery()
        .register_payment("c1", Decimal::from(750), PaymentMethod::Transfer, Some("a cuenta".into()))
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(common::request_line(&request), "POST /repartidor-rapido/pago HTTP/1.1");
    let body = common::request_json(&request);
    assert_eq!(body["amount"].as_f64(), Some(750.0));
    assert_eq!(body["paymentMethod"], "transfer");
    assert_eq!(body["note"], "a cuenta");
}

#[test]
fn not_found_visit_accepts_empty_response() {
    let (url, server) = common::serve_once(204, "");
    let receipt = sdk(&url)
        .delivery()
        .register_not_found("c2", None)
        .unwrap();
    let request = server.join().unwrap();

    assert_eq!(
        common::request_line(&request),
        "POST /repartidor-rapido/no-encontrado HTTP/1.1"
    );
    assert!(receipt.id.is_none());
}

// ---------------------------------------------------------------------------
// movements and reports
// ---------------------------------------------------------------------------

#[test]
fn movements_sorted_newest_first() {
    let body = serde_json::json!([
        {"id": "m1", "clientId": "c1", "type": "sale", "date": "2024-05-01T10:00:00Z", "amount": 800},
        {"id": "m2", "clientId": "c1", "type": "container_loan", "date": "2024-05-03T10:00:00Z",
         "containerType": "jug_20l", "quantity": 2},
        {"id": "m3", "clientId": "c1", "type": "payment", "date": "2024-05-02T10:00:00Z", "amount": 500}
    ]);
    let (url, server) = common::serve_once(200, &body.to_string());
    let movements = sdk(&url).movements().by_client("c1").unwrap();
    let request = server.join().unwrap();

    assert_eq!(common::request_line(&request), "GET /movimientos/cliente/c1 HTTP/1.1");
    let ids: Vec<&str> = movements.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["m2", "m3", "m1"]);
    assert_eq!(movements[0].kind, MovementKind::ContainerLoan);
}

#[test]
fn sales_summary_sends_date_range() {
    let body = serde_json::json!({
        "from": "2024-05-01",
        "to": "2024-05-31",
        "totalSales": 5300,
        "saleCount": 4,
        "byPaymentMethod": {"cash": 2800, "credit": 1500},
        "creditOutstanding": 1500
    });
    let (url, server) = common::serve_once(200, &body.to_string());
    let from = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();
    let summary = sdk(&url).reports().sales_summary(from, to).unwrap();
    let request = server.join().unwrap();

    assert_eq!(
        common::request_line(&request),
        "GET /ventas/resumen?desde=2024-05-01&hasta=2024-05-31 HTTP/1.1"
    );
    assert_eq!(summary.sale_count, 4);
    assert_eq!(summary.by_payment_method[&PaymentMethod::Cash], Decimal::from(2800));
}

#[test]
fn reversed_date_range_is_rejected() {
    let sdk = sdk("http://127.0.0.1:9");
    let from = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    assert!(matches!(
        sdk.reports().sales_history(from, to),
        Err(RepartoError::InvalidArgument(_))
    ));
}
