//! API Integration Tests
//!
//! Every test runs the real router against the in-memory fixture graph store.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    routing::get as get_route,
    Router,
};
use buyers_api::{create_router, serve, state::AppState, state::Snapshot, with_middleware};
use buyers_core::{AppConfig, ServerConfig};
use buyers_graph::{fixture::FixtureConnector, GraphRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Two buyers; only the second one made a transaction
fn fixture() -> FixtureConnector {
    FixtureConnector::new()
        .with_document(
            "buyers",
            json!({"buyers": [
                {"uid": "0x1", "buyer_id": "a1", "buyer_name": "Ann", "buyer_age": 20},
                {"uid": "0x2", "buyer_id": "b2", "buyer_name": "Bob", "buyer_age": 34}
            ]}),
        )
        .with_document(
            "buyers",
            json!({"buyers": [
                {"buyer_id": "b2", "buyer_name": "Bob", "buyer_age": 34, "ip": "1.2.3.4"}
            ]}),
        )
        .with_document(
            "purchasesHistory",
            json!({"purchasesHistory": [
                {"product": [{"product_id": "p1", "product_name": "Tea", "product_price": 3}]}
            ]}),
        )
        .with_document(
            "products",
            json!({"products": [
                {"uid": "0x10", "product_id": "p1", "product_name": "Tea", "product_price": 3},
                {"uid": "0x11", "product_id": "p2", "product_name": "Rice", "product_price": 7}
            ]}),
        )
        .with_document(
            "transactions",
            json!({"transactions": [{
                "uid": "0x20",
                "transaction_id": "#0001",
                "buyer": [{"buyer_id": "b2", "buyer_name": "Bob", "buyer_age": 34}],
                "product": [{"product_id": "p2", "product_name": "Rice", "product_price": 7}],
                "ip": "1.2.3.4",
                "device": "android"
            }]}),
        )
        .with_document(
            "getBuyerByIpAddress",
            json!({"getBuyerByIpAddress": [
                {"buyer_id": "b2", "buyer_name": "Bob", "buyer_age": 34},
                {"buyer_id": "c3", "buyer_name": "Cid", "buyer_age": 51}
            ]}),
        )
        .with_document(
            "productRecom",
            json!({"productRecom": [
                {"product": [{"product_name": "Rice", "product_price": 7}]}
            ]}),
        )
}

async fn create_app(connector: FixtureConnector) -> (Router, Arc<FixtureConnector>) {
    let connector = Arc::new(connector);
    let repository = GraphRepository::new(connector.clone());
    let snapshot = Snapshot::load(&repository).await.unwrap();
    let state = Arc::new(AppState::new(snapshot, repository));

    (create_router(state, &ServerConfig::default()), connector)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    (status, content_type, body)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

// =============================================================================
// Envelope Listings
// =============================================================================

#[tokio::test]
async fn test_list_buyers_envelopes() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/buyers").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([
            {"uid": "0x1", "buyer_id": "a1", "buyer_name": "Ann", "buyer_age": 20, "Ip": "", "elapsed": 10},
            {"uid": "0x2", "buyer_id": "b2", "buyer_name": "Bob", "buyer_age": 34, "Ip": "", "elapsed": 10}
        ])
    );
}

#[tokio::test]
async fn test_trailing_slash_is_accepted() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/buyers/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_real_buyers_only_ip_bearing_subset() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/realbuyers/").await;

    assert_eq!(status, StatusCode::OK);
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["buyer_id"], "b2");
    assert_eq!(list[0]["Ip"], "1.2.3.4");
    assert_eq!(list[0]["elapsed"], 10);
}

#[tokio::test]
async fn test_purchase_history_envelopes() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/realbuyers/purchaseHistory").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([{
            "product": [{"uid": "", "product_id": "p1", "product_name": "Tea", "product_price": 3}],
            "elapsed": 10
        }])
    );
}

#[tokio::test]
async fn test_products_keep_order() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/products").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["product_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[tokio::test]
async fn test_transactions_embed_edges() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/transactions").await;

    assert_eq!(status, StatusCode::OK);
    let tx = &json[0];
    assert_eq!(tx["transaction_id"], "#0001");
    assert_eq!(tx["buyer"][0]["buyer_id"], "b2");
    assert_eq!(tx["product"][0]["product_name"], "Rice");
    assert_eq!(tx["device"], "android");
    assert_eq!(tx["elapsed"], 10);
}

#[tokio::test]
async fn test_listings_do_not_query_the_store() {
    let (app, connector) = create_app(fixture()).await;
    let startup_queries = connector.executed().len();

    let (status, _) = get_json(app, "/products?page=2&limit=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(connector.executed().len(), startup_queries);
}

// =============================================================================
// Pass-through Lookups
// =============================================================================

#[tokio::test]
async fn test_buyers_by_ip_passes_document_through() {
    let (app, connector) = create_app(fixture()).await;

    let (status, content_type, body) = get(app, "/realbuyers/ip/b2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));

    let json: Value = serde_json::from_slice(&body).unwrap();
    let buyers = json["getBuyerByIpAddress"].as_array().unwrap();
    assert_eq!(buyers.len(), 2);
    assert!(buyers[0].get("elapsed").is_none());

    let last = connector.executed().pop().unwrap();
    assert_eq!(last.name, "getBuyerByIpAddress");
    assert_eq!(last.variables["$id1"], "1.2.3.4");
}

#[tokio::test]
async fn test_buyers_by_ip_unknown_buyer() {
    let (app, _) = create_app(fixture()).await;

    // a1 is a buyer but not a real buyer
    let (status, json) = get_json(app, "/realbuyers/ip/a1").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({"status": "Resource not found."}));
}

#[tokio::test]
async fn test_recommendations_use_age_as_decimal_string() {
    let (app, connector) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/realbuyers/recommendations/b2/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["productRecom"][0]["product"][0]["product_name"], "Rice");

    let last = connector.executed().pop().unwrap();
    assert_eq!(last.name, "productRecom");
    assert_eq!(last.variables["$id1"], "34");
}

#[tokio::test]
async fn test_recommendations_unknown_buyer() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/realbuyers/recommendations/nobody").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], "Resource not found.");
}

#[tokio::test]
async fn test_malformed_lookup_document_is_bad_gateway() {
    let connector = FixtureConnector::new()
        .with_document(
            "buyers",
            json!({"buyers": [{"buyer_id": "b2", "buyer_age": 34, "ip": "1.2.3.4"}]}),
        )
        .with_document("getBuyerByIpAddress", json!({"getBuyerByIpAddress": 5}));
    let (app, _) = create_app(connector).await;

    let (status, json) = get_json(app, "/realbuyers/ip/b2").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["status"], "Error querying graph store.");
    assert!(json["error"].is_string());
}

// =============================================================================
// Ambient Behaviour
// =============================================================================

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _) = create_app(fixture()).await;

    let (status, content_type, body) = get(app, "/customers").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"status": "Resource not found."}));
}

#[tokio::test]
async fn test_wrong_method_is_rejected_with_envelope() {
    let (app, _) = create_app(fixture()).await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/buyers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"status": "Method not allowed."}));
}

#[tokio::test]
async fn test_json_extension_on_listing() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/products.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["product_id"], "p1");
}

#[tokio::test]
async fn test_json_extension_is_not_part_of_buyer_id() {
    let (app, connector) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/realbuyers/ip/b2.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["getBuyerByIpAddress"].as_array().unwrap().len(), 2);

    let last = connector.executed().pop().unwrap();
    assert_eq!(last.variables["$id1"], "1.2.3.4");
}

async fn explode() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn test_handler_panic_becomes_internal_error() {
    let app = with_middleware(
        Router::new().route("/explode", get_route(explode)),
        &ServerConfig::default(),
    );

    let (status, content_type, body) = get(app, "/explode").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, json!({"status": "Internal server error."}));
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (app, _) = create_app(fixture()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/products")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "req-42");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let (app, _) = create_app(fixture()).await;

    let response = app
        .oneshot(Request::builder().uri("/buyers").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (app, _) = create_app(fixture()).await;

    let (status, json) = get_json(app, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/realbuyers/ip/{buyer_id}"].is_object());
}

#[tokio::test]
async fn test_cors_headers_when_configured() {
    let connector = Arc::new(fixture());
    let repository = GraphRepository::new(connector);
    let snapshot = Snapshot::load(&repository).await.unwrap();
    let state = Arc::new(AppState::new(snapshot, repository));
    let config = ServerConfig {
        cors_origins: vec!["http://localhost:8081".to_string()],
        ..ServerConfig::default()
    };
    let app = create_router(state, &config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/buyers")
                .header(header::ORIGIN, "http://localhost:8081")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:8081"
    );
}

// =============================================================================
// Startup
// =============================================================================

#[tokio::test]
async fn test_unreachable_store_prevents_startup() {
    // Reserve a free port, then release it for the server to try.
    let free = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = free.local_addr().unwrap().port();
    drop(free);

    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;

    let result = serve(config, Arc::new(FixtureConnector::unreachable())).await;
    assert!(result.is_err());

    // Nothing was left listening on the port.
    assert!(std::net::TcpListener::bind(("127.0.0.1", port)).is_ok());
}
