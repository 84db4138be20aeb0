//! Route documentation
//!
//! The same OpenAPI document is printed by `buyers-api --routes` and served
//! at `/api-docs/openapi.json`.

use crate::error::ErrResponse;
use crate::handlers::{buyers, health, products, transactions};
use axum::{response::IntoResponse, Json};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Buyers API",
        description = "Buyers, products and transactions stored in Dgraph"
    ),
    paths(
        buyers::list_buyers,
        buyers::list_real_buyers,
        buyers::list_purchase_history,
        buyers::buyers_by_ip,
        buyers::recommendations,
        products::list_products,
        transactions::list_transactions,
        health::health_check,
    ),
    components(schemas(ErrResponse, health::HealthResponse)),
    tags(
        (name = "buyers", description = "All buyers"),
        (name = "realbuyers", description = "Buyers with transactions and derived lookups"),
        (name = "products", description = "Product catalogue"),
        (name = "transactions", description = "Transactions with buyers and products"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Pretty-printed OpenAPI document
pub fn openapi_json() -> Result<String, serde_json::Error> {
    ApiDoc::openapi().to_pretty_json()
}

pub async fn openapi_handler() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
