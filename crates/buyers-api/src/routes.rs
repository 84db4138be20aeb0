//! API route definitions
//!
//! Every path answers GET only; other methods get the 405 envelope and
//! unknown paths the 404 envelope.
//!
//! Author: Buyers API Team

use crate::docs;
use crate::error::ErrResponse;
use crate::handlers::{buyers, health, products, transactions};
use crate::middleware::paginate;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;

async fn not_found() -> ErrResponse {
    ErrResponse::not_found()
}

async fn method_not_allowed() -> ErrResponse {
    ErrResponse::method_not_allowed()
}

/// Register `handler` at `path` and at `path/`
fn route_both<S>(router: Router<S>, path: &str, handler: MethodRouter<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let handler = handler.fallback(method_not_allowed);
    router
        .route(path, handler.clone())
        .route(&format!("{path}/"), handler)
}

/// Plain listings; these carry the pagination middleware
pub fn list_routes() -> Router<Arc<AppState>> {
    let router = Router::new();
    let router = route_both(router, "/buyers", get(buyers::list_buyers));
    let router = route_both(router, "/realbuyers", get(buyers::list_real_buyers));
    let router = route_both(router, "/products", get(products::list_products));
    let router = route_both(router, "/transactions", get(transactions::list_transactions));

    router.route_layer(middleware::from_fn(paginate))
}

/// Real-buyer derived lookups
pub fn lookup_routes() -> Router<Arc<AppState>> {
    let router = Router::new();
    let router = route_both(
        router,
        "/realbuyers/purchaseHistory",
        get(buyers::list_purchase_history),
    );
    let router = route_both(router, "/realbuyers/ip/:buyer_id", get(buyers::buyers_by_ip));
    route_both(
        router,
        "/realbuyers/recommendations/:buyer_id",
        get(buyers::recommendations),
    )
}

/// Health and documentation
pub fn service_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check).fallback(method_not_allowed))
        .route(
            "/api-docs/openapi.json",
            get(docs::openapi_handler).fallback(method_not_allowed),
        )
}

/// Every route the service answers
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(list_routes())
        .merge(lookup_routes())
        .merge(service_routes())
        .fallback(not_found)
}
