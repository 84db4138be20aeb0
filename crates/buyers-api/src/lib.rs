//! Buyers API - REST server
//!
//! Serves buyer, product and transaction records loaded from Dgraph at
//! startup, plus two lookups that query the graph on each request.
//!
//! Author: Buyers API Team

pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod state;

use anyhow::Context;
use axum::{http::header, Router};
use buyers_core::{AppConfig, ServerConfig};
use buyers_graph::{GraphConnector, GraphRepository};
use state::{AppState, Snapshot};
use std::sync::Arc;
use tower::{Layer, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Build the router with the full middleware stack
pub fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    with_middleware(routes::api_routes().with_state(state), config)
}

/// Wrap a routed application in the service's middleware stack.
///
/// The URL format rewrite wraps `app` as a whole so it runs before route
/// matching; the remaining layers sit outside it.
pub fn with_middleware(app: Router, config: &ServerConfig) -> Router {
    let app = axum::middleware::from_fn(middleware::url_format).layer(app);

    let stack = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(middleware::request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CatchPanicLayer::custom(middleware::recover_from_panic))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_TYPE,
            middleware::json_content_type(),
        ));

    let router = Router::new().fallback_service(app).layer(stack);

    match middleware::cors_layer(&config.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// Load the snapshot, then bind and serve.
///
/// The listener is only bound once every startup query has succeeded; a
/// graph failure returns before any connection can be accepted.
pub async fn serve(config: AppConfig, connector: Arc<dyn GraphConnector>) -> anyhow::Result<()> {
    let repository = GraphRepository::new(connector);
    let snapshot = Snapshot::load(&repository)
        .await
        .context("failed to load startup data from the graph store")?;

    let state = Arc::new(AppState::new(snapshot, repository));
    let app = create_router(state, &config.server);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Buyers API Server starting on http://{}", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
