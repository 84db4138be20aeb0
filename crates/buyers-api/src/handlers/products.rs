//! Product handlers

use crate::error::ErrResponse;
use crate::render::render_list;
use crate::state::AppState;
use axum::{extract::State, response::Response};
use std::sync::Arc;

/// List every product
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses(
        (status = 200, description = "Product envelopes"),
        (status = 422, description = "Error rendering response", body = ErrResponse)
    )
)]
pub async fn list_products(State(state): State<Arc<AppState>>) -> Result<Response, ErrResponse> {
    render_list(&state.snapshot.products)
}
