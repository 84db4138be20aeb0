//! Transaction handlers

use crate::error::ErrResponse;
use crate::render::render_list;
use crate::state::AppState;
use axum::{extract::State, response::Response};
use std::sync::Arc;

/// List every transaction with its buyers and products
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    responses(
        (status = 200, description = "Transaction envelopes"),
        (status = 422, description = "Error rendering response", body = ErrResponse)
    )
)]
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ErrResponse> {
    render_list(&state.snapshot.transactions)
}
