//! Buyer handlers
//!
//! The three listings render envelopes from the startup snapshot. The IP and
//! recommendation lookups resolve the path id against the real-buyer snapshot,
//! then forward the graph store's document as-is.
//!
//! Author: Buyers API Team

use crate::error::ErrResponse;
use crate::render::{render_list, RawDocument};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// List every buyer
#[utoipa::path(
    get,
    path = "/buyers",
    tag = "buyers",
    responses(
        (status = 200, description = "Buyer envelopes"),
        (status = 422, description = "Error rendering response", body = ErrResponse)
    )
)]
pub async fn list_buyers(State(state): State<Arc<AppState>>) -> Result<Response, ErrResponse> {
    render_list(&state.snapshot.buyers)
}

/// List buyers that made at least one transaction
#[utoipa::path(
    get,
    path = "/realbuyers",
    tag = "realbuyers",
    responses(
        (status = 200, description = "Buyer envelopes including IP"),
        (status = 422, description = "Error rendering response", body = ErrResponse)
    )
)]
pub async fn list_real_buyers(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ErrResponse> {
    render_list(&state.snapshot.real_buyers)
}

/// Purchase history of the fixed history buyer
#[utoipa::path(
    get,
    path = "/realbuyers/purchaseHistory",
    tag = "realbuyers",
    responses(
        (status = 200, description = "Purchase history envelopes"),
        (status = 422, description = "Error rendering response", body = ErrResponse)
    )
)]
pub async fn list_purchase_history(
    State(state): State<Arc<AppState>>,
) -> Result<Response, ErrResponse> {
    render_list(&state.snapshot.purchases_history)
}

/// Buyers sharing the IP address of a real buyer
#[utoipa::path(
    get,
    path = "/realbuyers/ip/{buyer_id}",
    tag = "realbuyers",
    params(
        ("buyer_id" = String, Path, description = "External buyer id")
    ),
    responses(
        (status = 200, description = "Graph document keyed by getBuyerByIpAddress"),
        (status = 404, description = "Unknown real buyer", body = ErrResponse),
        (status = 502, description = "Graph query failed", body = ErrResponse)
    )
)]
pub async fn buyers_by_ip(
    State(state): State<Arc<AppState>>,
    Path(buyer_id): Path<String>,
) -> Result<RawDocument, ErrResponse> {
    let buyer = state.snapshot.real_buyer(&buyer_id)?;

    debug!(buyer_id = %buyer_id, ip = %buyer.ip, "looking up buyers by ip");

    let document = state
        .repository
        .buyers_by_ip(&buyer.ip)
        .await
        .map_err(|e| {
            warn!(buyer_id = %buyer_id, error = %e, "buyers by ip query failed");
            ErrResponse::from(e)
        })?;

    Ok(RawDocument(document))
}

/// Products bought by buyers of the same age as a real buyer
#[utoipa::path(
    get,
    path = "/realbuyers/recommendations/{buyer_id}",
    tag = "realbuyers",
    params(
        ("buyer_id" = String, Path, description = "External buyer id")
    ),
    responses(
        (status = 200, description = "Graph document keyed by productRecom"),
        (status = 404, description = "Unknown real buyer", body = ErrResponse),
        (status = 502, description = "Graph query failed", body = ErrResponse)
    )
)]
pub async fn recommendations(
    State(state): State<Arc<AppState>>,
    Path(buyer_id): Path<String>,
) -> Result<RawDocument, ErrResponse> {
    let buyer = state.snapshot.real_buyer(&buyer_id)?;

    let age = buyer.age.to_string();
    debug!(buyer_id = %buyer_id, age = %age, "looking up recommendations");

    let document = state
        .repository
        .recommendations_by_age(&age)
        .await
        .map_err(|e| {
            warn!(buyer_id = %buyer_id, error = %e, "recommendation query failed");
            ErrResponse::from(e)
        })?;

    Ok(RawDocument(document))
}
