//! Response shaping
//!
//! Two serialization strategies coexist and are chosen per route:
//! - envelope lists: each record flattened into an object with a synthetic
//!   `elapsed` field
//! - raw documents: the graph store's JSON passed through untouched

use crate::error::ErrResponse;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Value reported in every envelope's `elapsed` field. No timing is measured.
pub const ELAPSED: i64 = 10;

/// A record plus transport metadata
#[derive(Debug, Serialize)]
pub struct Envelope<'a, T> {
    #[serde(flatten)]
    pub entity: &'a T,
    pub elapsed: i64,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    pub fn new(entity: &'a T) -> Self {
        Self {
            entity,
            elapsed: ELAPSED,
        }
    }
}

/// Wrap each record, keeping input order
pub fn envelope_list<T: Serialize>(entities: &[T]) -> Vec<Envelope<'_, T>> {
    entities.iter().map(Envelope::new).collect()
}

/// Render a list of records as a JSON array of envelopes.
///
/// A serialization failure becomes the 422 render error.
pub fn render_list<T: Serialize>(entities: &[T]) -> Result<Response, ErrResponse> {
    let body = serde_json::to_vec(&envelope_list(entities)).map_err(ErrResponse::render)?;
    Ok(json_response(body))
}

/// A JSON document forwarded exactly as the graph store returned it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument(pub Vec<u8>);

impl IntoResponse for RawDocument {
    fn into_response(self) -> Response {
        json_response(self.0)
    }
}

fn json_response(body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
