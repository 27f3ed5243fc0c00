//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{AtomResponse, ErrorResponse, HealthResponse, StatusResponse, TypesResponse},
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use cogweb_core::{
    AtomCommandBuilder, AtomId, AtomRequestParser, AtomStore, ErrorKind, Outcome, PipelineError,
    response,
};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Atom counts.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    match store.stats() {
        Ok(stats) => (
            StatusCode::OK,
            Json(StatusResponse {
                atom_count: stats.atoms(),
                node_count: stats.nodes,
                link_count: stats.links,
                persistent: store.is_persistent(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

// =============================================================================
// TYPES HANDLER
// =============================================================================

/// Registered atom types.
pub async fn types_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(TypesResponse::from(state.registry.as_ref()))
}

// =============================================================================
// CREATE ATOM HANDLER
// =============================================================================

/// Create or merge an atom from the raw request body.
///
/// The body is taken as bytes so that invalid UTF-8 gets the JSON error
/// reply. It is parsed before the store lock is taken; lookup and insert then
/// run under one write guard.
pub async fn create_atom_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let registry = state.registry.as_ref();

    let outcome: Outcome = match AtomRequestParser::new(registry).parse_slice(&body) {
        Ok(spec) => {
            let mut store = state.store.write().await;
            AtomCommandBuilder::new(registry, &mut *store)
                .build(spec)
                .map_err(PipelineError::from)
        }
        Err(e) => Err(e.into()),
    };

    if let Err(e) = &outcome {
        tracing::warn!(kind = ?e.kind(), error = %e, "atom request rejected");
    }

    (status_for(&outcome), Json(response::encode(&outcome)))
}

fn status_for(outcome: &Outcome) -> StatusCode {
    match outcome {
        Ok(built) if built.existed => StatusCode::OK,
        Ok(_) => StatusCode::CREATED,
        Err(e) => match e.kind() {
            ErrorKind::Syntax | ErrorKind::Schema => StatusCode::BAD_REQUEST,
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

// =============================================================================
// GET ATOM HANDLER
// =============================================================================

/// Fetch a stored atom by handle.
pub async fn get_atom_handler(
    State(state): State<AppState>,
    Path(handle): Path<u64>,
) -> impl IntoResponse {
    let store = state.store.read().await;
    match store.get_atom(AtomId(handle)) {
        Ok(Some(atom)) => (
            StatusCode::OK,
            Json(AtomResponse::from_atom(&atom, state.registry.as_ref())),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("atom not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

// =============================================================================
// TESTS
// =============================================================================
