//! Axum handlers.
//!
//! Each handler receives [`AppState`] via [`axum::extract::State`], delegates
//! to the service operation, and maps the outcome onto a status + JSON body.
//! Store faults surface as 502; only a missing compound is a 404.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::error::AppError;
use crate::service::AppState;

// ── Request types ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct AutocompleteParams {
    chemical_name: String,
}

#[derive(Deserialize)]
pub(super) struct GetCompoundParams {
    compound_id: String,
}

#[derive(Deserialize)]
pub(super) struct UpdateCompoundParams {
    compound_id: u64,
}

#[derive(Deserialize)]
pub(super) struct RefreshParams {
    synonym_name: String,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

fn internal_error(context: &str, e: AppError) -> Response {
    warn!(error = %e, "{context} failed");
    (StatusCode::BAD_GATEWAY, json_error("store", e)).into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /api/health
pub(super) async fn health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// GET /symAutoComplete/
pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Response {
    match state.autocomplete(&params.chemical_name).await {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => internal_error("autocomplete", e),
    }
}

/// GET /getCompound/
pub(super) async fn get_compound(
    State(state): State<AppState>,
    Query(params): Query<GetCompoundParams>,
) -> Response {
    match state.compound(&params.compound_id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(AppError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            json_error("not_found", "compound could not be found"),
        )
            .into_response(),
        Err(e) => internal_error("compound read", e),
    }
}

/// GET /updateCompound/
pub(super) async fn update_compound(
    State(state): State<AppState>,
    Query(params): Query<UpdateCompoundParams>,
) -> Response {
    match state.update_compound(params.compound_id).await {
        Ok(key) => (StatusCode::OK, Json(json!({ "id": key }))).into_response(),
        Err(e) => internal_error("compound upsert", e),
    }
}

/// GET /updatePubchemSynonymsByName/
pub(super) async fn refresh_synonyms(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Response {
    match state.refresh_synonyms(&params.synonym_name).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => internal_error("synonym refresh", e),
    }
}
