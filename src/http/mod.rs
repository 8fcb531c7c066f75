//! Axum-based HTTP boundary.
//!
//! Routes mirror the service operations one-to-one; all logic lives on
//! [`AppState`](crate::service::AppState). The server loop wires the shared
//! [`CancellationToken`] to axum's graceful shutdown.
//!
//! ```text
//! GET /symAutoComplete/?chemical_name=...
//! GET /getCompound/?compound_id=...
//! GET /updateCompound/?compound_id=...
//! GET /updatePubchemSynonymsByName/?synonym_name=...
//! GET /api/health
//! ```

mod api;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppError;
use crate::service::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/symAutoComplete/", get(api::autocomplete))
        .route("/getCompound/", get(api::get_compound))
        .route("/updateCompound/", get(api::update_compound))
        .route("/updatePubchemSynonymsByName/", get(api::refresh_synonyms))
        .route("/api/health", get(api::health))
        .with_state(state)
}

/// Bind and serve until `shutdown` is cancelled.
pub async fn serve(bind: &str, state: AppState, shutdown: CancellationToken) -> Result<(), AppError> {
    let router = build_router(state);

    let listener = TcpListener::bind(bind)
        .await
        .map_err(|e| AppError::Http(format!("bind failed on {bind}: {e}")))?;

    info!(%bind, "http listener ready");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| AppError::Http(format!("server error: {e}")))?;

    info!("http listener shut down");
    Ok(())
}
