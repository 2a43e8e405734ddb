//! JSON endpoints over the prompt collections, kept for debugging and
//! future scripting against the view.

use axum::extract::State;
use axum::{Json, Router, routing::get};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /truths
async fn truths(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.store.list_truths().await?))
}

/// GET /dares
async fn dares(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.store.list_dares().await?))
}

/// Returns the router for the JSON prompt listings.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/truths", get(truths))
        .route("/dares", get(dares))
}
