//! HTTP route handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::error::ApiError;
use super::state::AppState;
use crate::core::SanitizeRequest;
use crate::domain::ScrubError;
use crate::masking::MaskingOutcome;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sanitize", post(sanitize))
        .route("/health", get(health))
}

async fn sanitize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SanitizeRequest>, JsonRejection>,
) -> Result<Json<MaskingOutcome>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(status = %rejection.status(), "Rejected request body");
        ScrubError::InvalidInput(
            "Request body must be a JSON object with a 'text' string".to_string(),
        )
    })?;

    let outcome = state.service.sanitize(&request).await?;
    Ok(Json(outcome))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
