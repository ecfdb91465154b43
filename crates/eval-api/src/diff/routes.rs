use axum::{Json, Router, extract::State, routing::post};
use eval_core::{DiffChunk, DiffStats, TokenMode, diff_text};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError, metrics};

/// Create the diff routes
pub fn routes() -> Router<ApiState> {
    Router::new().route("/v1/diff", post(diff_answers))
}

#[derive(Debug, Deserialize)]
pub struct DiffRequest {
    pub original: String,
    pub revised: String,
    #[serde(default)]
    pub mode: TokenMode,
}

#[derive(Debug, Serialize)]
pub struct DiffResponse {
    pub mode: TokenMode,
    pub chunks: Vec<DiffChunk<String>>,
    pub stats: DiffStats,
}

async fn diff_answers(
    State(state): State<ApiState>,
    Json(payload): Json<DiffRequest>,
) -> Result<Json<DiffResponse>, ApiError> {
    let chunks = diff_text(
        &payload.original,
        &payload.revised,
        payload.mode,
        state.diff_limits,
    )
    .inspect_err(|_| metrics::record_diff_event(payload.mode, false))?;

    metrics::record_diff_event(payload.mode, true);

    Ok(Json(DiffResponse {
        mode: payload.mode,
        stats: DiffStats::from_chunks(&chunks),
        chunks,
    }))
}
