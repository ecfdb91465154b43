use axum::{Json, Router, extract::State, routing::post};
use eval_core::{AttemptSummary, NormalizePolicy, QuestionSpec, grade_with};

use crate::{ApiState, error::ApiError, metrics};

use super::model::{BandRequest, BandResponse, GradeRequest, GradeResponse};

/// Create the grading routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/v1/grade", post(grade_attempt))
        .route("/v1/band", post(convert_band))
}

async fn grade_attempt(
    State(state): State<ApiState>,
    Json(payload): Json<GradeRequest>,
) -> Result<Json<GradeResponse>, ApiError> {
    let learner_id = match payload.learner_id.as_deref().map(str::trim) {
        Some("") => {
            return Err(ApiError::Validation(
                "learner_id cannot be empty".to_string(),
            ));
        }
        other => other.map(str::to_string),
    };

    let policy = if payload.strict {
        NormalizePolicy::Strict
    } else {
        NormalizePolicy::Lenient
    };

    let questions: Vec<QuestionSpec> = payload
        .questions
        .iter()
        .map(QuestionSpec::from_record)
        .collect();

    let result = grade_with(&questions, &payload.answers, &state.grade_options(policy));
    metrics::record_grade_event(policy, result.total_questions, result.correct_count);

    let attempt = learner_id.map(|id| AttemptSummary::new(id, &result, &payload.answers));

    tracing::info!(
        questions = result.total_questions,
        correct = result.correct_count,
        band = result.band,
        "Attempt graded"
    );

    Ok(Json(GradeResponse { result, attempt }))
}

async fn convert_band(
    State(state): State<ApiState>,
    Json(payload): Json<BandRequest>,
) -> Json<BandResponse> {
    let correct = payload.correct.min(payload.total);
    Json(BandResponse {
        correct,
        total: payload.total,
        band: state.band_table.band_for(correct, payload.total),
    })
}
