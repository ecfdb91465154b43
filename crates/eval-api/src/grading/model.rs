use eval_core::{AnswerMap, AttemptSummary, GradeResult, QuestionRecord};
use serde::{Deserialize, Serialize};

/// Body of `POST /v1/grade`
#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub questions: Vec<QuestionRecord>,
    #[serde(default)]
    pub answers: AnswerMap,
    /// Compare with the strict normalizer (case and whitespace only)
    #[serde(default)]
    pub strict: bool,
    /// When set, the response also carries the attempt record to persist
    pub learner_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    #[serde(flatten)]
    pub result: GradeResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt: Option<AttemptSummary>,
}

/// Body of `POST /v1/band`
#[derive(Debug, Deserialize)]
pub struct BandRequest {
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Serialize)]
pub struct BandResponse {
    pub correct: u32,
    pub total: u32,
    pub band: f64,
}
