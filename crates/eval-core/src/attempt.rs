use serde::{Deserialize, Serialize};

use crate::matcher::{AnswerMap, GradeResult};

/// What gets stored for a graded attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub learner_id: String,
    pub correct_count: u32,
    pub total_questions: u32,
    pub band: f64,
    pub percentage: u32,
    /// Every submitted answer, kept for audit.
    pub answers: AnswerMap,
}

impl AttemptSummary {
    pub fn new(learner_id: impl Into<String>, result: &GradeResult, answers: &AnswerMap) -> Self {
        Self {
            learner_id: learner_id.into(),
            correct_count: result.correct_count,
            total_questions: result.total_questions,
            band: result.band,
            percentage: result.percentage,
            answers: answers.clone(),
        }
    }
}
