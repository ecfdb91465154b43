//! Grading of a learner's answers against a question key.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    band::BandTable,
    normalize::{NormalizePolicy, value_to_text},
    question::{QuestionKind, QuestionSpec, as_list},
};

/// Learner answers keyed by question id.
pub type AnswerMap = BTreeMap<String, Value>;

/// Knobs for a grading run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeOptions {
    /// Normalizer applied to both sides of every comparison
    pub policy: NormalizePolicy,
    /// Table the final band is read from
    pub band_table: BandTable,
}

/// The expected answer as shown back to the learner.
///
/// `Many` is listed first so a JSON array decodes back into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expected {
    /// Every accepted value, or the ordered key of a matching question
    Many(Vec<Value>),
    /// The only accepted value
    Single(Value),
}

/// Grading outcome for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreItem {
    /// Id of the graded question
    pub question_id: String,
    /// Display order of the question
    pub number: i64,
    /// Kind the question was graded as
    pub kind: QuestionKind,
    /// Trimmed question text
    pub prompt: String,
    /// Accepted answer(s) in display form
    pub expected: Expected,
    /// The learner's answer exactly as submitted, `null` when absent.
    pub submitted: Value,
    /// Whether the submitted answer was accepted
    pub correct: bool,
    /// Weight of the question, earned only when correct
    pub points: f64,
    /// Explanation shown after grading, when the question has one
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindBreakdown {
    /// Questions of this kind answered correctly
    pub correct: u32,
    /// Questions of this kind on the paper
    pub total: u32,
    /// `correct / total` as a rounded percentage, 0 for an empty bucket
    pub percentage: u32,
}

/// Aggregate result of grading one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    pub total_questions: u32,
    pub correct_count: u32,
    pub total_points: f64,
    pub earned_points: f64,
    pub band: f64,
    pub percentage: u32,
    pub items: Vec<ScoreItem>,
    /// Keyed by kind label.
    pub breakdown: BTreeMap<String, KindBreakdown>,
}

/// Grade with lenient normalization and the default band table.
pub fn grade(questions: &[QuestionSpec], answers: &AnswerMap) -> GradeResult {
    grade_with(questions, answers, &GradeOptions::default())
}

/// Grade every question independently and aggregate the totals.
///
/// This never fails. Missing or malformed answers are simply incorrect, and
/// a question of an unrecognized kind is counted but never marked correct.
pub fn grade_with(
    questions: &[QuestionSpec],
    answers: &AnswerMap,
    options: &GradeOptions,
) -> GradeResult {
    let mut total_questions = 0u32;
    let mut correct_count = 0u32;
    let mut total_points = 0.0;
    let mut earned_points = 0.0;
    let mut breakdown: BTreeMap<String, KindBreakdown> = BTreeMap::new();
    let mut items = Vec::with_capacity(questions.len());

    for question in questions {
        total_questions += 1;
        total_points += question.points;

        let bucket = breakdown.entry(question.kind.label().to_string()).or_default();
        bucket.total += 1;

        if let QuestionKind::Unrecognized(label) = &question.kind {
            tracing::warn!(
                question_id = %question.id,
                kind = %label,
                "Unrecognized question kind, counting as incorrect"
            );
        }

        let submitted = answers.get(&question.id);
        let correct = is_correct(
            &question.kind,
            &question.correct_answers,
            submitted,
            options.policy,
        );

        if correct {
            correct_count += 1;
            earned_points += question.points;
            bucket.correct += 1;
        }

        items.push(ScoreItem {
            question_id: question.id.clone(),
            number: question.order_number,
            kind: question.kind.clone(),
            prompt: question.prompt.clone(),
            expected: expected_for_display(question),
            submitted: submitted.cloned().unwrap_or(Value::Null),
            correct,
            points: question.points,
            rationale: question.rationale.clone(),
        });
    }

    for bucket in breakdown.values_mut() {
        bucket.percentage = percent(f64::from(bucket.correct), f64::from(bucket.total));
    }

    let band = options.band_table.band_for(correct_count, total_questions);
    let percentage = percent(earned_points, total_points);

    tracing::debug!(
        total_questions,
        correct_count,
        earned_points,
        band,
        "Graded attempt"
    );

    GradeResult {
        total_questions,
        correct_count,
        total_points,
        earned_points,
        band,
        percentage,
        items,
        breakdown,
    }
}

fn is_correct(
    kind: &QuestionKind,
    accepted: &[Value],
    submitted: Option<&Value>,
    policy: NormalizePolicy,
) -> bool {
    match kind {
        QuestionKind::Tfng | QuestionKind::Mcq => {
            let expected = policy.apply(accepted.first());
            expected.is_some() && expected == policy.apply(submitted)
        }
        QuestionKind::Short => {
            let candidates: HashSet<String> = accepted
                .iter()
                .filter_map(|value| policy.apply(Some(value)))
                .collect();
            policy
                .apply(submitted)
                .is_some_and(|answer| candidates.contains(&answer))
        }
        QuestionKind::Matching => {
            let expected = normalized_list(accepted, policy);
            let actual = normalized_list(&as_list(submitted.cloned().unwrap_or(Value::Null)), policy);
            !expected.is_empty() && expected == actual
        }
        QuestionKind::Unrecognized(_) => false,
    }
}

/// String form of each entry, `""` for null.
fn string_list(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .map(|value| value_to_text(Some(value)).unwrap_or_default())
        .collect()
}

fn normalized_list(values: &[Value], policy: NormalizePolicy) -> Vec<String> {
    string_list(values)
        .iter()
        .map(|text| policy.normalize(text).unwrap_or_default())
        .collect()
}

fn expected_for_display(question: &QuestionSpec) -> Expected {
    match (&question.kind, question.correct_answers.as_slice()) {
        (QuestionKind::Matching, values) => Expected::Many(
            string_list(values).into_iter().map(Value::String).collect(),
        ),
        (_, [single]) => Expected::Single(single.clone()),
        (_, values) => Expected::Many(values.to_vec()),
    }
}

fn percent(part: f64, whole: f64) -> u32 {
    if whole > 0.0 {
        (part / whole * 100.0).round() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answers(pairs: &[(&str, Value)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(id, value)| (id.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_tfng_scenario() {
        let key = ["true", "true", "true", "not given", "true"];
        let given = ["true", "false", "true", "not given", "false"];

        let questions: Vec<QuestionSpec> = key
            .iter()
            .enumerate()
            .map(|(i, k)| {
                QuestionSpec::new(format!("q{i}"), QuestionKind::Tfng, *k).with_order(i as i64 + 1)
            })
            .collect();
        let submitted: AnswerMap = given
            .iter()
            .enumerate()
            .map(|(i, a)| (format!("q{i}"), json!(a)))
            .collect();

        let result = grade(&questions, &submitted);

        assert_eq!(result.correct_count, 3);
        assert_eq!(result.total_questions, 5);
        assert_eq!(result.percentage, 60);
        assert_eq!(result.band, crate::band::band_from_raw(3, 5));
        assert_eq!(
            result.breakdown.get("tfng"),
            Some(&KindBreakdown {
                correct: 3,
                total: 5,
                percentage: 60
            })
        );
        assert_eq!(result.items.len(), 5);
        assert!(!result.items[1].correct);
        assert_eq!(result.items[1].submitted, json!("false"));
        assert_eq!(result.items[1].number, 2);
    }

    #[test]
    fn test_tfng_is_case_and_punctuation_insensitive() {
        let questions = vec![QuestionSpec::new("q", QuestionKind::Tfng, "Not Given")];
        let result = grade(&questions, &answers(&[("q", json!("  not given. "))]));
        assert_eq!(result.correct_count, 1);
    }

    #[test]
    fn test_mcq_uses_first_accepted_value() {
        let questions = vec![QuestionSpec::new("q", QuestionKind::Mcq, json!(["B", "C"]))];
        assert_eq!(grade(&questions, &answers(&[("q", json!("b"))])).correct_count, 1);
        assert_eq!(grade(&questions, &answers(&[("q", json!("C"))])).correct_count, 0);
    }

    #[test]
    fn test_blank_key_never_matches_blank_answer() {
        let questions = vec![QuestionSpec::new("q", QuestionKind::Mcq, "?")];
        let result = grade(&questions, &answers(&[("q", json!("!"))]));
        assert_eq!(result.correct_count, 0);
    }

    #[test]
    fn test_short_accepts_any_phrasing() {
        let questions = vec![QuestionSpec::new(
            "q",
            QuestionKind::Short,
            json!(["color", "colour"]),
        )];
        let result = grade(&questions, &answers(&[("q", json!("Colour."))]));
        assert_eq!(result.correct_count, 1);

        let result = grade(&questions, &answers(&[("q", json!("colours"))]));
        assert_eq!(result.correct_count, 0);
    }

    #[test]
    fn test_short_numeric_answer() {
        let questions = vec![QuestionSpec::new("q", QuestionKind::Short, json!([1990]))];
        let result = grade(&questions, &answers(&[("q", json!("1990"))]));
        assert_eq!(result.correct_count, 1);
    }

    #[test]
    fn test_matching_is_positional() {
        let questions = vec![QuestionSpec::new(
            "m",
            QuestionKind::Matching,
            json!(["1", "2", "3"]),
        )];
        assert_eq!(
            grade(&questions, &answers(&[("m", json!(["1", "2", "3"]))])).correct_count,
            1
        );
        assert_eq!(
            grade(&questions, &answers(&[("m", json!(["1", "3", "2"]))])).correct_count,
            0
        );

        let pair = vec![QuestionSpec::new("m", QuestionKind::Matching, json!(["A", "B"]))];
        assert_eq!(
            grade(&pair, &answers(&[("m", json!(["B", "A"]))])).correct_count,
            0
        );
    }

    #[test]
    fn test_matching_length_must_agree() {
        let questions = vec![QuestionSpec::new("m", QuestionKind::Matching, json!(["A", "B"]))];
        assert_eq!(
            grade(&questions, &answers(&[("m", json!(["A"]))])).correct_count,
            0
        );
        assert_eq!(
            grade(&questions, &answers(&[("m", json!(["A", "B", "C"]))])).correct_count,
            0
        );
    }

    #[test]
    fn test_matching_scalar_answer_is_wrapped() {
        let questions = vec![QuestionSpec::new("m", QuestionKind::Matching, json!(["iv"]))];
        assert_eq!(
            grade(&questions, &answers(&[("m", json!("IV"))])).correct_count,
            1
        );
    }

    #[test]
    fn test_matching_empty_key_is_never_correct() {
        let questions = vec![QuestionSpec::new("m", QuestionKind::Matching, json!([]))];
        assert_eq!(
            grade(&questions, &answers(&[("m", json!([]))])).correct_count,
            0
        );
    }

    #[test]
    fn test_unrecognized_kind_counts_but_never_correct() {
        let questions = vec![
            QuestionSpec::new("x", QuestionKind::parse("essay"), "anything"),
            QuestionSpec::new("y", QuestionKind::Mcq, "a"),
        ];
        let result = grade(
            &questions,
            &answers(&[("x", json!("anything")), ("y", json!("a"))]),
        );
        assert_eq!(result.total_questions, 2);
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.total_points, 2.0);
        assert_eq!(result.breakdown["essay"].total, 1);
        assert_eq!(result.breakdown["essay"].correct, 0);
    }

    #[test]
    fn test_missing_answer_is_incorrect() {
        let questions = vec![QuestionSpec::new("q", QuestionKind::Tfng, "true")];
        let result = grade(&questions, &AnswerMap::new());
        assert_eq!(result.correct_count, 0);
        assert_eq!(result.items[0].submitted, Value::Null);
    }

    #[test]
    fn test_weighted_percentage() {
        let questions = vec![
            QuestionSpec::new("a", QuestionKind::Mcq, "a").with_points(3.0),
            QuestionSpec::new("b", QuestionKind::Mcq, "b"),
        ];
        let result = grade(&questions, &answers(&[("a", json!("a"))]));
        assert_eq!(result.total_points, 4.0);
        assert_eq!(result.earned_points, 3.0);
        assert_eq!(result.percentage, 75);
        assert_eq!(result.breakdown["mcq"].percentage, 50);
    }

    #[test]
    fn test_zero_weight_question() {
        let questions = vec![
            QuestionSpec::new("a", QuestionKind::Mcq, "a"),
            QuestionSpec::new("b", QuestionKind::Mcq, "b").with_points(0.0),
        ];
        let result = grade(&questions, &answers(&[("b", json!("b"))]));
        assert_eq!(result.correct_count, 1);
        assert_eq!(result.total_points, 1.0);
        assert_eq!(result.earned_points, 0.0);
        assert_eq!(result.percentage, 0);
    }

    #[test]
    fn test_all_zero_weight_paper() {
        let questions = vec![QuestionSpec::new("a", QuestionKind::Mcq, "a").with_points(0.0)];
        let result = grade(&questions, &answers(&[("a", json!("a"))]));
        assert_eq!(result.total_points, 0.0);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.breakdown["mcq"].percentage, 100);
    }

    #[test]
    fn test_empty_paper() {
        let result = grade(&[], &AnswerMap::new());
        assert_eq!(result.total_questions, 0);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.band, BandTable::default().floor());
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn test_expected_display_shape() {
        let questions = vec![
            QuestionSpec::new("a", QuestionKind::Mcq, "B"),
            QuestionSpec::new("b", QuestionKind::Short, json!(["x", "y"])),
            QuestionSpec::new("c", QuestionKind::Matching, json!(["i", null])),
            QuestionSpec::new("d", QuestionKind::Matching, json!(["i"])),
        ];
        let result = grade(&questions, &AnswerMap::new());
        assert_eq!(result.items[0].expected, Expected::Single(json!("B")));
        assert_eq!(result.items[1].expected, Expected::Many(vec![json!("x"), json!("y")]));
        assert_eq!(result.items[2].expected, Expected::Many(vec![json!("i"), json!("")]));
        assert_eq!(result.items[3].expected, Expected::Many(vec![json!("i")]));
    }

    #[test]
    fn test_result_survives_json_round_trip() {
        let questions = vec![
            QuestionSpec::new("a", QuestionKind::Mcq, "B"),
            QuestionSpec::new("b", QuestionKind::Short, json!(["x", "y"])),
            QuestionSpec::new("c", QuestionKind::Matching, json!(["1", "2"])),
            QuestionSpec::new("d", QuestionKind::parse("essay"), json!(null)),
        ];
        let result = grade(&questions, &answers(&[("c", json!(["1", "2"]))]));

        let json = serde_json::to_string(&result).unwrap();
        let decoded: GradeResult = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, result);
        assert_eq!(decoded.items[1].expected, Expected::Many(vec![json!("x"), json!("y")]));
    }

    #[test]
    fn test_strict_policy() {
        let questions = vec![QuestionSpec::new("q", QuestionKind::Short, "café")];
        let options = GradeOptions {
            policy: NormalizePolicy::Strict,
            ..GradeOptions::default()
        };
        let submitted = answers(&[("q", json!("cafe"))]);
        assert_eq!(grade_with(&questions, &submitted, &options).correct_count, 0);
        assert_eq!(grade(&questions, &submitted).correct_count, 1);

        let submitted = answers(&[("q", json!(" CAFÉ "))]);
        assert_eq!(grade_with(&questions, &submitted, &options).correct_count, 1);
    }

    #[test]
    fn test_rationale_is_carried() {
        let questions =
            vec![QuestionSpec::new("q", QuestionKind::Tfng, "true").with_rationale("Paragraph B")];
        let result = grade(&questions, &AnswerMap::new());
        assert_eq!(result.items[0].rationale.as_deref(), Some("Paragraph B"));
    }

    #[test]
    fn test_deterministic_serialization() {
        let questions = vec![
            QuestionSpec::new("b", QuestionKind::Short, json!(["x"])),
            QuestionSpec::new("a", QuestionKind::Mcq, "a"),
        ];
        let submitted = answers(&[("a", json!("a")), ("b", json!("y"))]);
        let first = serde_json::to_string(&grade(&questions, &submitted)).unwrap();
        let second = serde_json::to_string(&grade(&questions, &submitted)).unwrap();
        assert_eq!(first, second);
    }
}
