//! Question definitions.
//!
//! [`QuestionRecord`] is the loose shape questions are stored in. It is
//! decoded into a [`QuestionSpec`] with every field defaulted, so a single
//! bad row never stops a paper from being graded.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalize::value_to_text;

/// Label given to a question whose kind is missing or blank.
pub const UNKNOWN_KIND: &str = "unknown";

/// The closed set of gradable question kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QuestionKind {
    /// True / False / Not Given (and the Yes / No / Not Given variant)
    Tfng,
    /// Single choice
    Mcq,
    /// Free text short answer, any accepted phrasing matches
    Short,
    /// Ordered list, compared position by position
    Matching,
    /// A label outside the known set. Counted, never correct.
    Unrecognized(String),
}

impl QuestionKind {
    /// Parse a stored kind label. Unknown and empty labels are kept as [`QuestionKind::Unrecognized`].
    pub fn parse(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            "tfng" | "ynng" => Self::Tfng,
            "mcq" => Self::Mcq,
            "short" | "gap" => Self::Short,
            "matching" | "match" => Self::Matching,
            "" => Self::Unrecognized(UNKNOWN_KIND.to_string()),
            _ => Self::Unrecognized(label),
        }
    }

    /// The label used in output and in the per-kind breakdown.
    pub fn label(&self) -> &str {
        match self {
            Self::Tfng => "tfng",
            Self::Mcq => "mcq",
            Self::Short => "short",
            Self::Matching => "matching",
            Self::Unrecognized(label) => label,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for QuestionKind {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<QuestionKind> for String {
    fn from(kind: QuestionKind) -> Self {
        kind.label().to_string()
    }
}

/// A question exactly as it comes out of storage or a request body.
///
/// Decoding never fails. Any JSON value is accepted and a non-object becomes
/// an empty record. Fields stored under several names are resolved in the
/// order of the key lists below, the first non-null value wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct QuestionRecord {
    pub id: Value,
    pub order_no: Value,
    pub kind: Value,
    pub prompt: Value,
    pub answers: Value,
    pub points: Value,
    pub rationale: Value,
    pub options: Value,
}

const ORDER_KEYS: &[&str] = &["order_no", "orderNo", "order_number", "orderNumber"];
const KIND_KEYS: &[&str] = &["kind", "type"];
const ANSWER_KEYS: &[&str] = &["answers", "correct", "correctAnswer", "correct_answers"];

impl From<Value> for QuestionRecord {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };

        Self {
            id: take(&mut fields, &["id"]),
            order_no: take(&mut fields, ORDER_KEYS),
            kind: take(&mut fields, KIND_KEYS),
            prompt: take(&mut fields, &["prompt"]),
            answers: take(&mut fields, ANSWER_KEYS),
            points: take(&mut fields, &["points"]),
            rationale: take(&mut fields, &["rationale"]),
            options: take(&mut fields, &["options"]),
        }
    }
}

/// First non-null value stored under one of `keys`.
fn take(fields: &mut Map<String, Value>, keys: &[&str]) -> Value {
    keys.iter()
        .find_map(|key| fields.remove(*key).filter(|value| !value.is_null()))
        .unwrap_or(Value::Null)
}

/// Where a rationale may be found on a [`QuestionRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RationaleSource {
    /// The record's own `rationale` field
    Field,
    /// `options` given as a plain string
    InlineOptions,
    /// A string under this key in the `options` object
    OptionsKey(&'static str),
}

/// Rationale lookup order. The first non-empty string wins.
pub const RATIONALE_SOURCES: &[RationaleSource] = &[
    RationaleSource::Field,
    RationaleSource::InlineOptions,
    RationaleSource::OptionsKey("rationale"),
    RationaleSource::OptionsKey("explanation"),
    RationaleSource::OptionsKey("feedback"),
];

impl RationaleSource {
    /// The trimmed rationale at this source, if it is a non-empty string.
    pub fn extract(self, record: &QuestionRecord) -> Option<String> {
        let candidate = match self {
            Self::Field => record.rationale.as_str(),
            Self::InlineOptions => record.options.as_str(),
            Self::OptionsKey(key) => record.options.get(key).and_then(Value::as_str),
        }?;
        let trimmed = candidate.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// One gradable question with all defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub id: String,
    pub order_number: i64,
    pub kind: QuestionKind,
    pub prompt: String,
    /// Accepted values in order. Scalars are wrapped into a one element list.
    pub correct_answers: Vec<Value>,
    pub points: f64,
    pub rationale: Option<String>,
}

impl QuestionSpec {
    pub fn new(id: impl Into<String>, kind: QuestionKind, correct: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            order_number: 0,
            kind,
            prompt: String::new(),
            correct_answers: as_list(correct.into()),
            points: 1.0,
            rationale: None,
        }
    }

    pub fn with_order(mut self, order_number: i64) -> Self {
        self.order_number = order_number;
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = sanitize_points(Some(points));
        self
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Decode a stored record, defaulting anything missing or malformed.
    pub fn from_record(record: &QuestionRecord) -> Self {
        let kind = QuestionKind::parse(record.kind.as_str().unwrap_or_default());

        let mut correct_answers = as_list(record.answers.clone());
        if kind == QuestionKind::Short {
            if let Some(acceptable) = record.options.get("acceptable").and_then(Value::as_array) {
                correct_answers = acceptable
                    .iter()
                    .map(|v| Value::String(value_to_text(Some(v)).unwrap_or_default()))
                    .collect();
            }
        }

        Self {
            id: value_to_text(Some(&record.id)).unwrap_or_default(),
            order_number: order_number(&record.order_no),
            prompt: value_to_text(Some(&record.prompt))
                .map(|p| p.trim().to_string())
                .unwrap_or_default(),
            correct_answers,
            points: sanitize_points(number(&record.points)),
            rationale: RATIONALE_SOURCES
                .iter()
                .find_map(|source| source.extract(record)),
            kind,
        }
    }
}

impl From<QuestionRecord> for QuestionSpec {
    fn from(record: QuestionRecord) -> Self {
        Self::from_record(&record)
    }
}

/// Wrap a scalar in a list. `null` becomes an empty list.
pub(crate) fn as_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Integer order number. Fractional values are truncated, anything else is 0.
fn order_number(value: &Value) -> i64 {
    let order = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| s.parse().ok().map(truncate))
        }
        _ => None,
    };
    order.unwrap_or_default()
}

fn truncate(value: f64) -> i64 {
    if value.is_finite() { value.trunc() as i64 } else { 0 }
}

/// Missing or non-finite points default to 1. Negative weights clamp to 0.
fn sanitize_points(points: Option<f64>) -> f64 {
    points.filter(|p| p.is_finite()).map_or(1.0, |p| p.max(0.0))
}
