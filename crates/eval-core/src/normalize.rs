//! Answer normalization for comparison.
//!
//! Every correctness decision goes through this module. The lenient form
//! must be forgiving on accents, casing, punctuation and whitespace while
//! still telling different words apart. A value with no meaningful content
//! normalizes to `None` so "blank" is one sentinel downstream.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Which normalizer the matcher applies to both sides of a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizePolicy {
    /// Case, diacritic, punctuation and whitespace insensitive.
    #[default]
    Lenient,
    /// Lowercase and trim only.
    Strict,
}

impl NormalizePolicy {
    /// Apply this policy to an optional JSON value.
    pub fn apply(self, value: Option<&Value>) -> Option<String> {
        self.normalize(&value_to_text(value)?)
    }

    /// Normalize already stringified text with this policy.
    pub fn normalize(self, text: &str) -> Option<String> {
        match self {
            Self::Lenient => normalize(text),
            Self::Strict => normalize_strict(text),
        }
    }
}

/// Normalize a string for answer comparison.
///
/// Applies the following transformations in order:
/// 1. Lowercase
/// 2. Unicode NFD decomposition to separate base characters from combining marks
/// 3. Strip combining marks (accents, diacritics)
/// 4. Drop anything that is not a letter, number or whitespace
/// 5. Collapse and trim whitespace
///
/// Returns `None` when nothing is left.
///
/// # Examples
/// ```
/// use eval_core::normalize;
///
/// assert_eq!(normalize("  Café, s'il vous plaît! "), Some("cafe sil vous plait".to_string()));
/// assert_eq!(normalize("?!"), None);
/// ```
pub fn normalize(input: &str) -> Option<String> {
    let cleaned = input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>();

    non_empty(cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Lowercase and trim only. Punctuation and diacritics are significant.
pub fn normalize_strict(input: &str) -> Option<String> {
    non_empty(input.to_lowercase().trim().to_string())
}

/// Lenient normalization of an optional JSON value.
///
/// `None` and `null` stay `None`. Numbers and booleans are stringified.
pub fn normalize_value(value: Option<&Value>) -> Option<String> {
    NormalizePolicy::Lenient.apply(value)
}

/// String form of a scalar-like JSON value, `None` for null or absent.
pub(crate) fn value_to_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
