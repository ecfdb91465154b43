//! Text tokenization for the diff engine.

use serde::{Deserialize, Serialize};

use crate::{
    diff::{DiffChunk, diff},
    error::DiffError,
};

/// Default per side token cap for [`diff_text`].
pub const DEFAULT_MAX_TOKENS: usize = 2000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMode {
    /// Whitespace separated words
    #[default]
    Word,
    /// Single Unicode scalar values
    Char,
}

/// Bounds on diff input. The diff is quadratic so both sides are capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLimits {
    pub max_tokens: usize,
}

impl Default for DiffLimits {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

pub fn tokenize(text: &str, mode: TokenMode) -> Vec<String> {
    match mode {
        TokenMode::Word => text.split_whitespace().map(str::to_string).collect(),
        TokenMode::Char => text.chars().map(String::from).collect(),
    }
}

/// Tokenize both texts and diff them.
///
/// Returns [`DiffError::InputTooLarge`] when either side has more tokens
/// than `limits.max_tokens`.
pub fn diff_text(
    original: &str,
    revised: &str,
    mode: TokenMode,
    limits: DiffLimits,
) -> Result<Vec<DiffChunk<String>>, DiffError> {
    let original = tokenize(original, mode);
    let revised = tokenize(revised, mode);

    for (side, tokens) in [("original", &original), ("revised", &revised)] {
        if tokens.len() > limits.max_tokens {
            tracing::warn!(
                side,
                tokens = tokens.len(),
                max = limits.max_tokens,
                "Diff input over the token limit"
            );
            return Err(DiffError::InputTooLarge {
                side,
                len: tokens.len(),
                max: limits.max_tokens,
            });
        }
    }

    let chunks = diff(&original, &revised);
    tracing::debug!(?mode, chunks = chunks.len(), "Computed text diff");
    Ok(chunks)
}
