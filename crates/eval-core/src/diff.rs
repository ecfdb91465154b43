//! Sequence diff based on the longest common subsequence.
//!
//! Used to show a learner what changed between two drafts of an answer.
//! Time and memory are `O(m * n)`, which is fine for sentences and short
//! answers. Callers must cap input size (see [`crate::tokenize::DiffLimits`]).

use serde::{Deserialize, Serialize};

/// Kind of edit a chunk represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffOp {
    /// Token kept
    Equal,
    /// Token added in the revision
    Insert,
    /// Token removed from the original
    Delete,
}

/// A maximal run of tokens sharing one edit kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "tokens", rename_all = "lowercase")]
pub enum DiffChunk<T> {
    /// Present in both sequences
    Equal(Vec<T>),
    /// Only in the revised sequence
    Insert(Vec<T>),
    /// Only in the original sequence
    Delete(Vec<T>),
}

impl<T> DiffChunk<T> {
    pub fn op(&self) -> DiffOp {
        match self {
            Self::Equal(_) => DiffOp::Equal,
            Self::Insert(_) => DiffOp::Insert,
            Self::Delete(_) => DiffOp::Delete,
        }
    }

    pub fn tokens(&self) -> &[T] {
        match self {
            Self::Equal(tokens) | Self::Insert(tokens) | Self::Delete(tokens) => tokens,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }

    fn new(op: DiffOp, tokens: Vec<T>) -> Self {
        match op {
            DiffOp::Equal => Self::Equal(tokens),
            DiffOp::Insert => Self::Insert(tokens),
            DiffOp::Delete => Self::Delete(tokens),
        }
    }

    fn tokens_mut(&mut self) -> &mut Vec<T> {
        match self {
            Self::Equal(tokens) | Self::Insert(tokens) | Self::Delete(tokens) => tokens,
        }
    }
}

/// Token counts per edit kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub equal: usize,
    pub inserted: usize,
    pub deleted: usize,
}

impl DiffStats {
    pub fn from_chunks<T>(chunks: &[DiffChunk<T>]) -> Self {
        chunks.iter().fold(Self::default(), |mut stats, chunk| {
            match chunk.op() {
                DiffOp::Equal => stats.equal += chunk.len(),
                DiffOp::Insert => stats.inserted += chunk.len(),
                DiffOp::Delete => stats.deleted += chunk.len(),
            }
            stats
        })
    }
}

/// Align `original` and `revised` into equal / insert / delete runs.
///
/// When both a deletion and an insertion keep the alignment optimal the
/// deletion is taken first, so output is deterministic.
///
/// # Examples
/// ```
/// use eval_core::{DiffChunk, diff};
///
/// let chunks = diff(&["a", "b", "c"], &["a", "x", "c"]);
/// assert_eq!(
///     chunks,
///     vec![
///         DiffChunk::Equal(vec!["a"]),
///         DiffChunk::Delete(vec!["b"]),
///         DiffChunk::Insert(vec!["x"]),
///         DiffChunk::Equal(vec!["c"]),
///     ]
/// );
/// ```
pub fn diff<T: PartialEq + Clone>(original: &[T], revised: &[T]) -> Vec<DiffChunk<T>> {
    let m = original.len();
    let n = revised.len();
    let width = n + 1;

    // lcs[i * width + j] is the LCS length of original[i..] and revised[j..]
    let mut lcs = vec![0usize; (m + 1) * width];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            lcs[i * width + j] = if original[i] == revised[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let mut chunks = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < m && j < n {
        if original[i] == revised[j] {
            push(&mut chunks, DiffOp::Equal, &original[i]);
            i += 1;
            j += 1;
        } else if lcs[(i + 1) * width + j] >= lcs[i * width + j + 1] {
            push(&mut chunks, DiffOp::Delete, &original[i]);
            i += 1;
        } else {
            push(&mut chunks, DiffOp::Insert, &revised[j]);
            j += 1;
        }
    }

    for token in &original[i..] {
        push(&mut chunks, DiffOp::Delete, token);
    }
    for token in &revised[j..] {
        push(&mut chunks, DiffOp::Insert, token);
    }

    chunks
}

/// Append `token`, extending the last chunk when it has the same kind.
fn push<T: Clone>(chunks: &mut Vec<DiffChunk<T>>, op: DiffOp, token: &T) {
    match chunks.last_mut() {
        Some(last) if last.op() == op => last.tokens_mut().push(token.clone()),
        _ => chunks.push(DiffChunk::new(op, vec![token.clone()])),
    }
}

/// Rebuild the original sequence from equal and delete chunks.
pub fn reconstruct_original<T: Clone>(chunks: &[DiffChunk<T>]) -> Vec<T> {
    collect(chunks, DiffOp::Delete)
}

/// Rebuild the revised sequence from equal and insert chunks.
pub fn reconstruct_revised<T: Clone>(chunks: &[DiffChunk<T>]) -> Vec<T> {
    collect(chunks, DiffOp::Insert)
}

fn collect<T: Clone>(chunks: &[DiffChunk<T>], side: DiffOp) -> Vec<T> {
    chunks
        .iter()
        .filter(|chunk| chunk.op() == DiffOp::Equal || chunk.op() == side)
        .flat_map(|chunk| chunk.tokens().iter().cloned())
        .collect()
}
