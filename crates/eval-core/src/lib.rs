//! Deterministic answer evaluation for Matcha Time
//!
//! This crate grades learner answers without calling out to an AI provider.
//! It bundles four independent pieces:
//!
//! * [`normalize`] - text canonicalization used for every comparison
//! * [`grade`] - per-kind matching of answers against a question key
//! * [`band`] - raw score to proficiency band conversion
//! * [`diff`] - LCS based alignment of two token sequences
//!
//! Everything here is pure and synchronous. Nothing is cached between calls.

pub mod attempt;
pub mod band;
pub mod diff;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod question;
pub mod tokenize;

pub use attempt::AttemptSummary;
pub use band::{BandRow, BandTable, band_from_raw};
pub use diff::{DiffChunk, DiffOp, DiffStats, diff, reconstruct_original, reconstruct_revised};
pub use error::{BandTableError, DiffError};
pub use matcher::{
    AnswerMap, Expected, GradeOptions, GradeResult, KindBreakdown, ScoreItem, grade, grade_with,
};
pub use normalize::{NormalizePolicy, normalize, normalize_strict, normalize_value};
pub use question::{
    QuestionKind, QuestionRecord, QuestionSpec, RATIONALE_SOURCES, RationaleSource, UNKNOWN_KIND,
};
pub use tokenize::{DiffLimits, TokenMode, diff_text, tokenize};
