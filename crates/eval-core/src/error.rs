//! Error types of the evaluation core.
//!
//! Grading itself never fails. Only building a band table and diffing
//! oversized input can.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BandTableError {
    #[error("Band table must contain at least one row")]
    Empty,
    #[error("Band table scale must be greater than zero")]
    ZeroScale,
    #[error("Thresholds must be strictly increasing (row {index}: {threshold})")]
    UnorderedThreshold { index: usize, threshold: u32 },
    #[error("Bands must be finite and non-decreasing (row {index}: {band})")]
    DecreasingBand { index: usize, band: f64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("{side} text has {len} tokens, the limit is {max}")]
    InputTooLarge {
        side: &'static str,
        len: usize,
        max: usize,
    },
}
