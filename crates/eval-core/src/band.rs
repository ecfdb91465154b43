//! Raw score to band conversion.
//!
//! The conversion is driven entirely by a [`BandTable`], so the calibration
//! can be swapped (for instance from a JSON file) without touching grading.

use serde::{Deserialize, Serialize};

use crate::error::BandTableError;

/// Raw marks of the reference paper the default table is expressed in.
pub const DEFAULT_SCALE: u32 = 40;

/// Default conversion on a 40 mark paper, `(minimum raw marks, band)`.
///
/// * 39-40: 9.0
/// * 37-38: 8.5
/// * 35-36: 8.0
/// * 33-34: 7.5
/// * 30-32: 7.0
/// * 27-29: 6.5
/// * 23-26: 6.0
/// * 19-22: 5.5
/// * 15-18: 5.0
/// * 13-14: 4.5
/// * 10-12: 4.0
/// * 8-9: 3.5
/// * 6-7: 3.0
/// * 4-5: 2.5
/// * 2-3: 2.0
/// * 1: 1.0
/// * 0: 0.0
const DEFAULT_ROWS: &[(u32, f64)] = &[
    (0, 0.0),
    (1, 1.0),
    (2, 2.0),
    (4, 2.5),
    (6, 3.0),
    (8, 3.5),
    (10, 4.0),
    (13, 4.5),
    (15, 5.0),
    (19, 5.5),
    (23, 6.0),
    (27, 6.5),
    (30, 7.0),
    (33, 7.5),
    (35, 8.0),
    (37, 8.5),
    (39, 9.0),
];

/// One row of a band table: at least `threshold` marks on the table's scale earns `band`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRow {
    pub threshold: u32,
    pub band: f64,
}

/// A monotonic lookup from raw marks on a reference scale to a band.
///
/// Scores out of any other total are rescaled onto `scale` before lookup,
/// so the same proportion always lands on the same row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BandTableDef")]
pub struct BandTable {
    scale: u32,
    rows: Vec<BandRow>,
}

#[derive(Deserialize)]
struct BandTableDef {
    #[serde(default = "default_scale")]
    scale: u32,
    rows: Vec<BandRow>,
}

const fn default_scale() -> u32 {
    DEFAULT_SCALE
}

impl TryFrom<BandTableDef> for BandTable {
    type Error = BandTableError;

    fn try_from(def: BandTableDef) -> Result<Self, Self::Error> {
        Self::new(def.scale, def.rows)
    }
}

impl BandTable {
    /// Build a table, checking that it is non-empty and monotonic.
    pub fn new(scale: u32, rows: Vec<BandRow>) -> Result<Self, BandTableError> {
        if scale == 0 {
            return Err(BandTableError::ZeroScale);
        }
        if rows.is_empty() {
            return Err(BandTableError::Empty);
        }

        for (index, row) in rows.iter().enumerate() {
            if !row.band.is_finite() {
                return Err(BandTableError::DecreasingBand {
                    index,
                    band: row.band,
                });
            }
            if index == 0 {
                continue;
            }
            let prev = rows[index - 1];
            if row.threshold <= prev.threshold {
                return Err(BandTableError::UnorderedThreshold {
                    index,
                    threshold: row.threshold,
                });
            }
            if row.band < prev.band {
                return Err(BandTableError::DecreasingBand {
                    index,
                    band: row.band,
                });
            }
        }

        Ok(Self { scale, rows })
    }

    /// Parse a table from its JSON form, `{"scale": 40, "rows": [{"threshold": 0, "band": 0.0}, ...]}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn rows(&self) -> &[BandRow] {
        &self.rows
    }

    /// The lowest band on the table.
    pub fn floor(&self) -> f64 {
        self.rows[0].band
    }

    /// Convert `correct` out of `total` to a band.
    ///
    /// A zero total gives the floor band and `correct` is clamped to `total`.
    pub fn band_for(&self, correct: u32, total: u32) -> f64 {
        if total == 0 {
            return self.floor();
        }
        let correct = u64::from(correct.min(total));
        let total = u64::from(total);
        let scale = u64::from(self.scale);

        // threshold / scale <= correct / total, kept in integers
        self.rows
            .iter()
            .rev()
            .find(|row| u64::from(row.threshold) * total <= correct * scale)
            .map_or_else(|| self.floor(), |row| row.band)
    }
}

impl Default for BandTable {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            rows: DEFAULT_ROWS
                .iter()
                .map(|&(threshold, band)| BandRow { threshold, band })
                .collect(),
        }
    }
}

/// Convert a raw correct count to a band using the default table.
///
/// # Arguments
///
/// * `correct_count` - Number of correctly answered questions
/// * `total` - Number of questions graded
///
/// # Returns
///
/// The band as an `f64`, the floor band when `total` is zero
pub fn band_from_raw(correct_count: u32, total: u32) -> f64 {
    BandTable::default().band_for(correct_count, total)
}
