use eval_core::{BandTable, DiffLimits, GradeOptions, NormalizePolicy};

use crate::{ApiConfig, config::Environment, error::ConfigError};

/// Shared, read-only state of the API. Grading keeps nothing between requests.
#[derive(Clone, Debug)]
pub struct ApiState {
    pub band_table: BandTable,
    pub diff_limits: DiffLimits,
    pub environment: Environment,
}

impl ApiState {
    pub fn new(config: &ApiConfig) -> Result<Self, ConfigError> {
        let band_table = config.load_band_table()?;

        if config.band_table_path.is_some() {
            tracing::info!(
                rows = band_table.rows().len(),
                scale = band_table.scale(),
                "Loaded band table from file"
            );
        }

        Ok(Self {
            band_table,
            diff_limits: DiffLimits {
                max_tokens: config.max_diff_tokens,
            },
            environment: config.env.clone(),
        })
    }

    pub fn grade_options(&self, policy: NormalizePolicy) -> GradeOptions {
        GradeOptions {
            policy,
            band_table: self.band_table.clone(),
        }
    }
}
