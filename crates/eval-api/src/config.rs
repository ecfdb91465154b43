use std::{fs, path::PathBuf};

use eval_core::{BandTable, tokenize::DEFAULT_MAX_TOKENS};
use serde::Deserialize;

use crate::error::ConfigError;

/// Prefix of every environment variable read by [`ApiConfig::from_env`].
pub const ENV_PREFIX: &str = "EVAL_";

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per side token cap for `/v1/diff`
    #[serde(default = "default_max_diff_tokens")]
    pub max_diff_tokens: usize,
    /// JSON file holding a calibrated band table. The built-in table is used when unset.
    pub band_table_path: Option<PathBuf>,
    /// Comma separated list of allowed CORS origins
    pub allowed_origins: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_diff_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            env: Environment::default(),
            host: default_host(),
            port: default_port(),
            max_diff_tokens: default_max_diff_tokens(),
            band_table_path: None,
            allowed_origins: None,
        }
    }
}

impl ApiConfig {
    /// Read `EVAL_*` variables, e.g. `EVAL_PORT=8080` or `EVAL_ENV=production`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`ApiConfig::from_env`] over an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .unwrap_or("http://localhost:8080")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Load the band table from `band_table_path`, or fall back to the default.
    pub fn load_band_table(&self) -> Result<BandTable, ConfigError> {
        let Some(path) = &self.band_table_path else {
            return Ok(BandTable::default());
        };

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::BandTableRead {
            path: path.clone(),
            source,
        })?;
        BandTable::from_json(&raw).map_err(|source| ConfigError::BandTableParse {
            path: path.clone(),
            source,
        })
    }
}
