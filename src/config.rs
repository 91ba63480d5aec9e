use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::query::DEFAULT_ROW_LIMIT;

pub const ENV_DB: &str = "ADAS_FINDER_DB";
pub const ENV_LIMIT: &str = "ADAS_FINDER_LIMIT";
pub const ENV_EXPORT_DIR: &str = "ADAS_FINDER_EXPORT_DIR";

const MAX_ROW_LIMIT: u32 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Database opened on startup, if any.
    pub database: Option<PathBuf>,
    pub row_limit: u32,
    /// Directory pre-selected by the export file pickers.
    pub export_dir: Option<PathBuf>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self { database: None, row_limit: DEFAULT_ROW_LIMIT, export_dir: None }
    }
}

impl FinderConfig {
    /// Defaults overlaid with `ADAS_FINDER_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(db) = lookup(ENV_DB).filter(|s| !s.trim().is_empty()) {
            cfg.database = Some(PathBuf::from(db.trim()));
        }
        if let Some(raw) = lookup(ENV_LIMIT) {
            cfg.row_limit = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv { key: ENV_LIMIT, value: raw.clone() })?;
        }
        if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|s| !s.trim().is_empty()) {
            cfg.export_dir = Some(PathBuf::from(dir.trim()));
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.row_limit == 0 || self.row_limit > MAX_ROW_LIMIT {
            return Err(ConfigError::RowLimitOutOfRange(self.row_limit));
        }
        if let Some(db) = &self.database {
            if db.as_os_str().is_empty() {
                return Err(ConfigError::MissingField("database"));
            }
        }
        Ok(())
    }
}
