use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::Result;

/// Pipeline configuration, resolved in three layers: built-in defaults,
/// then an optional `config.toml`, then `SALES_ETL_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the source CSV extract
    pub source_path: PathBuf,
    /// Path of the staging database file
    pub db_path: PathBuf,
    /// Name of the staging table (schema-owned by the database)
    pub staging_table: String,
    /// Directory receiving fallback CSV snapshots when the load fails
    pub failed_dir: PathBuf,
    /// Directory receiving rejected-row snapshots from validation
    pub rejected_dir: PathBuf,
    /// Directory receiving the pipeline log file
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(constants::DEFAULT_SOURCE_PATH),
            db_path: PathBuf::from(constants::DEFAULT_DB_PATH),
            staging_table: constants::DEFAULT_STAGING_TABLE.to_string(),
            failed_dir: PathBuf::from(constants::DEFAULT_FAILED_DIR),
            rejected_dir: PathBuf::from(constants::DEFAULT_REJECTED_DIR),
            log_dir: PathBuf::from(constants::DEFAULT_LOG_DIR),
        }
    }
}

impl Config {
    /// Loads configuration from the given TOML file if it exists, falling
    /// back to defaults, then applies environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.unwrap_or_else(|| Path::new("config.toml"));
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SALES_ETL_SOURCE_PATH") {
            self.source_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SALES_ETL_DB_PATH") {
            self.db_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SALES_ETL_STAGING_TABLE") {
            self.staging_table = v;
        }
        if let Ok(v) = env::var("SALES_ETL_FAILED_DIR") {
            self.failed_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SALES_ETL_REJECTED_DIR") {
            self.rejected_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("SALES_ETL_LOG_DIR") {
            self.log_dir = PathBuf::from(v);
        }
    }

    /// File name of the source extract, stamped onto every transformed row
    /// for provenance.
    pub fn source_file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.to_string_lossy().into_owned())
    }
}
