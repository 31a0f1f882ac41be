//! Configuration management

use listings_common::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::db::DbConfig;

/// Default location of the listings export.
pub const DEFAULT_CSV_PATH: &str = "./data/listings.csv";

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// CSV file to extract from
    pub csv_path: PathBuf,
    pub database: DbConfig,
}

impl EtlConfig {
    /// Read `LISTINGS_CSV_PATH` and the database settings from the environment.
    ///
    /// Callers load `.env` first (see `main`), so values there apply too.
    pub fn from_env() -> Result<Self> {
        let config = EtlConfig {
            csv_path: std::env::var("LISTINGS_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CSV_PATH)),
            database: DbConfig::from_env().map_err(|e| EtlError::config(e.to_string()))?,
        };

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.csv_path.as_os_str().is_empty() {
            return Err(EtlError::config("LISTINGS_CSV_PATH cannot be empty"));
        }

        self.database
            .validate()
            .map_err(|e| EtlError::config(e.to_string()))
    }
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            database: DbConfig::default(),
        }
    }
}
