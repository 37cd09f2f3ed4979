//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! environment variables, then command-line flags (applied by the caller
//! through the `with_*` builders).

use crate::constants::{
    APP_DIR_NAME, DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_FILE, DEFAULT_RECENT_YEARS, env,
};
use crate::error::{Result, VitiError};
use crate::models::DedupStrategy;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supported compression algorithms for parquet exports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    #[default]
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file holding the normalized tables
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let dir = dirs::data_dir()
            .map(|d| d.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: dir.join(DEFAULT_DATABASE_FILE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// How the persistence gate recognises stored rows
    pub dedup_strategy: DedupStrategy,

    /// Keep processing the batch when a file fails
    pub continue_on_error: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            dedup_strategy: DedupStrategy::ExactRow,
            continue_on_error: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Years before the latest stored one included in dashboard exports
    pub recent_years: i32,

    pub compression: CompressionAlgorithm,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            recent_years: DEFAULT_RECENT_YEARS,
            compression: CompressionAlgorithm::Snappy,
        }
    }
}

/// Global configuration for Vitibrasil processing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitiConfig {
    pub database: DatabaseConfig,
    pub ingest: IngestConfig,
    pub export: ExportConfig,
}

impl VitiConfig {
    /// `<config_dir>/vitibrasil-processor/config.toml`, when a config dir exists
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(DEFAULT_CONFIG_FILE))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| VitiError::configuration(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VitiError::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults, overlaid with the config file and the process environment
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(VitiError::InputNotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::from_file(path)?
            }
            None => match Self::default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!("Loading configuration from {}", path.display());
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };

        config.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(env::DB_PATH) {
            debug!("{} overrides database path", env::DB_PATH);
            self.database.path = PathBuf::from(path);
        }
        if let Some(strategy) = lookup(env::DEDUP) {
            self.ingest.dedup_strategy = strategy.parse()?;
        }
        Ok(())
    }

    pub fn with_database_path(mut self, path: PathBuf) -> Self {
        self.database.path = path;
        self
    }

    pub fn with_dedup_strategy(mut self, strategy: DedupStrategy) -> Self {
        self.ingest.dedup_strategy = strategy;
        self
    }

    /// Abort the batch on the first failing file
    pub fn with_fail_fast(mut self) -> Self {
        self.ingest.continue_on_error = false;
        self
    }

    pub fn with_recent_years(mut self, years: i32) -> Self {
        self.export.recent_years = years;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.path.as_os_str().is_empty() {
            return Err(VitiError::configuration("database path must not be empty"));
        }
        if self.export.recent_years <= 0 {
            return Err(VitiError::configuration(format!(
                "recent_years must be positive, got {}",
                self.export.recent_years
            )));
        }
        Ok(())
    }
}
