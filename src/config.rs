//! Configuration Module
//! TOML settings for fixture generation and output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartifyConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Shape and seed of the generated fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_people")]
    pub people: usize,
    #[serde(default = "default_allocations")]
    pub allocations: usize,
    /// Calendar year the allocations and monthly metrics cover.
    #[serde(default = "default_year")]
    pub year: i32,
    /// Stands in for "now": joining dates are drawn before it.
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            people: default_people(),
            allocations: default_allocations(),
            year: default_year(),
            reference_date: default_reference_date(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_people() -> usize {
    1000
}

fn default_allocations() -> usize {
    1150
}

fn default_year() -> i32 {
    2023
}

fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn default_pretty() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl ChartifyConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
