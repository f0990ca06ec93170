//! Configuration loaded from TOML
//!
//! Every field has a default, so an absent file or a partial one is fine.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::keywords::Keywords;

/// Largest gap, in grams, between the summed weights and the declared total
/// that is not reported as a mismatch.
pub const DEFAULT_MISMATCH_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mismatch_tolerance_grams: f64,
    pub keywords: Keywords,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database used as the primary store
    pub database: PathBuf,
    /// JSON file mirroring the database, used when it is unavailable
    pub fallback: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mismatch_tolerance_grams: DEFAULT_MISMATCH_TOLERANCE,
            keywords: Keywords::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            database: PathBuf::from("recipes.db"),
            fallback: PathBuf::from("recipes.json"),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml(&content)
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Config::default()),
        }
    }
}
