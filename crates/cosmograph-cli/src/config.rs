//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use cosmograph_extractor::{LlmExtractorConfig, StrategyKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration, read from `~/.cosmograph/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default extractor
    #[serde(default = "default_extractor")]
    pub extractor: String,

    /// Default occurrence threshold for the generic extractor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_occurrences: Option<usize>,

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Language-model extraction settings
    #[serde(default)]
    pub llm: LlmExtractorConfig,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".cosmograph").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if it is absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configured values are usable.
    pub fn validate(&self) -> Result<()> {
        self.extractor.parse::<StrategyKind>()?;
        if self.min_occurrences == Some(0) {
            return Err(CliError::Config("min_occurrences must be at least 1".into()));
        }
        self.llm.validate().map_err(CliError::Config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extractor: default_extractor(),
            min_occurrences: None,
            color: true,
            llm: LlmExtractorConfig::default(),
        }
    }
}

fn default_extractor() -> String {
    StrategyKind::Auto.to_string()
}

fn default_true() -> bool {
    true
}
