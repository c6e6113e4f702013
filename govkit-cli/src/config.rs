//! Configuration parsing for govkit.yml

use govkit_proposal::ChainClock;
use govkit_types::{CannedResponse, DaoInfo, StaticQuerier};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("No DAO matches '{0}'")]
    UnknownDao(String),

    #[error("No DAOs configured")]
    NoDaos,

    #[error("Unknown {system} adapter in allow-list: {id}")]
    UnknownAdapter { system: &'static str, id: String },
}

/// Main configuration struct matching the govkit.yml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub adapters: AdapterAllowList,

    #[serde(default)]
    pub chain: ChainConfig,

    /// YAML file of canned chain responses
    #[serde(default)]
    pub fixtures: Option<PathBuf>,

    /// Canned chain responses inline
    #[serde(default)]
    pub responses: Vec<CannedResponse>,

    #[serde(default)]
    pub daos: Vec<DaoConfig>,

    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_logo")]
    pub logo: String,

    #[serde(default = "default_loader")]
    pub loader: String,
}

fn default_logo() -> String {
    String::from("*")
}

fn default_loader() -> String {
    String::from("...")
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            logo: default_logo(),
            loader: default_loader(),
        }
    }
}

/// Chain position used to estimate height-based expirations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Current block height. Defaults to the highest proposal start height seen.
    #[serde(default)]
    pub height: Option<u64>,

    #[serde(default = "default_block_seconds")]
    pub block_seconds: u64,
}

fn default_block_seconds() -> u64 {
    ChainClock::DEFAULT_BLOCK_SECONDS
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            height: None,
            block_seconds: default_block_seconds(),
        }
    }
}

/// Adapter ids to register per system. Missing means all builtins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdapterAllowList {
    #[serde(default)]
    pub proposal: Option<Vec<String>>,

    #[serde(default)]
    pub voting: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaoConfig {
    #[serde(flatten)]
    pub info: DaoInfo,

    /// Proposal ids shown in the inbox, e.g. `A3`
    #[serde(default)]
    pub proposals: Vec<String>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Resolve a path relative to the config file
    pub fn resolve_relative(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }

        match self.config_path.as_ref().and_then(|p| p.parent()) {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }

    /// Chain querier backed by the fixture file and inline responses
    pub fn querier(&self) -> Result<StaticQuerier, ConfigError> {
        let mut querier = match &self.fixtures {
            Some(path) => {
                let path = self.resolve_relative(path);
                let contents = std::fs::read_to_string(&path)?;
                serde_yaml::from_str(&contents)?
            }
            None => StaticQuerier::new(),
        };
        querier.extend(self.responses.iter().cloned());

        tracing::debug!(responses = querier.len(), "Loaded chain fixtures");
        Ok(querier)
    }

    /// Find a DAO by core address or name; the first DAO when `key` is `None`
    pub fn dao(&self, key: Option<&str>) -> Result<&DaoConfig, ConfigError> {
        match key {
            None => self.daos.first().ok_or(ConfigError::NoDaos),
            Some(key) => self
                .daos
                .iter()
                .find(|dao| dao.info.core_address == key || dao.info.name == key)
                .ok_or_else(|| ConfigError::UnknownDao(key.to_string())),
        }
    }

    /// DAOs to operate on: one if `key` is given, all otherwise
    pub fn select_daos(&self, key: Option<&str>) -> Result<Vec<&DaoConfig>, ConfigError> {
        match key {
            Some(_) => Ok(vec![self.dao(key)?]),
            None => Ok(self.daos.iter().collect()),
        }
    }
}
