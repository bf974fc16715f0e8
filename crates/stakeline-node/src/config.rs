//! Node configuration types
//!
//! ```toml
//! [staking]
//! reward_per_epoch = 100
//! epoch_duration = 86400
//! precision = 1000000000000000000
//! pool_account = "0101010101010101010101010101010101010101010101010101010101010101"
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```
//!
//! TOML integers are 64-bit; `reward_per_epoch` and `precision` are widened
//! to token amounts when the engine configuration is resolved.

use serde::{Deserialize, Serialize};
use stakeline_core::{AccountId, Amount, EpochClock};
use stakeline_economics::{
    EngineConfig, DEFAULT_EPOCH_DURATION_SECS, DEFAULT_PRECISION, DEFAULT_REWARD_PER_EPOCH,
};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Complete node configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Pool parameters
    #[serde(default)]
    pub staking: StakingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NodeConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.as_ref().display(), "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.staking.engine_config()?;
        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(ConfigError::Invalid(format!("unknown log format: {other}"))),
        }
    }
}

/// Pool parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Reward emitted per completed epoch
    #[serde(default = "default_reward_per_epoch")]
    pub reward_per_epoch: u64,

    /// Epoch length in seconds
    #[serde(default = "default_epoch_duration")]
    pub epoch_duration: u64,

    /// Epoch length in hours; takes precedence over `epoch_duration` when set
    #[serde(default)]
    pub epoch_duration_hours: Option<u64>,

    /// Fixed-point scale
    #[serde(default = "default_precision")]
    pub precision: u64,

    /// Pool ledger account (hex); derived from a fixed seed when absent
    #[serde(default)]
    pub pool_account: Option<String>,
}

fn default_reward_per_epoch() -> u64 {
    DEFAULT_REWARD_PER_EPOCH as u64
}

fn default_epoch_duration() -> u64 {
    DEFAULT_EPOCH_DURATION_SECS
}

fn default_precision() -> u64 {
    DEFAULT_PRECISION as u64
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            reward_per_epoch: default_reward_per_epoch(),
            epoch_duration: default_epoch_duration(),
            epoch_duration_hours: None,
            precision: default_precision(),
            pool_account: None,
        }
    }
}

impl StakingConfig {
    /// Resolve into validated engine parameters
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let epoch = match self.epoch_duration_hours {
            Some(hours) => EpochClock::from_hours(hours),
            None => EpochClock::new(self.epoch_duration),
        }
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let defaults = EngineConfig::default();
        let pool_account = match &self.pool_account {
            Some(hex) => AccountId::from_hex(hex).map_err(|e| ConfigError::Invalid(e.to_string()))?,
            None => defaults.pool_account,
        };

        let config = EngineConfig {
            reward_per_epoch: Amount::from(self.reward_per_epoch),
            epoch_duration: epoch.duration(),
            precision: Amount::from(self.precision),
            pool_account,
        };
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "text" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Color output
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            color: true,
        }
    }
}
