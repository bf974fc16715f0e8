//! # Stakeline Node
//!
//! Hosts a staking engine behind a lock, loads TOML configuration and
//! installs the tracing subscriber.

pub mod config;
pub mod node;
pub mod telemetry;

pub use config::{ConfigError, LoggingConfig, NodeConfig, StakingConfig};
pub use node::{NodeError, StakingNode};
pub use telemetry::init_logging;
