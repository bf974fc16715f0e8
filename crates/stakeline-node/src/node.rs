//! Stakeline node
//!
//! Owns one staking engine and serializes every call through a mutex, so
//! operations apply strictly one after another.

use crate::config::{ConfigError, NodeConfig};
use parking_lot::Mutex;
use stakeline_core::{AccountId, Amount, SystemClock, TimeSource};
use stakeline_economics::{
    ParticipantInfo, Result as StakingResult, StakingEngine, StakingError, StakingEvent,
    StakingInfo,
};
use stakeline_ledger::TokenLedger;
use std::sync::Arc;
use thiserror::Error;

/// Node startup errors
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to start staking engine: {0}")]
    Engine(#[from] StakingError),
}

/// Hosted staking engine
pub struct StakingNode {
    config: NodeConfig,
    engine: Mutex<StakingEngine>,
}

impl StakingNode {
    /// Create a node with an explicit time source
    pub fn new(
        config: NodeConfig,
        ledger: Arc<dyn TokenLedger>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, NodeError> {
        let engine_config = config.staking.engine_config()?;
        let engine = StakingEngine::new(engine_config, ledger, clock)?;

        tracing::info!(pool_account = %engine.pool_account(), "staking node started");

        Ok(Self {
            config,
            engine: Mutex::new(engine),
        })
    }

    /// Create a node driven by wall-clock time
    pub fn with_system_clock(
        config: NodeConfig,
        ledger: Arc<dyn TokenLedger>,
    ) -> Result<Self, NodeError> {
        Self::new(config, ledger, Arc::new(SystemClock))
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn pool_account(&self) -> AccountId {
        *self.engine.lock().pool_account()
    }

    pub fn stake(&self, account: &AccountId, amount: Amount) -> StakingResult<StakingEvent> {
        self.engine.lock().stake(account, amount)
    }

    pub fn unstake(&self, account: &AccountId, amount: Amount) -> StakingResult<StakingEvent> {
        self.engine.lock().unstake(account, amount)
    }

    pub fn claim(&self, account: &AccountId) -> StakingResult<StakingEvent> {
        self.engine.lock().claim(account)
    }

    pub fn participant_info(&self, account: &AccountId) -> StakingResult<ParticipantInfo> {
        self.engine.lock().participant_info(account)
    }

    pub fn staking_info(&self) -> StakingResult<StakingInfo> {
        self.engine.lock().staking_info()
    }

    pub fn rewards(&self, account: &AccountId) -> StakingResult<Amount> {
        self.engine.lock().rewards(account)
    }

    /// Snapshot of the event log
    pub fn events(&self) -> Vec<StakingEvent> {
        self.engine.lock().events().to_vec()
    }

    /// Retained events with a sequence number at or after `from`
    pub fn events_since(&self, from: u64) -> Vec<StakingEvent> {
        self.engine.lock().events_since(from).to_vec()
    }

    /// Drop retained events before sequence `before`; returns how many went
    pub fn prune_events(&self, before: u64) -> usize {
        let removed = self.engine.lock().prune_events(before);
        tracing::debug!(before, removed, "staking events pruned");
        removed
    }
}
