//! # Participant Ledger & Settlement
//!
//! Each participant carries a checkpoint of the accumulator priced at their
//! current stake size (`reward_debt`, a.k.a. "missed"). Settlement converts
//! accumulator growth since that checkpoint into reward and re-checkpoints.
//!
//! Settled reward is held at full fixed-point scale in `accrued`; only the
//! whole-unit part is claimable and the sub-unit fraction carries over.

use crate::error::{Result, StakingError};
use serde::{Deserialize, Serialize};
use stakeline_core::{to_amount, to_fixed, Amount, Fixed};

/// Per-account staking record; created on first stake and never removed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Currently staked amount
    pub staked: Amount,

    /// `staked * TPS` at the last settlement
    pub reward_debt: Fixed,

    /// Settled, unclaimed reward scaled by the pool precision
    pub accrued: Fixed,

    /// Lifetime claimed reward
    pub total_claimed: Amount,
}

impl Participant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the current stake against the accumulator, `staked * tps`
    fn priced(&self, tps: Fixed) -> Result<Fixed> {
        to_fixed(self.staked)
            .checked_mul(tps)
            .ok_or(StakingError::Overflow)
    }

    /// Fold accumulator growth since the last checkpoint into `accrued`.
    ///
    /// Returns the newly settled amount at fixed-point scale. Calling twice
    /// at the same `tps` settles zero the second time.
    pub fn settle(&mut self, tps: Fixed) -> Result<Fixed> {
        let priced = self.priced(tps)?;
        let pending = priced
            .checked_sub(self.reward_debt)
            .ok_or(StakingError::Overflow)?;

        self.accrued = self
            .accrued
            .checked_add(pending)
            .ok_or(StakingError::Overflow)?;
        self.reward_debt = priced;
        Ok(pending)
    }

    /// Re-price the checkpoint after `staked` changed
    pub fn checkpoint(&mut self, tps: Fixed) -> Result<()> {
        self.reward_debt = self.priced(tps)?;
        Ok(())
    }

    /// Claimable whole units, `accrued / precision`
    pub fn available(&self, precision: Amount) -> Result<Amount> {
        if precision == 0 {
            return Ok(0);
        }
        to_amount(self.accrued / to_fixed(precision)).ok_or(StakingError::Overflow)
    }

    /// Remove the claimable whole units from `accrued`, keeping the fraction
    pub fn take_available(&mut self, precision: Amount) -> Result<Amount> {
        let payout = self.available(precision)?;
        let spent = to_fixed(payout)
            .checked_mul(to_fixed(precision))
            .ok_or(StakingError::Overflow)?;

        self.accrued = self
            .accrued
            .checked_sub(spent)
            .ok_or(StakingError::Overflow)?;
        self.total_claimed = self
            .total_claimed
            .checked_add(payout)
            .ok_or(StakingError::Overflow)?;
        Ok(payout)
    }

    pub fn add_stake(&mut self, amount: Amount) -> Result<()> {
        self.staked = self
            .staked
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        Ok(())
    }

    pub fn remove_stake(&mut self, amount: Amount) -> Result<()> {
        if amount > self.staked {
            return Err(StakingError::InsufficientStake {
                requested: amount,
                staked: self.staked,
            });
        }
        self.staked -= amount;
        Ok(())
    }
}
