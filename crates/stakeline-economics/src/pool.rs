//! Pool state
//!
//! The pool owns the configured emission constants and the accumulator
//! checkpoint. It is a plain value: the engine keeps the committed copy and
//! works on clones, so an aborted operation never leaves a half-advanced pool
//! behind.

use crate::accumulator;
use crate::error::{Result, StakingError};
use serde::{Deserialize, Serialize};
use stakeline_core::{elapsed_epochs, Amount, EpochAdvance, Fixed};

/// Shared reward pool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    /// Sum of all participant stakes
    pub total_staked: Amount,

    /// Reward per staked unit, scaled by `precision` (TPS)
    pub accumulated_reward_per_unit: Fixed,

    /// Last epoch boundary the accumulator was advanced to
    pub last_update_time: u64,

    /// Reward emitted per completed epoch
    pub reward_per_epoch: Amount,

    /// Epoch length in seconds
    pub epoch_duration: u64,

    /// Fixed-point scale
    pub precision: Amount,

    /// Reward made distributable so far
    pub total_emitted: Amount,

    /// Epochs that elapsed with nothing staked
    pub skipped_epochs: u64,
}

impl Pool {
    /// Create a pool with a zeroed accumulator starting at `start_time`
    pub fn new(
        reward_per_epoch: Amount,
        epoch_duration: u64,
        precision: Amount,
        start_time: u64,
    ) -> Self {
        Self {
            total_staked: 0,
            accumulated_reward_per_unit: Fixed::zero(),
            last_update_time: start_time,
            reward_per_epoch,
            epoch_duration,
            precision,
            total_emitted: 0,
            skipped_epochs: 0,
        }
    }

    /// Bring the accumulator up to date with `now`.
    ///
    /// Consumes every completed epoch, including those with zero stake, and
    /// keeps the sub-epoch remainder for the next call.
    pub fn sync(&mut self, now: u64) -> Result<EpochAdvance> {
        let elapsed = elapsed_epochs(now, self.last_update_time, self.epoch_duration);
        if elapsed.is_empty() {
            return Ok(elapsed);
        }

        if self.total_staked == 0 {
            self.skipped_epochs = self.skipped_epochs.saturating_add(elapsed.epochs);
            tracing::debug!(
                epochs = elapsed.epochs,
                skipped_total = self.skipped_epochs,
                "epochs elapsed with empty pool"
            );
        } else {
            let tps = accumulator::advance(
                self.accumulated_reward_per_unit,
                elapsed.epochs,
                self.total_staked,
                self.reward_per_epoch,
                self.precision,
            )?;
            let emitted = (elapsed.epochs as u128)
                .checked_mul(self.reward_per_epoch)
                .and_then(|v| v.checked_add(self.total_emitted))
                .ok_or(StakingError::Overflow)?;

            self.accumulated_reward_per_unit = tps;
            self.total_emitted = emitted;
            tracing::debug!(
                epochs = elapsed.epochs,
                total_staked = self.total_staked,
                tps = %tps,
                "accumulator advanced"
            );
        }

        self.last_update_time = elapsed.new_last_update(self.last_update_time);
        Ok(elapsed)
    }

    pub fn add_stake(&mut self, amount: Amount) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        Ok(())
    }

    pub fn remove_stake(&mut self, amount: Amount) -> Result<()> {
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .ok_or(StakingError::Overflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    const DAY: u64 = DEFAULT_EPOCH_DURATION_SECS;

    fn pool() -> Pool {
        Pool::new(DEFAULT_REWARD_PER_EPOCH, DAY, DEFAULT_PRECISION, 1_000)
    }

    #[test]
    fn test_sync_within_epoch() {
        let mut pool = pool();
        pool.add_stake(1000).unwrap();

        let advance = pool.sync(1_000 + DAY - 1).unwrap();

        assert_eq!(advance.epochs, 0);
        assert_eq!(pool.last_update_time, 1_000);
        assert_eq!(pool.accumulated_reward_per_unit, Fixed::zero());
    }

    #[test]
    fn test_sync_keeps_remainder() {
        let mut pool = pool();
        pool.add_stake(1000).unwrap();

        pool.sync(1_000 + DAY + 500).unwrap();

        assert_eq!(pool.last_update_time, 1_000 + DAY);
        assert_eq!(pool.accumulated_reward_per_unit, Fixed::from(100_000_000_000_000_000u128));
        assert_eq!(pool.total_emitted, 100);
    }

    #[test]
    fn test_empty_pool_epochs_are_consumed() {
        let mut pool = pool();

        pool.sync(1_000 + 3 * DAY).unwrap();
        assert_eq!(pool.skipped_epochs, 3);
        assert_eq!(pool.last_update_time, 1_000 + 3 * DAY);
        assert_eq!(pool.accumulated_reward_per_unit, Fixed::zero());

        // Staking afterwards must not replay the skipped epochs
        pool.add_stake(1000).unwrap();
        pool.sync(1_000 + 3 * DAY + 10).unwrap();
        assert_eq!(pool.accumulated_reward_per_unit, Fixed::zero());
        assert_eq!(pool.total_emitted, 0);
    }

    #[test]
    fn test_remove_more_than_staked() {
        let mut pool = pool();
        pool.add_stake(10).unwrap();
        assert_eq!(pool.remove_stake(11), Err(StakingError::Overflow));
        assert_eq!(pool.total_staked, 10);
    }
}
