//! # Reward Accumulator
//!
//! Advances the global reward-per-staked-unit total ("TPS") by the reward of
//! each newly completed epoch.
//!
//! ```text
//! TPS' = TPS + epochs * reward_per_epoch * precision / total_staked
//! ```
//!
//! Division floors. The truncated fraction is never distributed; it is bounded
//! by `epochs / precision` reward units per staked unit.

use crate::error::{Result, StakingError};
use stakeline_core::{to_fixed, Amount, Fixed};

/// Reward-per-unit increment for `epochs` epochs at the given stake size.
///
/// Returns zero when nothing was staked: those epochs have no one to pay.
pub fn epoch_increment(
    epochs: u64,
    total_staked: Amount,
    reward_per_epoch: Amount,
    precision: Amount,
) -> Result<Fixed> {
    if epochs == 0 || total_staked == 0 {
        return Ok(Fixed::zero());
    }

    let emitted = Fixed::from(epochs)
        .checked_mul(to_fixed(reward_per_epoch))
        .and_then(|v| v.checked_mul(to_fixed(precision)))
        .ok_or(StakingError::Overflow)?;

    Ok(emitted / to_fixed(total_staked))
}

/// Advance the accumulator past `epochs` completed epochs.
pub fn advance(
    current: Fixed,
    epochs: u64,
    total_staked: Amount,
    reward_per_epoch: Amount,
    precision: Amount,
) -> Result<Fixed> {
    let increment = epoch_increment(epochs, total_staked, reward_per_epoch, precision)?;
    current
        .checked_add(increment)
        .ok_or(StakingError::Overflow)
}
