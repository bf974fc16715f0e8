//! # Stakeline Economics - Epoch Reward Accrual
//!
//! Tracks proportional claims on a shared reward pool that grows by a fixed
//! amount every completed epoch. Participants stake and unstake at arbitrary
//! times; settlement is O(1) per participant and deferred to their next
//! interaction.
//!
//! ## Accounting Model
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  per epoch (total_staked > 0):                                        │
//! │      TPS += reward_per_epoch * precision / total_staked    (floor)    │
//! │                                                                       │
//! │  per participant, on every interaction:                               │
//! │      accrued     += staked * TPS - reward_debt                        │
//! │      reward_debt  = staked * TPS                                      │
//! │      available    = accrued / precision                    (floor)    │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | Component | Module |
//! |-----------|--------|
//! | Reward accumulator | [`accumulator`] |
//! | Pool state | [`pool`] |
//! | Participant ledger & settlement | [`participant`] |
//! | Staking engine façade | [`engine`] |
//! | Emitted events | [`events`] |

pub mod accumulator;
pub mod engine;
pub mod error;
pub mod events;
pub mod participant;
pub mod pool;

// Re-exports
pub use accumulator::advance;
pub use engine::{EngineConfig, ParticipantInfo, StakingEngine, StakingInfo};
pub use error::{Result, StakingError};
pub use events::{EventKind, StakingEvent};
pub use participant::Participant;
pub use pool::Pool;

/// Default pool parameters
pub mod constants {
    /// Fixed-point scale for reward-per-unit values (10^18)
    pub const DEFAULT_PRECISION: u128 = 1_000_000_000_000_000_000;

    /// Reward emitted per completed epoch
    pub const DEFAULT_REWARD_PER_EPOCH: u128 = 100;

    /// Epoch length: one day in seconds
    pub const DEFAULT_EPOCH_DURATION_SECS: u64 = stakeline_core::DEFAULT_EPOCH_DURATION_SECS;
}

pub use constants::*;
