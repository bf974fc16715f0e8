//! # Epoch Clock
//!
//! Converts elapsed wall-clock time into a count of completed, fixed-length
//! epochs.
//!
//! ```text
//!  last_update                                      now
//!      │◄── epoch ──►│◄── epoch ──►│◄── remainder ──►│
//!      └─────────────┴─────────────┴─────────────────┘
//!                    epochs = 2, last_update += 2 * epoch
//! ```
//!
//! The caller moves its checkpoint forward by whole epochs only, so the
//! remainder carries into the next reading instead of being lost.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Seconds in one hour
pub const SECS_PER_HOUR: u64 = 3600;

/// Default epoch length: one day
pub const DEFAULT_EPOCH_DURATION_SECS: u64 = 24 * SECS_PER_HOUR;

/// Result of measuring elapsed time in whole epochs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochAdvance {
    /// Number of completed epochs since the checkpoint
    pub epochs: u64,
    /// Seconds into the current, incomplete epoch
    pub remainder: u64,
    /// Epoch length the measurement was taken with
    pub epoch_duration: u64,
}

impl EpochAdvance {
    /// Checkpoint after consuming the completed epochs
    pub fn new_last_update(&self, last_update_time: u64) -> u64 {
        last_update_time.saturating_add(self.epochs.saturating_mul(self.epoch_duration))
    }

    pub fn is_empty(&self) -> bool {
        self.epochs == 0
    }
}

/// Count completed epochs between `last_update_time` and `now`.
///
/// A reading earlier than the checkpoint counts as zero elapsed time.
/// `epoch_duration` must be non-zero; [`EpochClock`] enforces this.
pub fn elapsed_epochs(now: u64, last_update_time: u64, epoch_duration: u64) -> EpochAdvance {
    if epoch_duration == 0 {
        return EpochAdvance::default();
    }
    let delta = now.saturating_sub(last_update_time);
    EpochAdvance {
        epochs: delta / epoch_duration,
        remainder: delta % epoch_duration,
        epoch_duration,
    }
}

/// Fixed-length epoch clock
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochClock {
    duration: u64,
}

impl EpochClock {
    /// Create an epoch clock with the given length in seconds
    pub fn new(duration_secs: u64) -> Result<Self> {
        if duration_secs == 0 {
            return Err(CoreError::ZeroEpochDuration);
        }
        Ok(Self {
            duration: duration_secs,
        })
    }

    /// Create an epoch clock measured in hours
    pub fn from_hours(hours: u64) -> Result<Self> {
        Self::new(hours.saturating_mul(SECS_PER_HOUR))
    }

    /// Epoch length in seconds
    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn elapsed(&self, now: u64, last_update_time: u64) -> EpochAdvance {
        elapsed_epochs(now, last_update_time, self.duration)
    }
}

impl Default for EpochClock {
    fn default() -> Self {
        Self {
            duration: DEFAULT_EPOCH_DURATION_SECS,
        }
    }
}
