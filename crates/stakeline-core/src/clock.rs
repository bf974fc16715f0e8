//! Time sources
//!
//! The engine never reads the wall clock directly. It asks an injected
//! [`TimeSource`] for the current Unix time in seconds, which lets tests move
//! time forward deterministically with [`ManualClock`].

use parking_lot::Mutex;

/// Source of the current time, in Unix seconds
///
/// Readings must be monotonically non-decreasing.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock backed by `chrono::Utc`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> u64 {
        // Pre-epoch system clocks read as zero
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Manually driven clock for simulations and tests
#[derive(Default)]
pub struct ManualClock {
    now: Mutex<u64>,
}

impl ManualClock {
    /// Create a clock starting at `start` seconds
    pub fn new(start: u64) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward and return the new time
    pub fn advance(&self, secs: u64) -> u64 {
        let mut now = self.now.lock();
        *now = now.saturating_add(secs);
        tracing::trace!(now = *now, advanced = secs, "manual clock advanced");
        *now
    }

    /// Jump to an absolute time; earlier instants are ignored
    pub fn set(&self, timestamp: u64) -> u64 {
        let mut now = self.now.lock();
        *now = (*now).max(timestamp);
        *now
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> u64 {
        *self.now.lock()
    }
}
