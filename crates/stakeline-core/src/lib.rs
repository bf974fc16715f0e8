//! # Stakeline Core
//!
//! Shared building blocks for the Stakeline reward-accrual engine:
//! - `AccountId` - 32-byte participant / ledger address
//! - `Amount` and `Fixed` - token quantities and 256-bit fixed-point values
//! - `TimeSource` - injected wall clock (`SystemClock`, `ManualClock`)
//! - `EpochClock` - converts elapsed time into whole epochs

pub mod clock;
pub mod epoch;
pub mod error;
pub mod types;

pub use clock::*;
pub use epoch::*;
pub use error::*;
pub use types::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::{ManualClock, SystemClock, TimeSource};
    pub use crate::epoch::{elapsed_epochs, EpochAdvance, EpochClock};
    pub use crate::error::{CoreError, Result};
    pub use crate::types::*;
}
