//! Staking errors

use stakeline_core::{Amount, CoreError};
use stakeline_ledger::LedgerError;
use thiserror::Error;

/// Result type alias for staking operations
pub type Result<T> = std::result::Result<T, StakingError>;

/// Staking errors
///
/// Every error aborts the whole operation; no engine state is changed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Insufficient stake: requested {requested}, staked {staked}")]
    InsufficientStake { requested: Amount, staked: Amount },

    #[error("nothing to claim")]
    NothingToClaim,

    #[error("Ledger transfer failed: {0}")]
    LedgerTransferFailed(#[from] LedgerError),

    #[error("Arithmetic overflow in reward accounting")]
    Overflow,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<CoreError> for StakingError {
    fn from(err: CoreError) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}

impl StakingError {
    /// Get the error code for API responses
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidAmount => 2001,
            Self::InsufficientStake { .. } => 2002,
            Self::NothingToClaim => 2003,
            Self::LedgerTransferFailed(LedgerError::InsufficientBalance { .. }) => 2004,
            Self::LedgerTransferFailed(LedgerError::InsufficientAllowance { .. }) => 2005,
            Self::LedgerTransferFailed(_) => 2006,
            Self::Overflow => 2007,
            Self::InvalidConfig(_) => 2008,
        }
    }
}
