//! Error types for Stakeline core operations

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Account id could not be parsed
    #[error("Invalid account id: {0}")]
    InvalidAccountId(String),

    /// Epochs must have a non-zero length
    #[error("Epoch duration must be greater than zero")]
    ZeroEpochDuration,
}

impl CoreError {
    /// Get the error code for API responses
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidAccountId(_) => 1001,
            Self::ZeroEpochDuration => 1002,
        }
    }
}
