//! Core type definitions for Stakeline
//!
//! Token quantities are plain `u128` integers in the ledger's smallest unit.
//! Reward-per-unit values and reward debts are fixed-point numbers scaled by
//! the pool precision and carried in 256 bits, since `staked * accumulator`
//! routinely exceeds the `u128` range.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amount in the ledger's smallest unit
pub type Amount = u128;

/// Fixed-point value scaled by the pool precision
pub type Fixed = primitive_types::U256;

/// Widen an amount into the fixed-point domain
pub fn to_fixed(amount: Amount) -> Fixed {
    Fixed::from(amount)
}

/// Narrow a fixed-point value back into an amount.
///
/// Returns `None` when the value does not fit into 128 bits.
pub fn to_amount(value: Fixed) -> Option<Amount> {
    if value > Fixed::from(u128::MAX) {
        None
    } else {
        Some(value.low_u128())
    }
}

/// AccountId - 32-byte address of a ledger account or staking participant
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct AccountId {
    id: [u8; 32],
}

impl AccountId {
    /// Create an account id from raw bytes
    pub fn new(id: [u8; 32]) -> Self {
        Self { id }
    }

    /// Derive a deterministic account id from a seed using BLAKE3
    pub fn derive(seed: &[u8]) -> Self {
        let hash = blake3::hash(seed);
        Self {
            id: *hash.as_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.id
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.id)
    }

    /// Parse from a 64-character hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidAccountId(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(CoreError::InvalidAccountId(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut id = [0u8; 32];
        id.copy_from_slice(&bytes);
        Ok(Self { id })
    }

    /// Zero account
    pub const ZERO: Self = Self { id: [0u8; 32] };
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", &self.to_hex()[..12])
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..12])
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(id: [u8; 32]) -> Self {
        Self::new(id)
    }
}
