//! # Stakeline Ledger
//!
//! The staking engine moves value through a fungible token ledger it does not
//! own. This crate defines that boundary as the [`TokenLedger`] trait and
//! ships [`MemoryLedger`], an in-process implementation with balances,
//! allowances and minting.
//!
//! ## Ledger Contract
//!
//! | Operation | Fails with |
//! |-----------|------------|
//! | `transfer_from(spender, from, to, amount)` | `InsufficientAllowance`, `InsufficientBalance` |
//! | `transfer(from, to, amount)` | `InsufficientBalance` |
//! | `balance_of(account)` | never |
//!
//! A failed call leaves every balance and allowance unchanged.

pub mod memory;

pub use memory::{LedgerOperation, MemoryLedger, OperationKind};

use stakeline_core::{AccountId, Amount};
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Fungible token ledger consumed by the staking engine
pub trait TokenLedger: Send + Sync {
    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<()>;

    /// Move `amount` out of `from`'s own balance.
    fn transfer(&self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()>;

    /// Current balance of an account; unknown accounts hold zero.
    fn balance_of(&self, account: &AccountId) -> Amount;
}

/// Ledger errors
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance: needed {needed}, available {available}")]
    InsufficientBalance { needed: Amount, available: Amount },

    #[error("Insufficient allowance: needed {needed}, allowed {allowed}")]
    InsufficientAllowance { needed: Amount, allowed: Amount },

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Balance overflow")]
    Overflow,
}
