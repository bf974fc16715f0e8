//! In-memory fungible token ledger
//!
//! Single-asset balance store with ERC-20 style allowances. All state sits
//! behind one `RwLock`, so every operation observes and mutates the accounts
//! atomically.

use crate::{LedgerError, Result, TokenLedger};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use stakeline_core::{AccountId, Amount};
use std::collections::HashMap;

/// Ledger account
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Account {
    /// Spendable balance
    pub balance: Amount,

    /// Allowances granted to spenders
    pub allowances: HashMap<AccountId, Amount>,
}

impl Account {
    pub fn allowance(&self, spender: &AccountId) -> Amount {
        self.allowances.get(spender).copied().unwrap_or(0)
    }
}

/// Kind of recorded ledger operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Mint,
    Transfer,
    TransferFrom,
    Approve,
}

/// Record of a successful ledger operation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerOperation {
    /// BLAKE3 digest over the operation fields and sequence number
    pub operation_id: [u8; 32],
    pub sequence: u64,
    pub kind: OperationKind,
    pub from: Option<AccountId>,
    pub to: AccountId,
    pub amount: Amount,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<AccountId, Account>,
    total_supply: Amount,
    history: Vec<LedgerOperation>,
    next_sequence: u64,
}

impl LedgerState {
    fn record(
        &mut self,
        kind: OperationKind,
        from: Option<AccountId>,
        to: AccountId,
        amount: Amount,
    ) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let from_bytes = from.map(|a| *a.as_bytes()).unwrap_or([0u8; 32]);
        let operation_id = *blake3::hash(
            &[
                from_bytes.as_slice(),
                to.as_bytes().as_slice(),
                amount.to_le_bytes().as_slice(),
                sequence.to_le_bytes().as_slice(),
                [kind as u8].as_slice(),
            ]
            .concat(),
        )
        .as_bytes();

        self.history.push(LedgerOperation {
            operation_id,
            sequence,
            kind,
            from,
            to,
            amount,
        });
    }

    fn balance(&self, account: &AccountId) -> Amount {
        self.accounts.get(account).map(|a| a.balance).unwrap_or(0)
    }

    /// Check that `from` can pay and `to` can receive, without mutating.
    fn check_move(&self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()> {
        let available = self.balance(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if from != to {
            self.balance(to)
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?;
        }
        Ok(())
    }

    /// Move funds; callers must have run `check_move` first.
    fn apply_move(&mut self, from: &AccountId, to: &AccountId, amount: Amount) {
        if from == to {
            return;
        }
        if let Some(acc) = self.accounts.get_mut(from) {
            acc.balance -= amount;
        }
        self.accounts.entry(*to).or_default().balance += amount;
    }
}

/// In-memory token ledger
#[derive(Default)]
pub struct MemoryLedger {
    state: RwLock<LedgerState>,
}

impl MemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create new tokens and credit them to `to`
    pub fn mint(&self, to: &AccountId, amount: Amount) -> Result<()> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }
        let mut state = self.state.write();
        let supply = state
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = state
            .balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        state.total_supply = supply;
        state.accounts.entry(*to).or_default().balance = balance;
        state.record(OperationKind::Mint, None, *to, amount);

        tracing::debug!(account = %to, amount, "tokens minted");
        Ok(())
    }

    /// Set the amount `spender` may move out of `owner`'s balance
    pub fn approve(&self, owner: &AccountId, spender: &AccountId, amount: Amount) {
        let mut state = self.state.write();
        state
            .accounts
            .entry(*owner)
            .or_default()
            .allowances
            .insert(*spender, amount);
        state.record(OperationKind::Approve, Some(*owner), *spender, amount);

        tracing::debug!(owner = %owner, spender = %spender, amount, "allowance approved");
    }

    /// Remaining allowance of `spender` over `owner`'s balance
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.state
            .read()
            .accounts
            .get(owner)
            .map(|acc| acc.allowance(spender))
            .unwrap_or(0)
    }

    /// Total tokens ever minted
    pub fn total_supply(&self) -> Amount {
        self.state.read().total_supply
    }

    /// Successful operations in execution order
    pub fn history(&self) -> Vec<LedgerOperation> {
        self.state.read().history.clone()
    }

    /// Drop recorded operations before sequence `before`; returns how many
    /// were removed. Later operations keep their sequence numbers.
    pub fn prune_history(&self, before: u64) -> usize {
        let mut state = self.state.write();
        let end = state.history.partition_point(|op| op.sequence < before);
        state.history.drain(..end);
        end
    }
}

impl TokenLedger for MemoryLedger {
    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<()> {
        let mut state = self.state.write();

        let allowed = state
            .accounts
            .get(from)
            .map(|acc| acc.allowance(spender))
            .unwrap_or(0);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                needed: amount,
                allowed,
            });
        }
        state.check_move(from, to, amount)?;

        state.apply_move(from, to, amount);
        if let Some(acc) = state.accounts.get_mut(from) {
            acc.allowances.insert(*spender, allowed - amount);
        }
        state.record(OperationKind::TransferFrom, Some(*from), *to, amount);

        tracing::trace!(spender = %spender, from = %from, to = %to, amount, "transfer_from");
        Ok(())
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<()> {
        let mut state = self.state.write();
        state.check_move(from, to, amount)?;
        state.apply_move(from, to, amount);
        state.record(OperationKind::Transfer, Some(*from), *to, amount);

        tracing::trace!(from = %from, to = %to, amount, "transfer");
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.state.read().balance(account)
    }
}
