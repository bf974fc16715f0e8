//! # Staking Engine
//!
//! Façade over the pool, the participant records and the token ledger.
//!
//! Every state-changing call runs the same pipeline:
//!
//! ```text
//! now ─► Pool::sync ─► Participant::settle ─► balance change ─► ledger ─► commit
//! ```
//!
//! The pipeline runs on copies of the pool and the caller's record. They are
//! written back only after the ledger transfer succeeded, so a rejected
//! operation leaves the engine exactly as it was.

use crate::constants::*;
use crate::error::{Result, StakingError};
use crate::events::{EventKind, StakingEvent};
use crate::participant::Participant;
use crate::pool::Pool;
use serde::{Deserialize, Serialize};
use stakeline_core::{AccountId, Amount, EpochClock, Fixed, TimeSource};
use stakeline_ledger::TokenLedger;
use std::collections::HashMap;
use std::sync::Arc;

/// Construction parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reward emitted per completed epoch
    pub reward_per_epoch: Amount,

    /// Epoch length in seconds
    pub epoch_duration: u64,

    /// Fixed-point scale for the accumulator
    pub precision: Amount,

    /// Ledger account holding staked principal and the reward reserve
    pub pool_account: AccountId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reward_per_epoch: DEFAULT_REWARD_PER_EPOCH,
            epoch_duration: DEFAULT_EPOCH_DURATION_SECS,
            precision: DEFAULT_PRECISION,
            pool_account: AccountId::derive(b"stakeline/pool"),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        EpochClock::new(self.epoch_duration)?;
        if self.precision == 0 {
            return Err(StakingError::InvalidConfig(
                "precision must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// As-of-now view of one participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub account: AccountId,

    /// Currently staked amount
    pub staked: Amount,

    /// Checkpoint ("missed"), `staked * TPS` at the current accumulator
    pub reward_debt: Fixed,

    /// Claimable reward
    pub available: Amount,

    /// Lifetime claimed reward
    pub total_claimed: Amount,
}

/// As-of-now view of the pool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingInfo {
    pub pool_account: AccountId,
    pub reward_per_epoch: Amount,
    pub epoch_duration: u64,
    pub precision: Amount,
    pub total_staked: Amount,
    pub accumulated_reward_per_unit: Fixed,
    pub last_update_time: u64,
    pub total_emitted: Amount,
    pub skipped_epochs: u64,
    pub participants: usize,
}

/// Epoch-based staking engine
pub struct StakingEngine {
    pool_account: AccountId,
    pool: Pool,
    participants: HashMap<AccountId, Participant>,
    events: Vec<StakingEvent>,
    next_sequence: u64,
    ledger: Arc<dyn TokenLedger>,
    clock: Arc<dyn TimeSource>,
}

impl StakingEngine {
    /// Create an engine; the current time becomes the first epoch boundary.
    pub fn new(
        config: EngineConfig,
        ledger: Arc<dyn TokenLedger>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self> {
        config.validate()?;

        let start_time = clock.now();
        let pool = Pool::new(
            config.reward_per_epoch,
            config.epoch_duration,
            config.precision,
            start_time,
        );

        tracing::info!(
            pool_account = %config.pool_account,
            reward_per_epoch = config.reward_per_epoch,
            epoch_duration = config.epoch_duration,
            start_time,
            "staking engine initialized"
        );

        Ok(Self {
            pool_account: config.pool_account,
            pool,
            participants: HashMap::new(),
            events: Vec::new(),
            next_sequence: 0,
            ledger,
            clock,
        })
    }

    // === State-changing operations ===

    /// Deposit `amount` from `account` into the pool.
    ///
    /// The account must have approved the pool account on the ledger.
    pub fn stake(&mut self, account: &AccountId, amount: Amount) -> Result<StakingEvent> {
        let result = self.apply_stake(account, amount);
        if let Err(err) = &result {
            tracing::warn!(op = "stake", account = %account, amount, error = %err, "operation rejected");
        }
        result
    }

    /// Withdraw `amount` of principal back to `account`.
    ///
    /// Reward accrued before the withdrawal stays claimable.
    pub fn unstake(&mut self, account: &AccountId, amount: Amount) -> Result<StakingEvent> {
        let result = self.apply_unstake(account, amount);
        if let Err(err) = &result {
            tracing::warn!(op = "unstake", account = %account, amount, error = %err, "operation rejected");
        }
        result
    }

    /// Pay out all claimable reward of `account`.
    pub fn claim(&mut self, account: &AccountId) -> Result<StakingEvent> {
        let result = self.apply_claim(account);
        if let Err(err) = &result {
            tracing::warn!(op = "claim", account = %account, error = %err, "operation rejected");
        }
        result
    }

    fn apply_stake(&mut self, account: &AccountId, amount: Amount) -> Result<StakingEvent> {
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let (now, mut pool, mut participant) = self.settled(account)?;

        participant.add_stake(amount)?;
        pool.add_stake(amount)?;
        participant.checkpoint(pool.accumulated_reward_per_unit)?;
        let available = participant.available(pool.precision)?;

        self.ledger
            .transfer_from(&self.pool_account, account, &self.pool_account, amount)?;

        let change = Change::new(EventKind::Staked, amount, available, now);
        Ok(self.commit(account, change, pool, participant))
    }

    fn apply_unstake(&mut self, account: &AccountId, amount: Amount) -> Result<StakingEvent> {
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let (now, mut pool, mut participant) = self.settled(account)?;

        participant.remove_stake(amount)?;
        pool.remove_stake(amount)?;
        participant.checkpoint(pool.accumulated_reward_per_unit)?;
        let available = participant.available(pool.precision)?;

        self.ledger.transfer(&self.pool_account, account, amount)?;

        let change = Change::new(EventKind::Unstaked, amount, available, now);
        Ok(self.commit(account, change, pool, participant))
    }

    fn apply_claim(&mut self, account: &AccountId) -> Result<StakingEvent> {
        let (now, pool, mut participant) = self.settled(account)?;

        if participant.available(pool.precision)? == 0 {
            return Err(StakingError::NothingToClaim);
        }
        let payout = participant.take_available(pool.precision)?;
        let available = participant.available(pool.precision)?;

        self.ledger.transfer(&self.pool_account, account, payout)?;

        let change = Change::new(EventKind::Claimed, payout, available, now);
        Ok(self.commit(account, change, pool, participant))
    }

    // === Read-only queries ===

    /// Participant figures as if settled right now; unknown accounts read as zero.
    pub fn participant_info(&self, account: &AccountId) -> Result<ParticipantInfo> {
        let (_, pool, participant) = self.settled(account)?;
        Ok(ParticipantInfo {
            account: *account,
            staked: participant.staked,
            reward_debt: participant.reward_debt,
            available: participant.available(pool.precision)?,
            total_claimed: participant.total_claimed,
        })
    }

    /// Pool figures with the accumulator replayed up to now
    pub fn staking_info(&self) -> Result<StakingInfo> {
        let mut pool = self.pool.clone();
        pool.sync(self.clock.now())?;
        Ok(StakingInfo {
            pool_account: self.pool_account,
            reward_per_epoch: pool.reward_per_epoch,
            epoch_duration: pool.epoch_duration,
            precision: pool.precision,
            total_staked: pool.total_staked,
            accumulated_reward_per_unit: pool.accumulated_reward_per_unit,
            last_update_time: pool.last_update_time,
            total_emitted: pool.total_emitted,
            skipped_epochs: pool.skipped_epochs,
            participants: self.participants.len(),
        })
    }

    /// Reward `account` could claim right now
    pub fn rewards(&self, account: &AccountId) -> Result<Amount> {
        Ok(self.participant_info(account)?.available)
    }

    /// Committed pool state, as of the last state-changing call
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Committed participant records
    pub fn participants(&self) -> impl Iterator<Item = (&AccountId, &Participant)> {
        self.participants.iter()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn pool_account(&self) -> &AccountId {
        &self.pool_account
    }

    /// Retained events of successful operations, oldest first
    pub fn events(&self) -> &[StakingEvent] {
        &self.events
    }

    /// Retained events with a sequence number at or after `from`
    pub fn events_since(&self, from: u64) -> &[StakingEvent] {
        let start = self.events.partition_point(|e| e.sequence < from);
        &self.events[start..]
    }

    /// Drop retained events with a sequence number before `before`.
    ///
    /// Sequence numbers keep counting from where they were. Returns the
    /// number of events removed.
    pub fn prune_events(&mut self, before: u64) -> usize {
        let end = self.events.partition_point(|e| e.sequence < before);
        self.events.drain(..end);
        end
    }

    // === Internal helpers ===

    /// Scratch copies of the pool and `account`'s record, advanced and settled to now.
    fn settled(&self, account: &AccountId) -> Result<(u64, Pool, Participant)> {
        let now = self.clock.now();
        let mut pool = self.pool.clone();
        pool.sync(now)?;

        let mut participant = self.participants.get(account).cloned().unwrap_or_default();
        participant.settle(pool.accumulated_reward_per_unit)?;

        Ok((now, pool, participant))
    }

    fn commit(
        &mut self,
        account: &AccountId,
        change: Change,
        pool: Pool,
        participant: Participant,
    ) -> StakingEvent {
        let event = StakingEvent {
            sequence: self.next_sequence,
            kind: change.kind,
            account: *account,
            amount: change.amount,
            staked: participant.staked,
            available: change.available,
            total_staked: pool.total_staked,
            accumulated_reward_per_unit: pool.accumulated_reward_per_unit,
            timestamp: change.timestamp,
        };

        tracing::info!(
            kind = ?change.kind,
            account = %account,
            amount = change.amount,
            staked = participant.staked,
            total_staked = pool.total_staked,
            "staking state updated"
        );

        self.pool = pool;
        self.participants.insert(*account, participant);
        self.next_sequence += 1;
        self.events.push(event.clone());
        event
    }
}

/// Outcome of a validated operation, ready to commit
struct Change {
    kind: EventKind,
    amount: Amount,
    available: Amount,
    timestamp: u64,
}

impl Change {
    fn new(kind: EventKind, amount: Amount, available: Amount, timestamp: u64) -> Self {
        Self {
            kind,
            amount,
            available,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakeline_core::ManualClock;
    use stakeline_ledger::{LedgerError, MemoryLedger};

    const DAY: u64 = DEFAULT_EPOCH_DURATION_SECS;

    struct Harness {
        engine: StakingEngine,
        ledger: Arc<MemoryLedger>,
        clock: Arc<ManualClock>,
        pool: AccountId,
    }

    fn harness() -> Harness {
        let ledger = Arc::new(MemoryLedger::new());
        let clock = Arc::new(ManualClock::new(1_000));
        let config = EngineConfig::default();
        let pool = config.pool_account;
        let engine = StakingEngine::new(config, ledger.clone(), clock.clone()).unwrap();
        Harness {
            engine,
            ledger,
            clock,
            pool,
        }
    }

    fn funded(h: &Harness, id: u8) -> AccountId {
        let account = AccountId::new([id; 32]);
        h.ledger.mint(&account, 100_000).unwrap();
        h.ledger.approve(&account, &h.pool, 100_000);
        account
    }

    #[test]
    fn test_rejects_zero_epoch_duration() {
        let config = EngineConfig {
            epoch_duration: 0,
            ..EngineConfig::default()
        };
        let result = StakingEngine::new(
            config,
            Arc::new(MemoryLedger::new()),
            Arc::new(ManualClock::new(0)),
        );
        assert!(matches!(result, Err(StakingError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_precision() {
        let config = EngineConfig {
            precision: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(StakingError::InvalidConfig(_))));
    }

    #[test]
    fn test_stake_moves_tokens() {
        let mut h = harness();
        let alice = funded(&h, 1);

        let event = h.engine.stake(&alice, 1000).unwrap();

        assert_eq!(event.kind, EventKind::Staked);
        assert_eq!(event.total_staked, 1000);
        assert_eq!(h.ledger.balance_of(&alice), 99_000);
        assert_eq!(h.ledger.balance_of(&h.pool), 1000);

        let info = h.engine.participant_info(&alice).unwrap();
        assert_eq!(info.staked, 1000);
        assert_eq!(info.reward_debt, Fixed::zero());
        assert_eq!(info.available, 0);
    }

    #[test]
    fn test_stake_zero_rejected() {
        let mut h = harness();
        let alice = funded(&h, 1);
        assert_eq!(h.engine.stake(&alice, 0), Err(StakingError::InvalidAmount));
        assert_eq!(h.engine.participant_count(), 0);
    }

    #[test]
    fn test_stake_without_allowance_changes_nothing() {
        let mut h = harness();
        let bob = AccountId::new([2u8; 32]);
        h.ledger.mint(&bob, 5_000).unwrap();

        let result = h.engine.stake(&bob, 1000);

        assert!(matches!(
            result,
            Err(StakingError::LedgerTransferFailed(LedgerError::InsufficientAllowance { .. }))
        ));
        assert_eq!(h.engine.pool().total_staked, 0);
        assert_eq!(h.engine.participant_count(), 0);
        assert!(h.engine.events().is_empty());
    }

    #[test]
    fn test_one_epoch_sole_staker() {
        let mut h = harness();
        let alice = funded(&h, 1);
        h.ledger.mint(&h.pool, 1_000_000).unwrap();

        h.engine.stake(&alice, 1000).unwrap();
        h.clock.advance(DAY + 1);

        let info = h.engine.staking_info().unwrap();
        assert_eq!(
            info.accumulated_reward_per_unit,
            Fixed::from(100_000_000_000_000_000u128)
        );
        assert_eq!(h.engine.rewards(&alice).unwrap(), 100);

        // Queries never commit
        assert_eq!(h.engine.pool().accumulated_reward_per_unit, Fixed::zero());
        assert_eq!(h.engine.pool().last_update_time, 1_000);
    }

    #[test]
    fn test_unstake_more_than_staked() {
        let mut h = harness();
        let alice = funded(&h, 1);
        h.engine.stake(&alice, 1000).unwrap();

        let result = h.engine.unstake(&alice, 1001);
        assert_eq!(
            result,
            Err(StakingError::InsufficientStake {
                requested: 1001,
                staked: 1000
            })
        );
        assert_eq!(h.engine.pool().total_staked, 1000);
    }

    #[test]
    fn test_unstake_unknown_account() {
        let mut h = harness();
        let ghost = AccountId::new([7u8; 32]);
        assert!(matches!(
            h.engine.unstake(&ghost, 1),
            Err(StakingError::InsufficientStake { staked: 0, .. })
        ));
        assert_eq!(h.engine.participant_count(), 0);
    }

    #[test]
    fn test_rejected_unstake_after_epoch_changes_nothing() {
        let mut h = harness();
        let alice = funded(&h, 1);
        h.engine.stake(&alice, 1000).unwrap();
        h.clock.advance(DAY);

        let pool_before = h.engine.pool().clone();
        let record_before = h
            .engine
            .participants()
            .find(|(a, _)| **a == alice)
            .map(|(_, p)| p.clone());
        let balance_before = h.ledger.balance_of(&alice);

        let result = h.engine.unstake(&alice, 1001);

        assert!(matches!(result, Err(StakingError::InsufficientStake { .. })));
        assert_eq!(h.engine.pool(), &pool_before);
        let record_after = h
            .engine
            .participants()
            .find(|(a, _)| **a == alice)
            .map(|(_, p)| p.clone());
        assert_eq!(record_after, record_before);
        let record = record_after.unwrap();
        assert_eq!(record.reward_debt, Fixed::zero());
        assert_eq!(record.accrued, Fixed::zero());
        assert_eq!(h.ledger.balance_of(&alice), balance_before);
        assert_eq!(h.engine.events().len(), 1);

        // The epoch is still settled on the next accepted call
        assert_eq!(h.engine.rewards(&alice).unwrap(), 100);
    }

    #[test]
    fn test_prune_events_keeps_sequence() {
        let mut h = harness();
        let alice = funded(&h, 1);
        for _ in 0..4 {
            h.engine.stake(&alice, 10).unwrap();
        }

        assert_eq!(h.engine.prune_events(3), 3);
        assert_eq!(h.engine.events().len(), 1);
        assert_eq!(h.engine.events()[0].sequence, 3);
        assert_eq!(h.engine.prune_events(3), 0);

        let event = h.engine.stake(&alice, 10).unwrap();
        assert_eq!(event.sequence, 4);
        assert_eq!(h.engine.events_since(4).len(), 1);
        assert_eq!(h.engine.events_since(0).len(), 2);
        assert!(h.engine.events_since(9).is_empty());
    }

    #[test]
    fn test_claim_with_nothing_available() {
        let mut h = harness();
        let alice = funded(&h, 1);
        h.engine.stake(&alice, 1000).unwrap();

        assert_eq!(h.engine.claim(&alice), Err(StakingError::NothingToClaim));
    }

    #[test]
    fn test_claim_from_underfunded_pool_rolls_back() {
        let mut h = harness();
        let alice = funded(&h, 1);
        h.engine.stake(&alice, 1000).unwrap();
        h.clock.advance(DAY);

        // No reward reserve was minted, and the principal has been returned
        h.engine.unstake(&alice, 1000).unwrap();
        let before_pool = h.engine.pool().clone();

        let result = h.engine.claim(&alice);

        assert!(matches!(
            result,
            Err(StakingError::LedgerTransferFailed(LedgerError::InsufficientBalance { .. }))
        ));
        assert_eq!(h.engine.pool(), &before_pool);
        assert_eq!(h.engine.rewards(&alice).unwrap(), 100);
    }

    #[test]
    fn test_events_are_sequenced() {
        let mut h = harness();
        let alice = funded(&h, 1);
        h.ledger.mint(&h.pool, 1_000).unwrap();

        h.engine.stake(&alice, 1000).unwrap();
        h.clock.advance(DAY);
        h.engine.unstake(&alice, 400).unwrap();
        h.engine.claim(&alice).unwrap();

        let kinds: Vec<_> = h.engine.events().iter().map(|e| (e.sequence, e.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (0, EventKind::Staked),
                (1, EventKind::Unstaked),
                (2, EventKind::Claimed)
            ]
        );
        assert_eq!(h.engine.events()[2].amount, 100);
    }
}
