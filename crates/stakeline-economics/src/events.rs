//! Events emitted by successful staking operations

use serde::{Deserialize, Serialize};
use stakeline_core::{AccountId, Amount, Fixed};

/// Kind of state change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Staked,
    Unstaked,
    Claimed,
}

/// Post-operation snapshot of the pool and the acting participant
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingEvent {
    /// Event sequence number, starting at zero
    pub sequence: u64,

    pub kind: EventKind,

    pub account: AccountId,

    /// Amount staked, unstaked or paid out
    pub amount: Amount,

    /// Participant stake after the operation
    pub staked: Amount,

    /// Participant claimable reward after the operation
    pub available: Amount,

    /// Pool stake after the operation
    pub total_staked: Amount,

    /// Accumulator value the operation settled against
    pub accumulated_reward_per_unit: Fixed,

    /// Time source reading at execution
    pub timestamp: u64,
}

impl StakingEvent {
    /// Serialize to a JSON line for export
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json() {
        let event = StakingEvent {
            sequence: 3,
            kind: EventKind::Claimed,
            account: AccountId::new([1u8; 32]),
            amount: 232,
            staked: 2500,
            available: 0,
            total_staked: 48_000,
            accumulated_reward_per_unit: Fixed::from(189_511_183_261_183_258u128),
            timestamp: 864_000,
        };

        let json = event.to_json().unwrap();
        assert!(json.contains("\"kind\":\"claimed\""));

        let decoded: StakingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }
}
