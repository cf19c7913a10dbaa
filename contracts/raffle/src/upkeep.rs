use chance_raffle_common::RafflePhase;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::Timestamp;

use crate::state::{RaffleConfig, RaffleState};

/// Result of each settlement precondition, evaluated at a point in time.
#[cw_serde]
pub struct UpkeepDiagnostics {
    pub is_open: bool,
    pub time_passed: bool,
    pub has_players: bool,
    pub has_balance: bool,
    pub seconds_since_settlement: u64,
}

impl UpkeepDiagnostics {
    pub fn upkeep_needed(&self) -> bool {
        self.is_open && self.time_passed && self.has_players && self.has_balance
    }
}

pub fn evaluate_upkeep(
    config: &RaffleConfig,
    state: &RaffleState,
    now: Timestamp,
) -> UpkeepDiagnostics {
    let elapsed = now.seconds().saturating_sub(state.last_settlement.seconds());
    UpkeepDiagnostics {
        is_open: state.phase == RafflePhase::Open,
        time_passed: elapsed >= config.interval_seconds,
        has_players: state.player_count > 0,
        has_balance: !state.pot.is_zero(),
        seconds_since_settlement: elapsed,
    }
}
