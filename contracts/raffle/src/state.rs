use chance_raffle_common::RafflePhase;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128, Uint256};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<RaffleConfig> = Item::new("config");
pub const RAFFLE_STATE: Item<RaffleState> = Item::new("raffle_state");

/// Entries keyed by (round, slot). Bumping the round clears the player list
/// without touching old entries.
pub const PLAYERS: Map<(u64, u32), Addr> = Map::new("players");

/// Settled rounds, keyed by round number.
pub const ROUNDS: Map<u64, RoundResult> = Map::new("rounds");

#[cw_serde]
pub struct RaffleConfig {
    /// Minimum amount of `denom` accepted per entry
    pub entrance_fee: Uint128,
    pub denom: String,
    /// Minimum time between settlements (seconds)
    pub interval_seconds: u64,
    pub vrf_coordinator: Addr,
    /// Randomness feed the coordinator should serve
    pub key_hash: String,
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u64,
    pub num_words: u32,
}

#[cw_serde]
pub struct RaffleState {
    pub phase: RafflePhase,
    /// Current round number, starts at 1
    pub round: u64,
    pub player_count: u32,
    /// Fees collected since the last payout
    pub pot: Uint128,
    pub last_settlement: Timestamp,
    /// Set while Settling, once the coordinator has accepted the request
    pub pending_request_id: Option<u64>,
    pub requested_at: Option<Timestamp>,
    pub recent_winner: Option<Addr>,
    pub rounds_completed: u64,
}

#[cw_serde]
pub struct RoundResult {
    pub round: u64,
    pub winner: Addr,
    pub winner_index: u32,
    pub payout: Uint128,
    pub player_count: u32,
    pub request_id: u64,
    pub random_word: Uint256,
    pub settled_at: Timestamp,
}
