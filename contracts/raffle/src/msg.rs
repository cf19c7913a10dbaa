use chance_raffle_common::RafflePhase;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin, Timestamp, Uint128, Uint256};

use crate::state::{RaffleConfig, RaffleState, RoundResult};
use crate::upkeep::UpkeepDiagnostics;

#[cw_serde]
pub struct InstantiateMsg {
    pub entrance_fee: Uint128,
    pub denom: String,
    pub interval_seconds: u64,
    pub vrf_coordinator: String,
    pub key_hash: String,
    pub subscription_id: u64,
    pub callback_gas_limit: u64,
    /// Defaults to 3
    pub request_confirmations: Option<u16>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Enter the current round. Send at least the entrance fee in `denom`.
    Enter {},
    /// Close the round and request randomness. Anyone can call once
    /// `CheckUpkeep` reports the upkeep as needed.
    PerformUpkeep {
        #[serde(default)]
        perform_data: Binary,
    },
    /// Randomness callback. Only the VRF coordinator can call.
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RaffleConfig)]
    Config {},
    #[returns(Uint128)]
    EntranceFee {},
    #[returns(u64)]
    Interval {},
    #[returns(u32)]
    NumWords {},
    #[returns(u16)]
    RequestConfirmations {},
    #[returns(RaffleState)]
    State {},
    #[returns(RafflePhase)]
    Phase {},
    #[returns(Addr)]
    Player { index: u32 },
    #[returns(PlayersResponse)]
    Players {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(u32)]
    NumberOfPlayers {},
    #[returns(Option<Addr>)]
    RecentWinner {},
    #[returns(Timestamp)]
    LastTimestamp {},
    #[returns(Coin)]
    Balance {},
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep {
        #[serde(default)]
        check_data: Binary,
    },
    #[returns(SettlementStatusResponse)]
    SettlementStatus {},
    #[returns(Option<RoundResult>)]
    Round { round: u64 },
    #[returns(RoundHistoryResponse)]
    RoundHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct PlayersResponse {
    pub round: u64,
    pub players: Vec<Addr>,
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    /// Always empty; kept for automation callers that forward it to PerformUpkeep
    pub perform_data: Binary,
    pub diagnostics: UpkeepDiagnostics,
}

#[cw_serde]
pub struct SettlementStatusResponse {
    pub phase: RafflePhase,
    pub pending_request_id: Option<u64>,
    pub requested_at: Option<Timestamp>,
    /// How long the current request has been waiting for its callback
    pub seconds_pending: Option<u64>,
}

#[cw_serde]
pub struct RoundHistoryResponse {
    pub rounds: Vec<RoundResult>,
}
