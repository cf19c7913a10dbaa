use cosmwasm_std::{coin, to_json_binary, Binary, Deps, Env, Order, StdResult};
use cw_storage_plus::Bound;

use crate::msg::{
    CheckUpkeepResponse, PlayersResponse, RoundHistoryResponse, SettlementStatusResponse,
};
use crate::state::{CONFIG, PLAYERS, RAFFLE_STATE, ROUNDS};
use crate::upkeep::evaluate_upkeep;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_entrance_fee(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.entrance_fee)
}

pub fn query_interval(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.interval_seconds)
}

pub fn query_num_words(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.num_words)
}

pub fn query_request_confirmations(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.request_confirmations)
}

pub fn query_state(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state)
}

pub fn query_phase(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.phase)
}

/// Player in slot `index` of the current round. Errors if the slot is empty.
pub fn query_player(deps: Deps, index: u32) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    let player = PLAYERS.load(deps.storage, (state.round, index))?;
    to_json_binary(&player)
}

pub fn query_players(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    let limit = limit.unwrap_or(50).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let players: Vec<_> = PLAYERS
        .prefix(state.round)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, player)| player)
        .collect();

    to_json_binary(&PlayersResponse {
        round: state.round,
        players,
    })
}

pub fn query_number_of_players(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.player_count)
}

pub fn query_recent_winner(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.recent_winner)
}

pub fn query_last_timestamp(deps: Deps) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&state.last_settlement)
}

pub fn query_balance(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let state = RAFFLE_STATE.load(deps.storage)?;
    to_json_binary(&coin(state.pot.u128(), config.denom))
}

pub fn query_check_upkeep(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let state = RAFFLE_STATE.load(deps.storage)?;
    let diagnostics = evaluate_upkeep(&config, &state, env.block.time);

    to_json_binary(&CheckUpkeepResponse {
        upkeep_needed: diagnostics.upkeep_needed(),
        perform_data: Binary::default(),
        diagnostics,
    })
}

pub fn query_settlement_status(deps: Deps, env: Env) -> StdResult<Binary> {
    let state = RAFFLE_STATE.load(deps.storage)?;
    let seconds_pending = state
        .requested_at
        .map(|at| env.block.time.seconds().saturating_sub(at.seconds()));

    to_json_binary(&SettlementStatusResponse {
        phase: state.phase,
        pending_request_id: state.pending_request_id,
        requested_at: state.requested_at,
        seconds_pending,
    })
}

pub fn query_round(deps: Deps, round: u64) -> StdResult<Binary> {
    let result = ROUNDS.may_load(deps.storage, round)?;
    to_json_binary(&result)
}

pub fn query_round_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let rounds: Vec<_> = ROUNDS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, round)| round)
        .collect();

    to_json_binary(&RoundHistoryResponse { rounds })
}
