use chance_raffle_common::vrf::MAX_REQUEST_CONFIRMATIONS;
use chance_raffle_common::RafflePhase;
use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute::{self, PAYOUT_REPLY_ID, REQUEST_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{RaffleConfig, RaffleState, CONFIG, RAFFLE_STATE};

const CONTRACT_NAME: &str = "crates.io:chance-raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_REQUEST_CONFIRMATIONS: u16 = 3;
pub const NUM_WORDS: u32 = 1;

fn invalid_config(reason: &str) -> ContractError {
    ContractError::InvalidConfig {
        reason: reason.to_string(),
    }
}

fn validate_instantiate_msg(msg: &InstantiateMsg) -> Result<(), ContractError> {
    if msg.entrance_fee.is_zero() {
        return Err(invalid_config("entrance fee must be positive"));
    }
    if msg.interval_seconds == 0 {
        return Err(invalid_config("interval must be positive"));
    }
    if msg.denom.is_empty() {
        return Err(invalid_config("denom must not be empty"));
    }
    if msg.key_hash.is_empty() {
        return Err(invalid_config("key hash must not be empty"));
    }
    if msg.callback_gas_limit == 0 {
        return Err(invalid_config("callback gas limit must be positive"));
    }
    if msg.request_confirmations.unwrap_or(DEFAULT_REQUEST_CONFIRMATIONS)
        > MAX_REQUEST_CONFIRMATIONS
    {
        return Err(invalid_config("too many request confirmations"));
    }
    Ok(())
}

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    validate_instantiate_msg(&msg)?;

    let config = RaffleConfig {
        entrance_fee: msg.entrance_fee,
        denom: msg.denom,
        interval_seconds: msg.interval_seconds,
        vrf_coordinator: deps.api.addr_validate(&msg.vrf_coordinator)?,
        key_hash: msg.key_hash,
        subscription_id: msg.subscription_id,
        request_confirmations: msg
            .request_confirmations
            .unwrap_or(DEFAULT_REQUEST_CONFIRMATIONS),
        callback_gas_limit: msg.callback_gas_limit,
        num_words: NUM_WORDS,
    };
    CONFIG.save(deps.storage, &config)?;

    let state = RaffleState {
        phase: RafflePhase::Open,
        round: 1,
        player_count: 0,
        pot: Uint128::zero(),
        last_settlement: env.block.time,
        pending_request_id: None,
        requested_at: None,
        recent_winner: None,
        rounds_completed: 0,
    };
    RAFFLE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "raffle")
        .add_attribute("creator", info.sender.to_string())
        .add_attribute("entrance_fee", config.entrance_fee.to_string())
        .add_attribute("interval_seconds", config.interval_seconds.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Enter {} => execute::enter(deps, env, info),
        ExecuteMsg::PerformUpkeep { perform_data } => {
            execute::perform_upkeep(deps, env, info, perform_data)
        }
        ExecuteMsg::FulfillRandomWords {
            request_id,
            random_words,
        } => execute::fulfill_random_words(deps, env, info, request_id, random_words),
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        REQUEST_REPLY_ID => execute::handle_request_reply(deps, env, msg),
        PAYOUT_REPLY_ID => execute::handle_payout_reply(deps, env, msg),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::EntranceFee {} => query::query_entrance_fee(deps),
        QueryMsg::Interval {} => query::query_interval(deps),
        QueryMsg::NumWords {} => query::query_num_words(deps),
        QueryMsg::RequestConfirmations {} => query::query_request_confirmations(deps),
        QueryMsg::State {} => query::query_state(deps),
        QueryMsg::Phase {} => query::query_phase(deps),
        QueryMsg::Player { index } => query::query_player(deps, index),
        QueryMsg::Players { start_after, limit } => {
            query::query_players(deps, start_after, limit)
        }
        QueryMsg::NumberOfPlayers {} => query::query_number_of_players(deps),
        QueryMsg::RecentWinner {} => query::query_recent_winner(deps),
        QueryMsg::LastTimestamp {} => query::query_last_timestamp(deps),
        QueryMsg::Balance {} => query::query_balance(deps),
        // check_data is accepted for automation compatibility and ignored
        QueryMsg::CheckUpkeep { .. } => query::query_check_upkeep(deps, env),
        QueryMsg::SettlementStatus {} => query::query_settlement_status(deps, env),
        QueryMsg::Round { round } => query::query_round(deps, round),
        QueryMsg::RoundHistory { start_after, limit } => {
            query::query_round_history(deps, start_after, limit)
        }
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
