use chance_raffle_common::vrf::{wasm_event_type, REQUEST_EVENT_TYPE, REQUEST_ID_ATTRIBUTE};
use chance_raffle_common::{CoordinatorExecuteMsg, RafflePhase, RandomWordsRequest};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, Binary, DepsMut, Env, Event, MessageInfo,
    Reply, Response, StdError, SubMsg, SubMsgResult, Uint128, Uint256, WasmMsg,
};

use crate::error::ContractError;
use crate::events::RaffleEvent;
use crate::state::{RoundResult, CONFIG, PLAYERS, RAFFLE_STATE, ROUNDS};
use crate::upkeep::evaluate_upkeep;

pub const REQUEST_REPLY_ID: u64 = 1;
pub const PAYOUT_REPLY_ID: u64 = 2;

/// Carried on the payout submessage so a failed send can be reported.
#[cw_serde]
pub struct PayoutPayload {
    pub winner: Addr,
    pub amount: Uint128,
}

/// Amount of `denom` sent with the message. No funds counts as zero.
fn paid_amount(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    if info.funds.is_empty() {
        return Ok(Uint128::zero());
    }
    if info.funds.len() != 1 {
        return Err(ContractError::InvalidFunds);
    }
    let sent = &info.funds[0];
    if sent.denom != denom {
        return Err(ContractError::WrongDenom {
            expected: denom.to_string(),
            denom: sent.denom.clone(),
        });
    }
    Ok(sent.amount)
}

/// Upkeep and fulfillment carry no payment. Coins sent with them would sit
/// in the contract outside the pot.
fn nonpayable(info: &MessageInfo) -> Result<(), ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::NonPayable {});
    }
    Ok(())
}

/// Index of the winning slot: `random_word mod player_count`.
pub fn winner_index(random_word: Uint256, player_count: u32) -> Result<u32, ContractError> {
    if player_count == 0 {
        return Err(ContractError::NoPlayers);
    }
    let index = random_word % Uint256::from(player_count);
    // index < player_count, so it fits
    Ok(Uint128::try_from(index).map_err(StdError::from)?.u128() as u32)
}

/// Enter the current round. The whole amount sent is kept, overpayment included.
pub fn enter(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let amount = paid_amount(&info, &config.denom)?;
    if amount < config.entrance_fee {
        return Err(ContractError::InsufficientPayment {
            sent: amount,
            required: config.entrance_fee,
        });
    }

    let mut state = RAFFLE_STATE.load(deps.storage)?;
    if state.phase != RafflePhase::Open {
        return Err(ContractError::NotOpen { phase: state.phase });
    }

    let slot = state.player_count;
    state.player_count = slot
        .checked_add(1)
        .ok_or(ContractError::RoundFull { max: slot })?;
    PLAYERS.save(deps.storage, (state.round, slot), &info.sender)?;
    state.pot = state.pot.checked_add(amount)?;
    RAFFLE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "enter")
        .add_attribute("participant", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(Event::from(RaffleEvent::Entered {
            participant: info.sender,
            amount,
            round: state.round,
            player_count: state.player_count,
        })))
}

/// Close the round and ask the coordinator for randomness. Anyone can call.
///
/// Eligibility is re-evaluated here so stale or duplicate triggers fail.
/// The request id comes back in the reply to the request submessage, still
/// inside this transaction.
pub fn perform_upkeep(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    _perform_data: Binary,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    let mut state = RAFFLE_STATE.load(deps.storage)?;

    let diagnostics = evaluate_upkeep(&config, &state, env.block.time);
    if !diagnostics.upkeep_needed() {
        return Err(ContractError::UpkeepNotNeeded {
            balance: state.pot,
            num_players: state.player_count,
            phase: state.phase,
        });
    }

    state.phase = RafflePhase::Settling;
    state.pending_request_id = None;
    state.requested_at = Some(env.block.time);
    RAFFLE_STATE.save(deps.storage, &state)?;

    let request = WasmMsg::Execute {
        contract_addr: config.vrf_coordinator.to_string(),
        msg: to_json_binary(&CoordinatorExecuteMsg::RequestRandomWords(
            RandomWordsRequest {
                key_hash: config.key_hash,
                subscription_id: config.subscription_id,
                min_confirmations: config.request_confirmations,
                callback_gas_limit: config.callback_gas_limit,
                num_words: config.num_words,
            },
        ))?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_submessage(SubMsg::reply_on_success(request, REQUEST_REPLY_ID))
        .add_attribute("action", "perform_upkeep")
        .add_attribute("round", state.round.to_string())
        .add_attribute("player_count", state.player_count.to_string()))
}

/// Record the request id the coordinator assigned.
pub fn handle_request_reply(
    deps: DepsMut,
    _env: Env,
    msg: Reply,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let response = msg.result.into_result().map_err(StdError::generic_err)?;

    let event_type = wasm_event_type(REQUEST_EVENT_TYPE);
    let coordinator = config.vrf_coordinator.to_string();
    let request_id = response
        .events
        .iter()
        .filter(|e| e.ty == event_type)
        .filter(|e| {
            e.attributes
                .iter()
                .any(|a| a.key == "_contract_address" && a.value == coordinator)
        })
        .flat_map(|e| e.attributes.iter())
        .find(|a| a.key == REQUEST_ID_ATTRIBUTE)
        .and_then(|a| a.value.parse::<u64>().ok())
        .ok_or(ContractError::MissingRequestId)?;

    let mut state = RAFFLE_STATE.load(deps.storage)?;
    state.pending_request_id = Some(request_id);
    RAFFLE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "request_recorded")
        .add_attribute("request_id", request_id.to_string())
        .add_event(Event::from(RaffleEvent::WinnerRequested {
            request_id,
            round: state.round,
            player_count: state.player_count,
            pot: state.pot,
        })))
}

/// Randomness callback: pick the winner, pay out the pot and open the next round.
///
/// All state changes and the payout commit together. A failed payout is
/// turned into `PayoutFailed` by the reply handler, which reverts the whole
/// transaction.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.vrf_coordinator {
        return Err(ContractError::Unauthorized {
            reason: "only the VRF coordinator can fulfill".to_string(),
        });
    }

    let mut state = RAFFLE_STATE.load(deps.storage)?;
    if state.pending_request_id != Some(request_id) {
        return Err(ContractError::UnknownRequest { request_id });
    }

    let random_word = *random_words.first().ok_or(ContractError::NoRandomWords)?;
    let index = winner_index(random_word, state.player_count)?;
    let winner = PLAYERS.load(deps.storage, (state.round, index))?;
    let payout = state.pot;
    let round = state.round;

    ROUNDS.save(
        deps.storage,
        round,
        &RoundResult {
            round,
            winner: winner.clone(),
            winner_index: index,
            payout,
            player_count: state.player_count,
            request_id,
            random_word,
            settled_at: env.block.time,
        },
    )?;

    state.recent_winner = Some(winner.clone());
    state.pot = Uint128::zero();
    state.round += 1;
    state.player_count = 0;
    state.phase = RafflePhase::Open;
    state.last_settlement = env.block.time;
    state.pending_request_id = None;
    state.requested_at = None;
    state.rounds_completed += 1;
    RAFFLE_STATE.save(deps.storage, &state)?;

    let mut response = Response::new();
    if !payout.is_zero() {
        let send = BankMsg::Send {
            to_address: winner.to_string(),
            amount: coins(payout.u128(), &config.denom),
        };
        let payload = PayoutPayload {
            winner: winner.clone(),
            amount: payout,
        };
        response = response.add_submessage(
            SubMsg::reply_on_error(send, PAYOUT_REPLY_ID).with_payload(to_json_binary(&payload)?),
        );
    }

    Ok(response
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_attribute("payout", payout.to_string())
        .add_event(Event::from(RaffleEvent::WinnerPicked {
            winner,
            payout,
            round,
            request_id,
        })))
}

/// Only reached when the payout send failed.
pub fn handle_payout_reply(
    _deps: DepsMut,
    _env: Env,
    msg: Reply,
) -> Result<Response, ContractError> {
    let payload: PayoutPayload = from_json(&msg.payload)?;
    match msg.result {
        SubMsgResult::Err(reason) => Err(ContractError::PayoutFailed {
            winner: payload.winner.to_string(),
            amount: payload.amount,
            reason,
        }),
        SubMsgResult::Ok(_) => Ok(Response::new()),
    }
}
