use chance_raffle_common::vrf::{
    ConsumerExecuteMsg, MAX_NUM_WORDS, MAX_REQUEST_CONFIRMATIONS, REQUEST_EVENT_TYPE,
    REQUEST_ID_ATTRIBUTE,
};
use chance_raffle_common::RandomWordsRequest;
use cosmwasm_std::{
    to_json_binary, Addr, DepsMut, Empty, Env, Event, MessageInfo, Order, Response, StdResult,
    Storage, SubMsg, WasmMsg,
};

use crate::error::ContractError;
use crate::randomness::{derive_random_words, first_round_after};
use crate::state::{
    RandomnessRequest, RequestStatus, StoredBeacon, Subscription, AWAITING_BEACON, BEACONS, CONFIG,
    LATEST_ROUND, NEXT_REQUEST_ID, NEXT_SUBSCRIPTION_ID, REQUESTS, SUBSCRIPTIONS,
};
use crate::verify::verify_beacon;

/// Reject coins attached to a coordinator message. Nothing here is paid for,
/// and the contract has no way to send stray funds back.
pub fn nonpayable(info: &MessageInfo) -> Result<(), ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::NonPayable {});
    }
    Ok(())
}

/// Pending requests pinned to `round`, in id order.
pub fn requests_awaiting(storage: &dyn Storage, round: u64) -> StdResult<Vec<u64>> {
    AWAITING_BEACON
        .prefix(round)
        .keys(storage, None, None, Order::Ascending)
        .collect()
}

/// Store a verified quicknet beacon. Operators only.
///
/// The response lists the pending requests the beacon unlocks so relayers
/// know which `FulfillRandomWords` calls will now succeed.
pub fn submit_beacon(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can submit beacons".to_string(),
        });
    }
    if BEACONS.has(deps.storage, round) {
        return Err(ContractError::BeaconAlreadyExists { round });
    }

    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;
    let randomness = verify_beacon(&config.quicknet_pubkey, round, &signature).map_err(|e| {
        ContractError::VerificationFailed {
            reason: e.to_string(),
        }
    })?;

    BEACONS.save(
        deps.storage,
        round,
        &StoredBeacon {
            round,
            randomness: randomness.to_vec(),
            signature,
            verified: true,
            submitted_at: env.block.time,
            submitted_by: info.sender.clone(),
        },
    )?;
    LATEST_ROUND.update(deps.storage, |latest| -> StdResult<_> {
        Ok(latest.max(round))
    })?;

    let unlocked = requests_awaiting(deps.storage, round)?
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    Ok(Response::new()
        .add_attribute("action", "submit_beacon")
        .add_attribute("round", round.to_string())
        .add_attribute("fulfillable_requests", unlocked.clone())
        .add_event(
            Event::new("vrf_beacon_submitted")
                .add_attribute("round", round.to_string())
                .add_attribute("randomness", hex::encode(randomness))
                .add_attribute("submitted_by", info.sender.to_string())
                .add_attribute("fulfillable_requests", unlocked),
        ))
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.operators.retain(|a| a != &addr);
    }

    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.operators.contains(&addr) {
            config.operators.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}

pub fn create_subscription(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let subscription_id = NEXT_SUBSCRIPTION_ID.may_load(deps.storage)?.unwrap_or(1);
    NEXT_SUBSCRIPTION_ID.save(deps.storage, &(subscription_id + 1))?;

    let subscription = Subscription {
        id: subscription_id,
        owner: info.sender.clone(),
        consumers: vec![],
        created_at: env.block.time,
    };
    SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;

    Ok(Response::new()
        .add_attribute("action", "create_subscription")
        .add_attribute("subscription_id", subscription_id.to_string())
        .add_attribute("owner", info.sender.to_string())
        .set_data(to_json_binary(&subscription_id)?))
}

fn load_owned_subscription(
    storage: &dyn Storage,
    sender: &Addr,
    subscription_id: u64,
) -> Result<Subscription, ContractError> {
    let subscription = SUBSCRIPTIONS
        .may_load(storage, subscription_id)?
        .ok_or(ContractError::SubscriptionNotFound { subscription_id })?;
    if subscription.owner != *sender {
        return Err(ContractError::Unauthorized {
            reason: "only the subscription owner can manage consumers".to_string(),
        });
    }
    Ok(subscription)
}

pub fn add_consumer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    subscription_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let mut subscription = load_owned_subscription(deps.storage, &info.sender, subscription_id)?;
    let consumer_addr = deps.api.addr_validate(&consumer)?;

    if !subscription.consumers.contains(&consumer_addr) {
        subscription.consumers.push(consumer_addr);
        SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;
    }

    Ok(Response::new()
        .add_attribute("action", "add_consumer")
        .add_attribute("subscription_id", subscription_id.to_string())
        .add_attribute("consumer", consumer))
}

pub fn remove_consumer(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    subscription_id: u64,
    consumer: String,
) -> Result<Response, ContractError> {
    let mut subscription = load_owned_subscription(deps.storage, &info.sender, subscription_id)?;
    let consumer_addr = deps.api.addr_validate(&consumer)?;

    subscription.consumers.retain(|c| c != &consumer_addr);
    SUBSCRIPTIONS.save(deps.storage, subscription_id, &subscription)?;

    Ok(Response::new()
        .add_attribute("action", "remove_consumer")
        .add_attribute("subscription_id", subscription_id.to_string())
        .add_attribute("consumer", consumer))
}

/// Accept a randomness request from a registered consumer.
///
/// The request is pinned to a single future drand round: the first round
/// published after this block, pushed back by `min_confirmations` rounds.
/// The request id is returned both as response data and in the
/// `vrf_random_words_requested` event.
pub fn request_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request: RandomWordsRequest,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let subscription = SUBSCRIPTIONS
        .may_load(deps.storage, request.subscription_id)?
        .ok_or(ContractError::SubscriptionNotFound {
            subscription_id: request.subscription_id,
        })?;
    if !subscription.consumers.contains(&info.sender) {
        return Err(ContractError::InvalidConsumer {
            consumer: info.sender.to_string(),
            subscription_id: request.subscription_id,
        });
    }

    if request.key_hash != config.key_hash {
        return Err(ContractError::InvalidKeyHash {
            expected: config.key_hash,
            got: request.key_hash,
        });
    }
    if request.min_confirmations > MAX_REQUEST_CONFIRMATIONS {
        return Err(ContractError::InvalidConfirmations {
            got: request.min_confirmations,
            max: MAX_REQUEST_CONFIRMATIONS,
        });
    }
    if request.callback_gas_limit > config.max_callback_gas_limit {
        return Err(ContractError::GasLimitTooHigh {
            got: request.callback_gas_limit,
            max: config.max_callback_gas_limit,
        });
    }
    if request.num_words == 0 || request.num_words > MAX_NUM_WORDS {
        return Err(ContractError::InvalidNumWords {
            got: request.num_words,
            max: MAX_NUM_WORDS,
        });
    }

    let request_id = NEXT_REQUEST_ID.may_load(deps.storage)?.unwrap_or(1);
    NEXT_REQUEST_ID.save(deps.storage, &(request_id + 1))?;

    let target_round = first_round_after(
        config.genesis_time,
        config.period_seconds,
        env.block.time.seconds(),
    ) + u64::from(request.min_confirmations);

    let record = RandomnessRequest {
        id: request_id,
        consumer: info.sender.clone(),
        subscription_id: request.subscription_id,
        min_confirmations: request.min_confirmations,
        callback_gas_limit: request.callback_gas_limit,
        num_words: request.num_words,
        target_round,
        requested_at: env.block.time,
        requested_height: env.block.height,
        status: RequestStatus::Pending,
        random_words: None,
        fulfilled_at: None,
    };
    REQUESTS.save(deps.storage, request_id, &record)?;
    AWAITING_BEACON.save(deps.storage, (target_round, request_id), &Empty {})?;

    Ok(Response::new()
        .add_attribute("action", "request_random_words")
        .add_attribute(REQUEST_ID_ATTRIBUTE, request_id.to_string())
        .add_event(
            Event::new(REQUEST_EVENT_TYPE)
                .add_attribute(REQUEST_ID_ATTRIBUTE, request_id.to_string())
                .add_attribute("consumer", info.sender.to_string())
                .add_attribute("subscription_id", request.subscription_id.to_string())
                .add_attribute("target_round", target_round.to_string())
                .add_attribute("num_words", request.num_words.to_string()),
        )
        .set_data(to_json_binary(&request_id)?))
}

/// Deliver the random words of a pending request to its consumer.
///
/// Anyone can call once the target round's beacon is stored. The callback
/// runs as a plain submessage: if the consumer rejects it, the whole
/// fulfillment reverts and the request stays pending.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    request_id: u64,
) -> Result<Response, ContractError> {
    let mut request = REQUESTS
        .may_load(deps.storage, request_id)?
        .ok_or(ContractError::RequestNotFound { request_id })?;

    if request.status != RequestStatus::Pending {
        return Err(ContractError::RequestAlreadyFulfilled { request_id });
    }

    let beacon = BEACONS
        .may_load(deps.storage, request.target_round)?
        .ok_or(ContractError::BeaconNotFound {
            round: request.target_round,
        })?;

    let random_words = derive_random_words(&beacon.randomness, request_id, request.num_words);

    request.status = RequestStatus::Fulfilled;
    request.random_words = Some(random_words.clone());
    request.fulfilled_at = Some(env.block.time);
    REQUESTS.save(deps.storage, request_id, &request)?;
    AWAITING_BEACON.remove(deps.storage, (request.target_round, request_id));

    let callback = WasmMsg::Execute {
        contract_addr: request.consumer.to_string(),
        msg: to_json_binary(&ConsumerExecuteMsg::FulfillRandomWords {
            request_id,
            random_words,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_submessage(SubMsg::new(callback).with_gas_limit(request.callback_gas_limit))
        .add_attribute("action", "fulfill_random_words")
        .add_attribute(REQUEST_ID_ATTRIBUTE, request_id.to_string())
        .add_event(
            Event::new("vrf_random_words_fulfilled")
                .add_attribute(REQUEST_ID_ATTRIBUTE, request_id.to_string())
                .add_attribute("consumer", request.consumer.to_string())
                .add_attribute("drand_round", beacon.round.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}
