use cosmwasm_std::{to_json_binary, Binary, Deps, StdResult};

use crate::execute::requests_awaiting;

use crate::state::{BEACONS, CONFIG, LATEST_ROUND, REQUESTS, SUBSCRIPTIONS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_beacon(deps: Deps, round: u64) -> StdResult<Binary> {
    let beacon = BEACONS.may_load(deps.storage, round)?;
    to_json_binary(&beacon)
}

pub fn query_latest_round(deps: Deps) -> StdResult<Binary> {
    let round = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    to_json_binary(&round)
}

pub fn query_request(deps: Deps, request_id: u64) -> StdResult<Binary> {
    let request = REQUESTS.may_load(deps.storage, request_id)?;
    to_json_binary(&request)
}

pub fn query_subscription(deps: Deps, subscription_id: u64) -> StdResult<Binary> {
    let subscription = SUBSCRIPTIONS.may_load(deps.storage, subscription_id)?;
    to_json_binary(&subscription)
}

pub fn query_pending_requests(deps: Deps, round: u64) -> StdResult<Binary> {
    to_json_binary(&requests_awaiting(deps.storage, round)?)
}
