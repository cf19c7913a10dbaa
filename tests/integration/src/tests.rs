//! Integration tests for the Chance raffle and its VRF coordinator.
//!
//! Both contracts run against their own `cosmwasm_std::testing` mocks. The
//! message flow between them is replayed by hand: submessages emitted by one
//! contract are decoded and executed against the other with the emitting
//! contract as sender, and the coordinator's events are wrapped into a
//! `Reply` the way the chain would deliver them.
//!
//! Run:
//! ```bash
//! cargo test -p chance-raffle-integration-tests
//! ```

use chance_raffle_common::vrf::wasm_event_type;
use chance_raffle_common::RafflePhase;
use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, Addr, BankMsg, Binary, CosmosMsg, Env, Event, MemoryStorage, OwnedDeps,
    Reply, Response, SubMsgResponse, SubMsgResult, Timestamp, Uint128, WasmMsg,
};

type MockDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

/// Real drand quicknet public key
const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

const GENESIS_TIME: u64 = 1692803367;
/// A request with 3 confirmations made at this time targets round 1000.
const REQUEST_TIME: u64 = GENESIS_TIME + 2985;
/// Raffle creation time, one interval before the request.
const RAFFLE_START: u64 = REQUEST_TIME - INTERVAL;

const DENOM: &str = "inj";
/// 0.01 INJ
const FEE: u128 = 10_000_000_000_000_000;
const INTERVAL: u64 = 60;

// ─── Helpers ───

fn env_at(seconds: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(seconds);
    env
}

fn raffle_addr() -> Addr {
    MockApi::default().addr_make("raffle")
}

fn coordinator_addr() -> Addr {
    MockApi::default().addr_make("coordinator")
}

/// Wrap a contract response into the submessage result the chain would
/// hand to the caller's `reply`.
#[allow(deprecated)]
fn to_reply(id: u64, contract: &Addr, res: &Response) -> Reply {
    let events = res
        .events
        .iter()
        .map(|e| {
            Event::new(wasm_event_type(&e.ty))
                .add_attribute("_contract_address", contract.to_string())
                .add_attributes(e.attributes.clone())
        })
        .collect();
    Reply {
        id,
        payload: Binary::default(),
        gas_used: 0,
        result: SubMsgResult::Ok(SubMsgResponse {
            events,
            data: res.data.clone(),
            msg_responses: vec![],
        }),
    }
}

// ─── Coordinator helpers ───

fn setup_coordinator() -> MockDeps {
    let mut deps = mock_dependencies();
    let admin = deps.api.addr_make("admin");
    let operator = deps.api.addr_make("operator");
    let msg = chance_vrf_coordinator::msg::InstantiateMsg {
        operators: vec![operator.to_string()],
        quicknet_pubkey_hex: QUICKNET_PK_HEX.to_string(),
        chain_hash: "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971".to_string(),
        genesis_time: GENESIS_TIME,
        period_seconds: 3,
        max_callback_gas_limit: 2_500_000,
    };
    chance_vrf_coordinator::contract::instantiate(
        deps.as_mut(),
        env_at(RAFFLE_START),
        message_info(&admin, &[]),
        msg,
    )
    .unwrap();

    // Subscription 1, with the raffle as its only consumer
    let owner = deps.api.addr_make("owner");
    chance_vrf_coordinator::contract::execute(
        deps.as_mut(),
        env_at(RAFFLE_START),
        message_info(&owner, &[]),
        chance_vrf_coordinator::msg::ExecuteMsg::CreateSubscription {},
    )
    .unwrap();
    chance_vrf_coordinator::contract::execute(
        deps.as_mut(),
        env_at(RAFFLE_START),
        message_info(&owner, &[]),
        chance_vrf_coordinator::msg::ExecuteMsg::AddConsumer {
            subscription_id: 1,
            consumer: raffle_addr().to_string(),
        },
    )
    .unwrap();

    deps
}

fn coordinator_key_hash(coordinator: &MockDeps) -> String {
    let res = chance_vrf_coordinator::contract::query(
        coordinator.as_ref(),
        mock_env(),
        chance_vrf_coordinator::msg::QueryMsg::Config {},
    )
    .unwrap();
    let config: chance_vrf_coordinator::state::CoordinatorConfig = from_json(res).unwrap();
    config.key_hash
}

fn submit_test_beacon(coordinator: &mut MockDeps) {
    let operator = coordinator.api.addr_make("operator");
    chance_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        env_at(REQUEST_TIME + 10),
        message_info(&operator, &[]),
        chance_vrf_coordinator::msg::ExecuteMsg::SubmitBeacon {
            round: TEST_ROUND,
            signature_hex: TEST_SIG_HEX.to_string(),
        },
    )
    .unwrap();
}

// ─── Raffle helpers ───

fn setup_raffle(key_hash: String) -> MockDeps {
    let mut deps = mock_dependencies();
    let creator = deps.api.addr_make("creator");
    let msg = chance_raffle::msg::InstantiateMsg {
        entrance_fee: Uint128::new(FEE),
        denom: DENOM.to_string(),
        interval_seconds: INTERVAL,
        vrf_coordinator: coordinator_addr().to_string(),
        key_hash,
        subscription_id: 1,
        callback_gas_limit: 500_000,
        request_confirmations: Some(3),
    };
    chance_raffle::contract::instantiate(
        deps.as_mut(),
        env_at(RAFFLE_START),
        message_info(&creator, &[]),
        msg,
    )
    .unwrap();
    deps
}

fn enter(raffle: &mut MockDeps, player: &Addr) -> Result<Response, chance_raffle::ContractError> {
    chance_raffle::contract::execute(
        raffle.as_mut(),
        env_at(RAFFLE_START + 5),
        message_info(player, &coins(FEE, DENOM)),
        chance_raffle::msg::ExecuteMsg::Enter {},
    )
}

fn raffle_state(raffle: &MockDeps) -> chance_raffle::state::RaffleState {
    let res = chance_raffle::contract::query(
        raffle.as_ref(),
        mock_env(),
        chance_raffle::msg::QueryMsg::State {},
    )
    .unwrap();
    from_json(res).unwrap()
}

/// Trigger upkeep on the raffle and relay the randomness request to the
/// coordinator, feeding the coordinator's response back as the reply.
/// Returns the request id the raffle recorded.
fn upkeep_and_request(raffle: &mut MockDeps, coordinator: &mut MockDeps) -> u64 {
    let keeper = raffle.api.addr_make("keeper");
    let res = chance_raffle::contract::execute(
        raffle.as_mut(),
        env_at(REQUEST_TIME),
        message_info(&keeper, &[]),
        chance_raffle::msg::ExecuteMsg::PerformUpkeep {
            perform_data: Binary::default(),
        },
    )
    .unwrap();
    assert_eq!(res.messages.len(), 1);

    let submsg = &res.messages[0];
    let request: chance_vrf_coordinator::msg::ExecuteMsg = match &submsg.msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr, msg, ..
        }) => {
            assert_eq!(contract_addr, coordinator_addr().as_str());
            from_json(msg).unwrap()
        }
        other => panic!("expected coordinator call, got {:?}", other),
    };

    let coordinator_res = chance_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        env_at(REQUEST_TIME),
        message_info(&raffle_addr(), &[]),
        request,
    )
    .unwrap();

    chance_raffle::contract::reply(
        raffle.as_mut(),
        env_at(REQUEST_TIME),
        to_reply(submsg.id, &coordinator_addr(), &coordinator_res),
    )
    .unwrap();

    raffle_state(raffle)
        .pending_request_id
        .expect("request id recorded")
}

/// Fulfill on the coordinator and return the consumer callback it emitted,
/// along with the gas limit it was given.
fn fulfill_on_coordinator(
    coordinator: &mut MockDeps,
    request_id: u64,
) -> (chance_raffle::msg::ExecuteMsg, Option<u64>) {
    let relayer = coordinator.api.addr_make("relayer");
    let res = chance_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        env_at(REQUEST_TIME + 12),
        message_info(&relayer, &[]),
        chance_vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords { request_id },
    )
    .unwrap();
    assert_eq!(res.messages.len(), 1);

    let submsg = &res.messages[0];
    match &submsg.msg {
        CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr, msg, ..
        }) => {
            assert_eq!(contract_addr, raffle_addr().as_str());
            (from_json(msg).unwrap(), submsg.gas_limit)
        }
        other => panic!("expected consumer callback, got {:?}", other),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_raffle_round() {
    // Three players enter, upkeep requests randomness from the coordinator,
    // a real drand beacon is submitted, and the callback settles the round.

    let mut coordinator = setup_coordinator();
    let mut raffle = setup_raffle(coordinator_key_hash(&coordinator));

    let players: Vec<Addr> = (0..3)
        .map(|i| raffle.api.addr_make(&format!("player{}", i)))
        .collect();

    // 1. Entries
    for player in &players {
        enter(&mut raffle, player).unwrap();
    }
    let state = raffle_state(&raffle);
    assert_eq!(state.player_count, 3);
    assert_eq!(state.pot, Uint128::new(FEE * 3));

    // 2. Upkeep is needed once the interval has passed
    let res = chance_raffle::contract::query(
        raffle.as_ref(),
        env_at(REQUEST_TIME),
        chance_raffle::msg::QueryMsg::CheckUpkeep {
            check_data: Binary::default(),
        },
    )
    .unwrap();
    let check: chance_raffle::msg::CheckUpkeepResponse = from_json(res).unwrap();
    assert!(check.upkeep_needed);

    // 3. Upkeep + request
    let request_id = upkeep_and_request(&mut raffle, &mut coordinator);
    assert_eq!(request_id, 1);
    assert_eq!(raffle_state(&raffle).phase, RafflePhase::Settling);

    let res = chance_vrf_coordinator::contract::query(
        coordinator.as_ref(),
        mock_env(),
        chance_vrf_coordinator::msg::QueryMsg::Request { request_id },
    )
    .unwrap();
    let request: Option<chance_vrf_coordinator::state::RandomnessRequest> =
        from_json(res).unwrap();
    let request = request.unwrap();
    assert_eq!(request.consumer, raffle_addr());
    assert_eq!(request.target_round, TEST_ROUND);

    // 4. Entries are closed while settling
    let late = raffle.api.addr_make("late");
    let err = enter(&mut raffle, &late).unwrap_err();
    assert!(
        format!("{:?}", err).contains("NotOpen"),
        "Expected NotOpen, got: {:?}",
        err
    );

    // 5. Fulfillment waits for the target beacon
    let relayer = coordinator.api.addr_make("relayer");
    let err = chance_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        env_at(REQUEST_TIME + 5),
        message_info(&relayer, &[]),
        chance_vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords { request_id },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("BeaconNotFound"),
        "Expected missing beacon, got: {:?}",
        err
    );

    // 6. Beacon arrives, coordinator delivers the words
    submit_test_beacon(&mut coordinator);
    let (callback, gas_limit) = fulfill_on_coordinator(&mut coordinator, request_id);
    assert_eq!(gas_limit, Some(500_000));

    let randomness = hex::decode(TEST_RANDOMNESS_HEX).unwrap();
    let expected_words =
        chance_vrf_coordinator::randomness::derive_random_words(&randomness, request_id, 1);
    let words = match &callback {
        chance_raffle::msg::ExecuteMsg::FulfillRandomWords {
            request_id: id,
            random_words,
        } => {
            assert_eq!(*id, request_id);
            random_words.clone()
        }
        other => panic!("unexpected callback {:?}", other),
    };
    assert_eq!(words, expected_words);

    // 7. Raffle settles with the coordinator as sender
    let settle_time = REQUEST_TIME + 12;
    let res = chance_raffle::contract::execute(
        raffle.as_mut(),
        env_at(settle_time),
        message_info(&coordinator_addr(), &[]),
        callback,
    )
    .unwrap();

    let index = chance_raffle::execute::winner_index(words[0], 3).unwrap();
    let winner = players[index as usize].clone();
    assert_eq!(
        res.messages[0].msg,
        CosmosMsg::Bank(BankMsg::Send {
            to_address: winner.to_string(),
            amount: coins(FEE * 3, DENOM),
        })
    );

    let state = raffle_state(&raffle);
    assert_eq!(state.phase, RafflePhase::Open);
    assert_eq!(state.recent_winner, Some(winner));
    assert_eq!(state.pot, Uint128::zero());
    assert_eq!(state.player_count, 0);
    assert_eq!(state.last_settlement, Timestamp::from_seconds(settle_time));

    // 8. The coordinator will not deliver the same request twice
    let err = chance_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        env_at(REQUEST_TIME + 20),
        message_info(&relayer, &[]),
        chance_vrf_coordinator::msg::ExecuteMsg::FulfillRandomWords { request_id },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("RequestAlreadyFulfilled"),
        "Expected already fulfilled, got: {:?}",
        err
    );
}

#[test]
fn test_raffle_must_be_registered_consumer() {
    // A raffle that is not a consumer of the subscription cannot request
    // randomness; the coordinator error aborts the upkeep transaction.

    let mut coordinator = setup_coordinator();
    let owner = coordinator.api.addr_make("owner");
    chance_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        env_at(RAFFLE_START),
        message_info(&owner, &[]),
        chance_vrf_coordinator::msg::ExecuteMsg::RemoveConsumer {
            subscription_id: 1,
            consumer: raffle_addr().to_string(),
        },
    )
    .unwrap();

    let key_hash = coordinator_key_hash(&coordinator);
    let err = chance_vrf_coordinator::contract::execute(
        coordinator.as_mut(),
        env_at(REQUEST_TIME),
        message_info(&raffle_addr(), &[]),
        chance_vrf_coordinator::msg::ExecuteMsg::RequestRandomWords(
            chance_raffle_common::RandomWordsRequest {
                key_hash,
                subscription_id: 1,
                min_confirmations: 3,
                callback_gas_limit: 500_000,
                num_words: 1,
            },
        ),
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("InvalidConsumer"),
        "Expected invalid consumer, got: {:?}",
        err
    );
}

#[test]
fn test_stale_callback_is_rejected() {
    // A callback for a request the raffle is not waiting on fails, which
    // reverts the coordinator's fulfillment on chain.

    let mut coordinator = setup_coordinator();
    let mut raffle = setup_raffle(coordinator_key_hash(&coordinator));

    let player = raffle.api.addr_make("player0");
    enter(&mut raffle, &player).unwrap();
    let request_id = upkeep_and_request(&mut raffle, &mut coordinator);

    let err = chance_raffle::contract::execute(
        raffle.as_mut(),
        env_at(REQUEST_TIME + 12),
        message_info(&coordinator_addr(), &[]),
        chance_raffle::msg::ExecuteMsg::FulfillRandomWords {
            request_id: request_id + 1,
            random_words: vec![Uint128::new(7).into()],
        },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("UnknownRequest"),
        "Expected unknown request, got: {:?}",
        err
    );

    // The round is still waiting on the real request
    let state = raffle_state(&raffle);
    assert_eq!(state.phase, RafflePhase::Settling);
    assert_eq!(state.pending_request_id, Some(request_id));
    assert_eq!(state.pot, Uint128::new(FEE));
}

#[test]
fn test_consecutive_rounds() {
    // After a settlement the next round opens immediately and runs
    // independently of the first.

    let mut coordinator = setup_coordinator();
    let mut raffle = setup_raffle(coordinator_key_hash(&coordinator));
    submit_test_beacon(&mut coordinator);

    let alice = raffle.api.addr_make("alice");
    enter(&mut raffle, &alice).unwrap();
    let first = upkeep_and_request(&mut raffle, &mut coordinator);
    let (callback, _) = fulfill_on_coordinator(&mut coordinator, first);
    chance_raffle::contract::execute(
        raffle.as_mut(),
        env_at(REQUEST_TIME + 12),
        message_info(&coordinator_addr(), &[]),
        callback,
    )
    .unwrap();

    // A single player always wins
    let state = raffle_state(&raffle);
    assert_eq!(state.recent_winner, Some(alice.clone()));
    assert_eq!(state.round, 2);

    let bob = raffle.api.addr_make("bob");
    enter(&mut raffle, &bob).unwrap();

    let res = chance_raffle::contract::query(
        raffle.as_ref(),
        mock_env(),
        chance_raffle::msg::QueryMsg::Players {
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let players: chance_raffle::msg::PlayersResponse = from_json(res).unwrap();
    assert_eq!(players.round, 2);
    assert_eq!(players.players, vec![bob]);

    let res = chance_raffle::contract::query(
        raffle.as_ref(),
        mock_env(),
        chance_raffle::msg::QueryMsg::RoundHistory {
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let history: chance_raffle::msg::RoundHistoryResponse = from_json(res).unwrap();
    assert_eq!(history.rounds.len(), 1);
    assert_eq!(history.rounds[0].winner, alice);
    assert_eq!(history.rounds[0].request_id, first);
}
