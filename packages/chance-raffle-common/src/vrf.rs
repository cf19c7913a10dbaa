//! Wire contract between a randomness consumer and the VRF coordinator.
//!
//! The coordinator accepts [`RandomWordsRequest`] and answers, in a later and
//! independent transaction, with [`ConsumerExecuteMsg::FulfillRandomWords`]
//! sent to the requesting contract.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;

/// Custom event type emitted by the coordinator when a request is accepted.
/// Wasmd prefixes custom event types with `wasm-` when they reach the caller.
pub const REQUEST_EVENT_TYPE: &str = "vrf_random_words_requested";
pub const REQUEST_ID_ATTRIBUTE: &str = "request_id";

pub const MAX_NUM_WORDS: u32 = 500;
pub const MAX_REQUEST_CONFIRMATIONS: u16 = 200;

/// Parameters of a randomness request, as sent to the coordinator.
#[cw_serde]
pub struct RandomWordsRequest {
    pub key_hash: String,
    pub subscription_id: u64,
    pub min_confirmations: u16,
    pub callback_gas_limit: u64,
    pub num_words: u32,
}

/// The coordinator's execute messages that consumers need to know about.
#[cw_serde]
pub enum CoordinatorExecuteMsg {
    RequestRandomWords(RandomWordsRequest),
}

/// Callback every consumer contract must accept.
#[cw_serde]
pub enum ConsumerExecuteMsg {
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}

/// Event type as observed by the caller of a submessage.
pub fn wasm_event_type(ty: &str) -> String {
    format!("wasm-{}", ty)
}
