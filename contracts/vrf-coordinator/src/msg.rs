use chance_raffle_common::RandomWordsRequest;
use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{CoordinatorConfig, RandomnessRequest, StoredBeacon, Subscription};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub chain_hash: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
    pub max_callback_gas_limit: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Submit a drand beacon for verification and storage.
    SubmitBeacon {
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
    /// Open a subscription owned by the sender.
    CreateSubscription {},
    /// Allow a contract to request randomness under a subscription (owner only).
    AddConsumer {
        subscription_id: u64,
        consumer: String,
    },
    RemoveConsumer {
        subscription_id: u64,
        consumer: String,
    },
    /// Request random words. The sender receives the callback.
    RequestRandomWords(RandomWordsRequest),
    /// Deliver the words of a pending request once its target beacon is stored.
    /// Anyone can call.
    FulfillRandomWords { request_id: u64 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(CoordinatorConfig)]
    Config {},

    #[returns(Option<StoredBeacon>)]
    Beacon { round: u64 },

    #[returns(u64)]
    LatestRound {},

    #[returns(Option<RandomnessRequest>)]
    Request { request_id: u64 },

    #[returns(Option<Subscription>)]
    Subscription { subscription_id: u64 },

    /// Ids of pending requests whose target is `round`.
    #[returns(Vec<u64>)]
    PendingRequests { round: u64 },
}

#[cw_serde]
pub struct MigrateMsg {}
