use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Empty, Timestamp, Uint256};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<CoordinatorConfig> = Item::new("config");
pub const BEACONS: Map<u64, StoredBeacon> = Map::new("beacons");
pub const LATEST_ROUND: Item<u64> = Item::new("latest_round");
pub const SUBSCRIPTIONS: Map<u64, Subscription> = Map::new("subscriptions");
pub const NEXT_SUBSCRIPTION_ID: Item<u64> = Item::new("next_sub_id");
pub const REQUESTS: Map<u64, RandomnessRequest> = Map::new("requests");
pub const NEXT_REQUEST_ID: Item<u64> = Item::new("next_request_id");
/// Pending requests indexed by (target_round, request_id). Entries are
/// removed on fulfillment.
pub const AWAITING_BEACON: Map<(u64, u64), Empty> = Map::new("awaiting_beacon");

#[cw_serde]
pub struct CoordinatorConfig {
    pub admin: Addr,
    pub operators: Vec<Addr>,
    /// Quicknet public key, 96 bytes (G2 point)
    pub quicknet_pubkey: Vec<u8>,
    /// hex(sha256(quicknet_pubkey)); consumers name the feed by this
    pub key_hash: String,
    /// Chain hash identifying the drand network
    pub chain_hash: String,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    /// Period between rounds in seconds (3 for quicknet)
    pub period_seconds: u64,
    pub max_callback_gas_limit: u64,
}

#[cw_serde]
pub struct StoredBeacon {
    pub round: u64,
    /// sha256(signature), 32 bytes
    pub randomness: Vec<u8>,
    /// BLS signature on G1, 48 bytes
    pub signature: Vec<u8>,
    pub verified: bool,
    pub submitted_at: Timestamp,
    pub submitted_by: Addr,
}

#[cw_serde]
pub struct Subscription {
    pub id: u64,
    pub owner: Addr,
    pub consumers: Vec<Addr>,
    pub created_at: Timestamp,
}

#[cw_serde]
pub enum RequestStatus {
    Pending,
    Fulfilled,
}

#[cw_serde]
pub struct RandomnessRequest {
    pub id: u64,
    pub consumer: Addr,
    pub subscription_id: u64,
    pub min_confirmations: u16,
    pub callback_gas_limit: u64,
    pub num_words: u32,
    /// The only drand round whose beacon may fulfill this request
    pub target_round: u64,
    pub requested_at: Timestamp,
    pub requested_height: u64,
    pub status: RequestStatus,
    pub random_words: Option<Vec<Uint256>>,
    pub fulfilled_at: Option<Timestamp>,
}
