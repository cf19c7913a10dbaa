use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("beacon for round {round} already exists")]
    BeaconAlreadyExists { round: u64 },

    #[error("BLS verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("beacon not found for round {round}")]
    BeaconNotFound { round: u64 },

    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("drand period must be greater than zero")]
    InvalidPeriod,

    #[error("subscription {subscription_id} not found")]
    SubscriptionNotFound { subscription_id: u64 },

    #[error("{consumer} is not a consumer of subscription {subscription_id}")]
    InvalidConsumer {
        consumer: String,
        subscription_id: u64,
    },

    #[error("unknown key hash {got}, expected {expected}")]
    InvalidKeyHash { expected: String, got: String },

    #[error("invalid request confirmations: {got} (max {max})")]
    InvalidConfirmations { got: u16, max: u16 },

    #[error("callback gas limit {got} exceeds max {max}")]
    GasLimitTooHigh { got: u64, max: u64 },

    #[error("invalid number of words: {got} (must be between 1 and {max})")]
    InvalidNumWords { got: u32, max: u32 },

    #[error("nonexistent request {request_id}")]
    RequestNotFound { request_id: u64 },

    #[error("request {request_id} already fulfilled")]
    RequestAlreadyFulfilled { request_id: u64 },

    #[error("this message does not accept funds")]
    NonPayable {},

    #[error("chain hash must be 32 bytes of hex, got {got:?}")]
    InvalidChainHash { got: String },
}
