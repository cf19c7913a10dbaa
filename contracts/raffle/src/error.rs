use chance_raffle_common::RafflePhase;
use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("insufficient payment: sent {sent}, entrance fee is {required}")]
    InsufficientPayment { sent: Uint128, required: Uint128 },

    #[error("must send exactly one coin")]
    InvalidFunds,

    #[error("must send {expected}, got {denom}")]
    WrongDenom { expected: String, denom: String },

    #[error("this message does not accept funds")]
    NonPayable {},

    #[error("round is full ({max} players)")]
    RoundFull { max: u32 },

    #[error("raffle is not open (phase: {phase})")]
    NotOpen { phase: RafflePhase },

    #[error("upkeep not needed (balance: {balance}, players: {num_players}, phase: {phase})")]
    UpkeepNotNeeded {
        balance: Uint128,
        num_players: u32,
        phase: RafflePhase,
    },

    #[error("unknown randomness request {request_id}")]
    UnknownRequest { request_id: u64 },

    #[error("fulfillment carried no random words")]
    NoRandomWords,

    #[error("no players in the current round")]
    NoPlayers,

    #[error("payout of {amount} to {winner} failed: {reason}")]
    PayoutFailed {
        winner: String,
        amount: Uint128,
        reason: String,
    },

    #[error("coordinator response did not carry a request id")]
    MissingRequestId,

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
