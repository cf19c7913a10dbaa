pub mod contract;
pub mod error;
pub mod execute;
pub mod msg;
pub mod query;
pub mod randomness;
pub mod state;
pub mod verify;

pub use crate::error::ContractError;
