pub mod types;
pub mod vrf;

pub use types::RafflePhase;
pub use vrf::{ConsumerExecuteMsg, CoordinatorExecuteMsg, RandomWordsRequest};
