use cosmwasm_schema::cw_serde;

/// Lifecycle phase of a raffle round.
#[cw_serde]
#[derive(Copy)]
pub enum RafflePhase {
    /// Accepting entries, waiting for the interval to elapse.
    Open,
    /// A randomness request is in flight; entries are rejected.
    Settling,
}

impl RafflePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RafflePhase::Open => "open",
            RafflePhase::Settling => "settling",
        }
    }
}

impl std::fmt::Display for RafflePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
