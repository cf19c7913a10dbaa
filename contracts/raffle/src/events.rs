use cosmwasm_std::{Addr, Event, Uint128};

/// Observable raffle activity. Every variant maps to one cosmwasm `Event`.
#[derive(Debug, Clone, PartialEq)]
pub enum RaffleEvent {
    Entered {
        participant: Addr,
        amount: Uint128,
        round: u64,
        player_count: u32,
    },
    WinnerRequested {
        request_id: u64,
        round: u64,
        player_count: u32,
        pot: Uint128,
    },
    WinnerPicked {
        winner: Addr,
        payout: Uint128,
        round: u64,
        request_id: u64,
    },
}

impl From<RaffleEvent> for Event {
    fn from(event: RaffleEvent) -> Self {
        match event {
            RaffleEvent::Entered {
                participant,
                amount,
                round,
                player_count,
            } => Event::new("raffle_enter")
                .add_attribute("participant", participant)
                .add_attribute("amount", amount.to_string())
                .add_attribute("round", round.to_string())
                .add_attribute("player_count", player_count.to_string()),
            RaffleEvent::WinnerRequested {
                request_id,
                round,
                player_count,
                pot,
            } => Event::new("raffle_winner_requested")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("round", round.to_string())
                .add_attribute("player_count", player_count.to_string())
                .add_attribute("pot", pot.to_string()),
            RaffleEvent::WinnerPicked {
                winner,
                payout,
                round,
                request_id,
            } => Event::new("raffle_winner_picked")
                .add_attribute("winner", winner)
                .add_attribute("payout", payout.to_string())
                .add_attribute("round", round.to_string())
                .add_attribute("request_id", request_id.to_string()),
        }
    }
}
