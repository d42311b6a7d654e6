//! Phase states and the events emitted as the engine moves between them.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    models::{Chips, Phase, Player, PlayerId, Session},
    setup::DraftSetup,
};

/// Events that occur as the session is set up and played
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SessionEvent {
    SessionStarted { players: usize, total_chips: Chips },
    SessionRestored { players: usize, pot: Chips },
    SessionDiscarded,
    BetPlaced { player_id: PlayerId, amount: Chips },
    PotAwarded { player_id: PlayerId, amount: Chips },
    PersistenceFailed(String),
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::SessionStarted {
                players,
                total_chips,
            } => format!("session started with {players} players and {total_chips} chips"),
            Self::SessionRestored { players, pot } => {
                format!("restored session with {players} players and a pot of {pot}")
            }
            Self::SessionDiscarded => "saved session discarded".to_string(),
            Self::BetPlaced { player_id, amount } => {
                format!("player {player_id} bet {amount}")
            }
            Self::PotAwarded { player_id, amount } => {
                format!("player {player_id} won the pot of {amount}")
            }
            Self::PersistenceFailed(reason) => format!("session not saved: {reason}"),
        };
        write!(f, "{repr}")
    }
}

/// Read access shared by both phases
#[enum_dispatch]
pub trait PhaseState {
    fn phase(&self) -> Phase;
    fn players(&self) -> &[Player];
    fn pot(&self) -> Chips;
}

impl PhaseState for DraftSetup {
    fn phase(&self) -> Phase {
        Phase::Setup
    }

    fn players(&self) -> &[Player] {
        &[]
    }

    fn pot(&self) -> Chips {
        0
    }
}

impl PhaseState for Session {
    fn phase(&self) -> Phase {
        Phase::Active
    }

    fn players(&self) -> &[Player] {
        &self.players
    }

    fn pot(&self) -> Chips {
        self.pot
    }
}

/// The engine is either collecting setup input or running a session
#[enum_dispatch(PhaseState)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineState {
    DraftSetup,
    Session,
}

impl Default for EngineState {
    fn default() -> Self {
        Self::DraftSetup(DraftSetup::default())
    }
}
