//! Session data models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chip amount type
pub type Chips = i64;

/// Player ID type (1-based, assigned in setup order)
pub type PlayerId = u32;

/// A seated player and their current chip stack
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub balance: Chips,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, balance: Chips) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.balance)
    }
}

/// Full game state: the players in setup order and the shared pot.
///
/// This is also the persisted blob shape:
/// `{ "players": [{ "id": 1, "name": "A", "balance": 100 }], "pot": 0 }`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Session {
    pub players: Vec<Player>,
    pub pot: Chips,
}

impl Session {
    #[must_use]
    pub fn new(players: Vec<Player>) -> Self {
        Self { players, pot: 0 }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Sum of all balances plus the pot, or `None` on overflow.
    #[must_use]
    pub fn total_chips(&self) -> Option<Chips> {
        self.players
            .iter()
            .try_fold(self.pot, |acc, p| acc.checked_add(p.balance))
    }

    /// Check the structural invariants a restored blob must satisfy.
    ///
    /// Returns a description of the first violation found.
    pub fn check_integrity(&self) -> Result<(), String> {
        if self.players.is_empty() {
            return Err("session has no players".to_string());
        }
        if self.pot < 0 {
            return Err(format!("negative pot {}", self.pot));
        }

        for (slot, player) in self.players.iter().enumerate() {
            if usize::try_from(player.id).ok() != Some(slot + 1) {
                return Err(format!(
                    "player id {} at position {} breaks the 1..n sequence",
                    player.id,
                    slot + 1
                ));
            }
            if player.balance < 0 {
                return Err(format!(
                    "player {} has negative balance {}",
                    player.id, player.balance
                ));
            }
        }

        if self.total_chips().is_none() {
            return Err("chip total overflows".to_string());
        }

        Ok(())
    }
}

/// Engine phase
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Active,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Setup => write!(f, "setup"),
            Phase::Active => write!(f, "active"),
        }
    }
}
