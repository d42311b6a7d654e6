//! Draft setup state: the form data collected before a session exists.

use super::{
    errors::{SessionError, SessionResult},
    functional::{parse_chips, parse_starting_balance, player_name},
    models::{Chips, Player, PlayerId},
};

/// Player count a fresh draft starts with
pub const DEFAULT_NUM_PLAYERS: usize = 2;

/// Raw per-slot input for the players of a session that hasn't started yet.
///
/// Names and balances are kept exactly as typed. An empty string means the
/// slot hasn't been filled in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DraftSetup {
    player_names: Vec<String>,
    player_balances: Vec<String>,
}

impl Default for DraftSetup {
    fn default() -> Self {
        Self::with_players(DEFAULT_NUM_PLAYERS)
    }
}

impl DraftSetup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_players(n: usize) -> Self {
        Self {
            player_names: vec![String::new(); n],
            player_balances: vec![String::new(); n],
        }
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.player_names.len()
    }

    #[must_use]
    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    #[must_use]
    pub fn player_balances(&self) -> &[String] {
        &self.player_balances
    }

    /// Resize the draft to `n` slots. All previous slot input is cleared,
    /// even for slots that still exist.
    pub(crate) fn set_player_count(&mut self, n: usize, max_players: usize) -> SessionResult<()> {
        if n == 0 || n > max_players {
            return Err(SessionError::Validation(format!(
                "player count must be between 1 and {max_players}, got {n}"
            )));
        }
        *self = Self::with_players(n);
        Ok(())
    }

    pub(crate) fn set_player_name(&mut self, slot: usize, text: &str) -> SessionResult<()> {
        let n = self.num_players();
        let name = self
            .player_names
            .get_mut(slot)
            .ok_or_else(|| slot_out_of_range(slot, n))?;
        *name = text.to_string();
        Ok(())
    }

    pub(crate) fn set_player_balance(&mut self, slot: usize, text: &str) -> SessionResult<()> {
        let n = self.num_players();
        let balance = self
            .player_balances
            .get_mut(slot)
            .ok_or_else(|| slot_out_of_range(slot, n))?;
        *balance = text.to_string();
        Ok(())
    }

    /// Build the initial players, one per slot, with IDs `1..=n`.
    ///
    /// In lenient mode a balance that isn't a non-negative integer becomes 0.
    /// In strict mode a non-blank balance must parse as a non-negative
    /// integer; a blank one is still 0.
    pub(crate) fn build_players(
        &self,
        name_prefix: &str,
        strict: bool,
    ) -> SessionResult<Vec<Player>> {
        let mut players = Vec::with_capacity(self.num_players());
        let mut total: Chips = 0;

        for (slot, (name, raw_balance)) in self
            .player_names
            .iter()
            .zip(&self.player_balances)
            .enumerate()
        {
            let id = PlayerId::try_from(slot + 1).map_err(|_| {
                SessionError::Validation(format!("too many players: {}", self.num_players()))
            })?;

            let balance = if strict && !raw_balance.trim().is_empty() {
                parse_chips(raw_balance).filter(|&v| v >= 0).ok_or_else(|| {
                    SessionError::Validation(format!(
                        "starting balance for player {id} is not a non-negative integer: {raw_balance:?}"
                    ))
                })?
            } else {
                parse_starting_balance(raw_balance)
            };

            total = total.checked_add(balance).ok_or_else(|| {
                SessionError::Validation("total starting balance is too large".to_string())
            })?;
            players.push(Player::new(id, player_name(name, name_prefix, id), balance));
        }

        Ok(players)
    }
}

fn slot_out_of_range(slot: usize, num_players: usize) -> SessionError {
    SessionError::Validation(format!(
        "player slot {slot} out of range for {num_players} players"
    ))
}
