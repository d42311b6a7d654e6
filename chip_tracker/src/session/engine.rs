//! The session engine: setup, restore, betting and pot settlement.

use log::{debug, info, warn};
use std::collections::{HashMap, VecDeque};

use super::{
    errors::{SessionError, SessionResult},
    functional::{parse_chips, parse_chips_or_zero},
    models::{Chips, Phase, Player, PlayerId, Session},
    setup::DraftSetup,
    state_machine::{EngineState, PhaseState, SessionEvent},
};
use crate::{
    config::{EngineConfig, SESSION_KEY},
    store::SessionStore,
};

/// Runs one poker session end-to-end and keeps it saved in a [`SessionStore`].
///
/// A new engine starts in the setup phase. If the store already holds a saved
/// session, the caller must first either [`restore_session`] or
/// [`discard_session`]; that choice is offered once per engine.
///
/// Every successful bet or pot assignment is written back to the store. Write
/// failures don't undo the in-memory change; they're reported through
/// [`take_persistence_error`] and a [`SessionEvent::PersistenceFailed`] event.
///
/// [`restore_session`]: SessionEngine::restore_session
/// [`discard_session`]: SessionEngine::discard_session
/// [`take_persistence_error`]: SessionEngine::take_persistence_error
#[derive(Debug)]
pub struct SessionEngine<S: SessionStore> {
    store: S,
    config: EngineConfig,
    state: EngineState,
    /// Saved blob found at startup, held until the caller decides what to do
    /// with it.
    saved_session: Option<Vec<u8>>,
    /// Chip total when the session started or was restored.
    initial_total: Option<Chips>,
    pending_bets: HashMap<PlayerId, String>,
    events: VecDeque<SessionEvent>,
    persistence_error: Option<SessionError>,
}

impl<S: SessionStore> SessionEngine<S> {
    /// Create an engine on top of `store`, checking it for a saved session
    pub fn new(store: S, config: EngineConfig) -> Self {
        let saved_session = match store.get(SESSION_KEY) {
            Ok(blob) => blob,
            Err(e) => {
                warn!("Couldn't read saved session, starting fresh: {e}");
                None
            }
        };
        if saved_session.is_some() {
            info!("Found a saved session");
        }

        Self {
            store,
            config,
            state: EngineState::default(),
            saved_session,
            initial_total: None,
            pending_bets: HashMap::new(),
            events: VecDeque::new(),
            persistence_error: None,
        }
    }

    /// Create an engine with [`EngineConfig::default`]
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, EngineConfig::default())
    }

    /* Read access */

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Whether a saved session is waiting for [`restore_session`] or
    /// [`discard_session`]
    ///
    /// [`restore_session`]: SessionEngine::restore_session
    /// [`discard_session`]: SessionEngine::discard_session
    #[must_use]
    pub fn awaiting_restore_choice(&self) -> bool {
        self.saved_session.is_some()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Setup form data, while in the setup phase
    #[must_use]
    pub fn draft(&self) -> Option<&DraftSetup> {
        match &self.state {
            EngineState::DraftSetup(draft) => Some(draft),
            EngineState::Session(_) => None,
        }
    }

    /// The running session, while in the active phase
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            EngineState::Session(session) => Some(session),
            EngineState::DraftSetup(_) => None,
        }
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        self.state.players()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players().iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn pot(&self) -> Chips {
        self.state.pot()
    }

    /// Raw bet input currently typed for a player
    #[must_use]
    pub fn pending_bet(&self, id: PlayerId) -> Option<&str> {
        self.pending_bets.get(&id).map(String::as_str)
    }

    /// Chip total fixed when the session started or was restored
    #[must_use]
    pub fn total_chips(&self) -> Option<Chips> {
        self.initial_total
    }

    /// Whether balances plus pot still add up to the starting total
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        match self.session() {
            Some(session) => session.total_chips() == self.initial_total,
            None => true,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the engine, handing back its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> VecDeque<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take the most recent save failure, if any
    pub fn take_persistence_error(&mut self) -> Option<SessionError> {
        self.persistence_error.take()
    }

    /* Saved session choice */

    /// Load the saved session found at startup and go straight to the active
    /// phase
    ///
    /// The restored session is saved again right away, which renews its
    /// expiry.
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - No saved session is waiting
    /// * `SessionError::CorruptSession` - The blob isn't a valid session. The
    ///   engine stays in the setup phase and the blob is removed from the store.
    pub fn restore_session(&mut self) -> SessionResult<()> {
        let blob = self.saved_session.take().ok_or_else(no_saved_session)?;

        let session = match decode_session(&blob) {
            Ok(session) => session,
            Err(e) => {
                warn!("Discarding unusable saved session: {e}");
                if let Err(remove_err) = self.store.remove(SESSION_KEY) {
                    warn!("Couldn't remove unusable saved session: {remove_err}");
                }
                self.state = EngineState::default();
                return Err(e);
            }
        };

        info!(
            "Restored session with {} players, pot {}",
            session.players.len(),
            session.pot
        );
        self.events.push_back(SessionEvent::SessionRestored {
            players: session.players.len(),
            pot: session.pot,
        });
        self.initial_total = session.total_chips();
        self.pending_bets.clear();
        self.state = session.into();
        self.persist();
        Ok(())
    }

    /// Delete the saved session found at startup and continue with setup
    ///
    /// A failure to delete is recorded like any other save failure but
    /// doesn't stop the transition.
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - No saved session is waiting
    pub fn discard_session(&mut self) -> SessionResult<()> {
        self.saved_session.take().ok_or_else(no_saved_session)?;

        if let Err(e) = self.store.remove(SESSION_KEY) {
            self.record_persistence_failure(e.into());
        }
        info!("Discarded saved session");
        self.events.push_back(SessionEvent::SessionDiscarded);
        self.state = EngineState::default();
        Ok(())
    }

    /* Setup phase */

    /// Resize the setup form to `n` players, clearing all entered names and
    /// balances
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - `n` is 0 or above the configured maximum,
    ///   or the engine isn't in the setup phase
    pub fn set_player_count(&mut self, n: usize) -> SessionResult<()> {
        let max_players = self.config.max_players;
        self.draft_mut()?.set_player_count(n, max_players)?;
        debug!("Setup player count set to {n}");
        Ok(())
    }

    /// # Errors
    ///
    /// * `SessionError::Validation` - `slot` is out of range, or the engine
    ///   isn't in the setup phase
    pub fn set_player_name(&mut self, slot: usize, text: &str) -> SessionResult<()> {
        self.draft_mut()?.set_player_name(slot, text)
    }

    /// # Errors
    ///
    /// * `SessionError::Validation` - `slot` is out of range, or the engine
    ///   isn't in the setup phase
    pub fn set_player_balance(&mut self, slot: usize, text: &str) -> SessionResult<()> {
        self.draft_mut()?.set_player_balance(slot, text)
    }

    /// Turn the setup form into a session and enter the active phase.
    ///
    /// Nothing is written to the store until the first bet or pot assignment.
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - Not in the setup phase, or a starting
    ///   balance is rejected (strict parsing, or the total overflows)
    pub fn start_session(&mut self) -> SessionResult<()> {
        let prefix = self.config.default_name_prefix.clone();
        let strict = self.config.strict_parsing;
        let players = self.draft_mut()?.build_players(&prefix, strict)?;

        let session = Session::new(players);
        let total_chips = session.total_chips().unwrap_or_default();
        info!(
            "Session started with {} players, {total_chips} chips",
            session.players.len()
        );
        self.events.push_back(SessionEvent::SessionStarted {
            players: session.players.len(),
            total_chips,
        });
        self.initial_total = Some(total_chips);
        self.pending_bets.clear();
        self.state = session.into();
        Ok(())
    }

    /* Active phase */

    /// Record raw bet input for a player without placing it
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - Not in the active phase
    /// * `SessionError::UnknownPlayer` - No such player
    pub fn set_pending_bet(&mut self, id: PlayerId, text: &str) -> SessionResult<()> {
        let session = self.session_mut()?;
        if session.player(id).is_none() {
            return Err(SessionError::UnknownPlayer(id));
        }
        self.pending_bets.insert(id, text.to_string());
        Ok(())
    }

    /// Place the bet currently typed for a player.
    ///
    /// See [`place_bet`](SessionEngine::place_bet).
    pub fn place_pending_bet(&mut self, id: PlayerId) -> SessionResult<Option<Chips>> {
        let raw = self.pending_bets.get(&id).cloned().unwrap_or_default();
        self.place_bet(id, &raw)
    }

    /// Move `raw_amount` chips from a player into the pot.
    ///
    /// Unparseable input counts as 0 unless strict parsing is enabled. An
    /// amount of 0 or less does nothing and returns `Ok(None)`, leaving the
    /// player's pending input as is. On success the pending input is cleared,
    /// the session is saved, and the bet amount is returned.
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - Not in the active phase, or the amount
    ///   isn't a number with strict parsing enabled
    /// * `SessionError::UnknownPlayer` - No such player
    /// * `SessionError::InsufficientFunds` - The bet exceeds the player's
    ///   balance; nothing changes
    pub fn place_bet(&mut self, id: PlayerId, raw_amount: &str) -> SessionResult<Option<Chips>> {
        let strict = self.config.strict_parsing;
        let session = self.session_mut()?;
        let available = session
            .player(id)
            .ok_or(SessionError::UnknownPlayer(id))?
            .balance;

        let amount = if strict {
            parse_chips(raw_amount).ok_or_else(|| {
                SessionError::Validation(format!("bet amount is not a number: {raw_amount:?}"))
            })?
        } else {
            parse_chips_or_zero(raw_amount)
        };

        if amount <= 0 {
            debug!("Ignoring bet of {amount} from player {id}");
            return Ok(None);
        }
        if available < amount {
            return Err(SessionError::InsufficientFunds {
                player_id: id,
                available,
                required: amount,
            });
        }

        if let Some(player) = session.player_mut(id) {
            player.balance -= amount;
        }
        // Chips only move between players and the pot, so the pot never
        // exceeds the starting total.
        session.pot += amount;

        debug!("Player {id} bet {amount}, pot is now {}", session.pot);
        self.pending_bets.remove(&id);
        self.events.push_back(SessionEvent::BetPlaced {
            player_id: id,
            amount,
        });
        self.persist();
        Ok(Some(amount))
    }

    /// Give the whole pot to a player and reset it to 0, returning the amount
    /// won
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - Not in the active phase
    /// * `SessionError::UnknownPlayer` - No such player; nothing changes
    pub fn assign_pot_to_winner(&mut self, id: PlayerId) -> SessionResult<Chips> {
        let session = self.session_mut()?;
        let amount = session.pot;
        let player = session
            .player_mut(id)
            .ok_or(SessionError::UnknownPlayer(id))?;
        player.balance += amount;
        session.pot = 0;

        debug!("Player {id} won the pot of {amount}");
        self.events.push_back(SessionEvent::PotAwarded {
            player_id: id,
            amount,
        });
        self.persist();
        Ok(amount)
    }

    /// Write the active session to the store now
    ///
    /// # Errors
    ///
    /// * `SessionError::Validation` - Not in the active phase
    /// * `SessionError::Encode` / `SessionError::PersistenceWrite` - The
    ///   session couldn't be saved
    pub fn save(&mut self) -> SessionResult<()> {
        let session = self
            .session()
            .ok_or_else(|| wrong_phase(Phase::Active, self.phase()))?;
        let blob = serde_json::to_vec(session)?;
        self.store
            .set(SESSION_KEY, &blob, self.config.session_ttl())?;
        debug!("Saved session ({} bytes)", blob.len());
        Ok(())
    }

    /* Internals */

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            self.record_persistence_failure(e);
        }
    }

    fn record_persistence_failure(&mut self, error: SessionError) {
        warn!("Session not saved: {error}");
        self.events
            .push_back(SessionEvent::PersistenceFailed(error.to_string()));
        self.persistence_error = Some(error);
    }

    fn ensure_choice_made(&self) -> SessionResult<()> {
        if self.saved_session.is_some() {
            return Err(SessionError::Validation(
                "restore or discard the saved session first".to_string(),
            ));
        }
        Ok(())
    }

    fn draft_mut(&mut self) -> SessionResult<&mut DraftSetup> {
        self.ensure_choice_made()?;
        let phase = self.phase();
        match &mut self.state {
            EngineState::DraftSetup(draft) => Ok(draft),
            EngineState::Session(_) => Err(wrong_phase(Phase::Setup, phase)),
        }
    }

    fn session_mut(&mut self) -> SessionResult<&mut Session> {
        let phase = self.phase();
        match &mut self.state {
            EngineState::Session(session) => Ok(session),
            EngineState::DraftSetup(_) => Err(wrong_phase(Phase::Active, phase)),
        }
    }
}

fn decode_session(blob: &[u8]) -> SessionResult<Session> {
    let session: Session = serde_json::from_slice(blob)
        .map_err(|e| SessionError::CorruptSession(e.to_string()))?;
    session
        .check_integrity()
        .map_err(SessionError::CorruptSession)?;
    Ok(session)
}

fn no_saved_session() -> SessionError {
    SessionError::Validation("no saved session to restore or discard".to_string())
}

fn wrong_phase(expected: Phase, actual: Phase) -> SessionError {
    SessionError::Validation(format!("only allowed in {expected} phase, engine is in {actual} phase"))
}
