//! # Chip Tracker
//!
//! Chip and pot bookkeeping for a home poker game.
//!
//! Players are configured with a starting balance, bet chips into a shared
//! pot, and the pot is awarded in full to whoever wins the hand. Chips only
//! ever move between players and the pot, so the sum of all balances plus the
//! pot stays equal to the starting total for the whole session.
//!
//! ## Architecture
//!
//! The engine has two phases:
//!
//! - **Setup**: the player count, names and starting balances are entered
//! - **Active**: bets are placed and pots are awarded
//!
//! While active, the session is saved to a [`SessionStore`] after every
//! change, so a later engine can offer to pick it up where it left off.
//!
//! ## Core Modules
//!
//! - [`session`]: The engine, its models, errors and events
//! - [`store`]: Blob storage with expiry ([`MemoryStore`], [`FileStore`])
//! - [`config`]: Engine configuration
//!
//! ## Example
//!
//! ```
//! use chip_tracker::{MemoryStore, Phase, SessionEngine};
//!
//! let mut engine = SessionEngine::with_defaults(MemoryStore::new());
//! engine.set_player_count(2).unwrap();
//! engine.set_player_name(0, "Ann").unwrap();
//! engine.set_player_balance(0, "100").unwrap();
//! engine.set_player_balance(1, "100").unwrap();
//! engine.start_session().unwrap();
//! assert_eq!(engine.phase(), Phase::Active);
//!
//! engine.place_bet(1, "50").unwrap();
//! engine.place_bet(2, "50").unwrap();
//! assert_eq!(engine.assign_pot_to_winner(1).unwrap(), 100);
//! assert_eq!(engine.player(1).unwrap().balance, 150);
//! ```

/// Engine configuration and constants.
pub mod config;
pub use config::{ConfigError, EngineConfig, SESSION_KEY};

/// Session state machine, models and errors.
pub mod session;
pub use session::{
    Chips, DraftSetup, Phase, Player, PlayerId, Session, SessionEngine, SessionError,
    SessionEvent, SessionResult,
};

/// Persistence for the active session.
pub mod store;
pub use store::{FileStore, MemoryStore, SessionStore, StoreError, StoreResult};
