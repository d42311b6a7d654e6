//! Session engine - setup, betting, pot settlement and save/restore.
//!
//! This module provides:
//! - A two-phase state machine (setup, active) over an owned [`SessionEngine`]
//! - Player and pot models with chip conservation checks
//! - Lenient parsing of raw form input
//! - Events describing every state change

pub mod engine;
pub mod errors;
pub mod functional;
pub mod models;
pub mod setup;
pub mod state_machine;

pub use engine::SessionEngine;
pub use errors::{SessionError, SessionResult};
pub use models::{Chips, Phase, Player, PlayerId, Session};
pub use setup::DraftSetup;
pub use state_machine::{EngineState, PhaseState, SessionEvent};
