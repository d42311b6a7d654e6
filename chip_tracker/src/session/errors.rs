//! Session error types.

use thiserror::Error;

use super::models::{Chips, PlayerId};
use crate::store::StoreError;

/// Session engine errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Bad input: player count, slot index, numeric text, or an operation
    /// issued in the wrong phase
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Bet exceeds the player's balance
    #[error("Insufficient funds for player {player_id}: available {available}, required {required}")]
    InsufficientFunds {
        player_id: PlayerId,
        available: Chips,
        required: Chips,
    },

    /// No player with this ID in the session
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// Stored blob is not a valid session
    #[error("Corrupt saved session: {0}")]
    CorruptSession(String),

    /// Session couldn't be encoded for saving
    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),

    /// Saving the session failed; in-memory state is still current
    #[error("Failed to save session: {0}")]
    PersistenceWrite(#[from] StoreError),
}

impl SessionError {
    /// Get a message suitable for showing to the player
    ///
    /// Store failures are reduced to a generic message so that paths and
    /// OS error details don't leak into the UI.
    pub fn client_message(&self) -> String {
        match self {
            SessionError::PersistenceWrite(_) | SessionError::Encode(_) => {
                "Session could not be saved".to_string()
            }
            SessionError::CorruptSession(_) => {
                "Saved session is damaged and was discarded".to_string()
            }
            SessionError::InsufficientFunds {
                available,
                required,
                ..
            } => format!("Not enough chips: has {available}, needs {required}"),
            _ => self.to_string(),
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
