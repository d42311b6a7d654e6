//! Engine configuration.

use chrono::Duration;
use std::env;
use thiserror::Error;

/// Store key the active session is saved under
pub const SESSION_KEY: &str = "poker_session";

/// Default lifetime of a saved session in days
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 1;

/// Longest saved session lifetime accepted, in days
pub const MAX_SESSION_TTL_DAYS: i64 = 3650;

/// Default prefix for unnamed players ("Player 1", "Player 2", ...)
pub const DEFAULT_NAME_PREFIX: &str = "Player";

/// Default upper bound on the player count accepted during setup
pub const DEFAULT_MAX_PLAYERS: usize = 100;

/// Configuration errors
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("Session TTL must be between 1 and 3650 days, got {0}")]
    InvalidTtl(i64),

    #[error("Max players must be at least 1")]
    InvalidMaxPlayers,

    #[error("Default name prefix must not be blank")]
    BlankNamePrefix,
}

/// Session engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long a saved session stays restorable, in days
    pub session_ttl_days: i64,

    /// Prefix used to name players whose name was left blank
    pub default_name_prefix: String,

    /// Reject unparseable numeric input instead of treating it as zero
    pub strict_parsing: bool,

    /// Largest player count accepted during setup
    pub max_players: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            default_name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            strict_parsing: false,
            max_players: DEFAULT_MAX_PLAYERS,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `CHIP_TRACKER_SESSION_TTL_DAYS`: Saved session lifetime (default: 1)
    /// - `CHIP_TRACKER_NAME_PREFIX`: Default player name prefix (default: "Player")
    /// - `CHIP_TRACKER_STRICT_PARSING`: `true`/`false` (default: false)
    /// - `CHIP_TRACKER_MAX_PLAYERS`: Max player count (default: 100)
    ///
    /// Unset or unparseable variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] if the resulting configuration is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            session_ttl_days: env::var("CHIP_TRACKER_SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SESSION_TTL_DAYS),
            default_name_prefix: env::var("CHIP_TRACKER_NAME_PREFIX")
                .unwrap_or_else(|_| DEFAULT_NAME_PREFIX.to_string()),
            strict_parsing: env::var("CHIP_TRACKER_STRICT_PARSING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            max_players: env::var("CHIP_TRACKER_MAX_PLAYERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_PLAYERS),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_SESSION_TTL_DAYS).contains(&self.session_ttl_days) {
            return Err(ConfigError::InvalidTtl(self.session_ttl_days));
        }
        if self.max_players == 0 {
            return Err(ConfigError::InvalidMaxPlayers);
        }
        if self.default_name_prefix.trim().is_empty() {
            return Err(ConfigError::BlankNamePrefix);
        }
        Ok(())
    }

    /// Saved session lifetime as a duration
    ///
    /// Saturates for values too large to represent; stores then reject the
    /// write instead of computing an expiry.
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::try_days(self.session_ttl_days).unwrap_or(Duration::MAX)
    }
}
