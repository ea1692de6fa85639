//! Error types for the pool ledger

use crate::types::{GameId, Page, PlayerId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Pool snapshot failed strict validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Player name empty after trimming
    #[error("Invalid player name: {0:?}")]
    InvalidPlayerName(String),

    /// Wager not a positive number
    #[error("Invalid wager: {0:?}")]
    InvalidWager(String),

    /// Player not in roster
    #[error("Player not found: {0}")]
    UnknownPlayer(PlayerId),

    /// Player is the winner of a recorded game and cannot be removed
    #[error("Player {player} won game {game} and cannot be removed")]
    PlayerReferenced {
        /// Player that was to be removed
        player: PlayerId,
        /// First game naming the player as winner
        game: GameId,
    },

    /// Not enough players to record a game
    #[error("At least {required} players are required, have {actual}")]
    NotEnoughPlayers {
        /// Minimum roster size
        required: usize,
        /// Current roster size
        actual: usize,
    },

    /// Page transition not allowed in current state
    #[error("Cannot navigate to {page}: {reason}")]
    Navigation {
        /// Requested page
        page: Page,
        /// Why the transition was refused
        reason: String,
    },

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Precondition violations in a players/games snapshot
///
/// The balance calculator stays total and never raises these; they are
/// produced only by [`crate::validation::validate_pool`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Games recorded while the roster has fewer than two players
    #[error("game {game} recorded with only {player_count} player(s)")]
    TooFewPlayers {
        /// Offending game
        game: GameId,
        /// Roster size
        player_count: usize,
    },

    /// Winner not present in roster
    #[error("game {game} names unknown winner {winner}")]
    UnknownWinner {
        /// Offending game
        game: GameId,
        /// Dangling winner ID
        winner: PlayerId,
    },

    /// Wager zero or negative
    #[error("game {game} has non-positive wager {wager}")]
    NonPositiveWager {
        /// Offending game
        game: GameId,
        /// Recorded wager
        wager: Decimal,
    },

    /// Two roster entries share an ID
    #[error("duplicate player id {0}")]
    DuplicatePlayer(PlayerId),
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
