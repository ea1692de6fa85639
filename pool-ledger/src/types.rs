//! Core types for the pool ledger
//!
//! All types are designed for:
//! - Stable JSON serialization (camelCase, matching the persisted app state)
//! - Exact arithmetic (Decimal for money)
//! - Read-only snapshots handed to the balance and settlement stages

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of decimal places money is kept at (cents)
pub const CURRENCY_SCALE: u32 = 2;

/// Round an amount to currency precision (midpoint away from zero)
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Player identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create player ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, time-ordered player ID
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Game identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    /// Create game ID from an existing value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, time-ordered game ID
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A member of the pool
///
/// `balance` is derived output. It is overwritten by every balance
/// computation and never read back as input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Player ID (unique, stable)
    pub id: PlayerId,

    /// Display name
    pub name: String,

    /// Net balance (positive = winning, negative = owes money)
    #[serde(default)]
    pub balance: Decimal,
}

impl Player {
    /// Create player with a fresh ID and zero balance
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(PlayerId::generate(), name)
    }

    /// Create player with a known ID and zero balance
    pub fn with_id(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            balance: Decimal::ZERO,
        }
    }

    /// Check if player is a creditor
    pub fn is_creditor(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Check if player is a debtor
    pub fn is_debtor(&self) -> bool {
        self.balance < Decimal::ZERO
    }
}

/// A single recorded game
///
/// Every player in the roster other than the winner forfeits `wager` to the
/// winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Game ID
    pub id: GameId,

    /// Amount each losing player pays the winner
    pub wager: Decimal,

    /// Winning player
    pub winner_id: PlayerId,

    /// When the game was recorded
    pub date: DateTime<Utc>,
}

impl Game {
    /// Create game with a fresh ID, dated now
    pub fn new(wager: Decimal, winner_id: PlayerId) -> Self {
        Self {
            id: GameId::generate(),
            wager,
            winner_id,
            date: Utc::now(),
        }
    }
}

/// Page the application is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Player roster entry
    #[default]
    Setup,
    /// Game entry
    Games,
    /// Balances and settlement
    Summary,
}

impl Page {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "setup" => Some(Page::Setup),
            "games" => Some(Page::Games),
            "summary" => Some(Page::Summary),
            _ => None,
        }
    }

    /// Lowercase page name
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Setup => "setup",
            Page::Games => "games",
            Page::Summary => "summary",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Complete persisted application state
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Roster, in insertion order
    pub players: Vec<Player>,

    /// Append-only game log
    pub games: Vec<Game>,

    /// Current page
    pub current_page: Page,
}

impl AppState {
    /// Find player by ID
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Check whether any recorded game names this player as winner
    pub fn is_referenced(&self, id: &PlayerId) -> bool {
        self.games.iter().any(|g| &g.winner_id == id)
    }
}
