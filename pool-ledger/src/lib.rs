//! Poker Pool Ledger
//!
//! Roster, game log and balance derivation for a wagered poker pool.
//!
//! # Architecture
//!
//! - **Derived balances**: every balance is a pure function of the game log
//! - **Append-only log**: games are never modified once recorded
//! - **Injected persistence**: the session saves through a [`StateStore`]
//! - **Exact money**: all amounts are `Decimal` at two-decimal precision
//!
//! # Invariants
//!
//! - Zero sum: Σ(balances) == 0 for every roster and game log
//! - Deterministic: same players and games → same balances
//! - Every recorded game's winner stays in the roster
//!
//! # Example
//!
//! ```
//! use pool_ledger::{compute_balances, Game, Player};
//! use rust_decimal::Decimal;
//!
//! let players = vec![Player::new("Alice"), Player::new("Bob"), Player::new("Carol")];
//! let games = vec![Game::new(Decimal::from(30), players[0].id.clone())];
//!
//! let balances = compute_balances(&players, &games);
//! assert_eq!(balances[0].balance, Decimal::from(60));
//! assert_eq!(balances[1].balance, Decimal::from(-30));
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod balance;
pub mod validation;
pub mod storage;
pub mod state;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result, ValidationError};
pub use types::{AppState, Game, GameId, Page, Player, PlayerId, CURRENCY_SCALE};
pub use balance::{compute_balances, BalanceCalculator, BalanceSheet};
pub use validation::validate_pool;
pub use storage::{MemoryStore, RocksStore, StateStore};
pub use state::PoolSession;
pub use config::Config;
