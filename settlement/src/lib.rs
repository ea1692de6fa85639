//! Pool Settlement
//!
//! Turns a poker pool's roster and game log into payment instructions.
//!
//! # Architecture
//!
//! The engine runs one pure pipeline per snapshot:
//!
//! 1. **Validation**: reject dangling winners and undersized rosters (optional)
//! 2. **Balances**: derive each player's net position from the game log
//! 3. **Netting**: match debtors with creditors, largest first
//! 4. **Summary**: label standings and render the payment list
//!
//! # Netting Algorithm
//!
//! Uses **greedy largest-first** matching:
//! - Every transfer exhausts a debtor or a creditor
//! - At most `debtors + creditors - 1` transfers
//! - Deterministic: ties keep roster order
//!
//! # Example
//!
//! ```
//! use pool_ledger::{Game, Player};
//! use rust_decimal::Decimal;
//! use settlement::{Config, SettlementEngine};
//!
//! let players = vec![Player::new("Alice"), Player::new("Bob"), Player::new("Carol")];
//! let games = vec![Game::new(Decimal::from(30), players[0].id.clone())];
//!
//! let engine = SettlementEngine::new(Config::default())?;
//! let summary = engine.summarize(&players, &games)?;
//!
//! assert_eq!(summary.plan.transactions.len(), 2);
//! println!("{}", summary.render());
//! # Ok::<(), settlement::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod netting;
pub mod report;
pub mod error;
pub mod config;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, NettingConfig};
pub use engine::SettlementEngine;
pub use netting::{plan_settlement, SettlementPlanner};
pub use report::{format_money, BalanceStatus, PlayerStanding, PoolSummary};
