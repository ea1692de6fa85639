//! Balance calculation
//!
//! Derives every player's net balance from the roster and the game log.
//!
//! # Rule
//!
//! For each game with wager `w` over a roster of `N` players, the winner
//! collects `w` from each of the other `N - 1` players:
//!
//! ```text
//! Players A, B, C; A wins 30
//!   A: +60
//!   B: -30
//!   C: -30
//! ```
//!
//! Balances are always recomputed from scratch. A game whose winner is not
//! in the roster is skipped on both sides so the sheet stays zero-sum.

use crate::types::{Game, Player, PlayerId};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Balances for a roster, plus aggregate checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSheet {
    /// Players in roster order with `balance` populated
    pub players: Vec<Player>,

    /// Games that contributed to the balances
    pub applied_games: usize,

    /// Games skipped because their winner is not in the roster
    pub orphaned_games: usize,

    /// Sum of wagers over the applied games
    pub applied_wagered: Decimal,
}

impl BalanceSheet {
    /// Sum of all balances
    pub fn total(&self) -> Decimal {
        self.players.iter().map(|p| p.balance).sum()
    }

    /// Check zero-sum invariant
    pub fn is_zero_sum(&self) -> bool {
        self.total() == Decimal::ZERO
    }

    /// Balance for a single player
    pub fn balance_of(&self, id: &PlayerId) -> Option<Decimal> {
        self.players.iter().find(|p| &p.id == id).map(|p| p.balance)
    }
}

/// Stateless balance calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Compute the full balance sheet
    pub fn compute_sheet(players: &[Player], games: &[Game]) -> BalanceSheet {
        let index: HashMap<&PlayerId, usize> = players
            .iter()
            .enumerate()
            .map(|(i, p)| (&p.id, i))
            .collect();

        let mut balances = vec![Decimal::ZERO; players.len()];
        let others = Decimal::from(players.len().saturating_sub(1));
        let mut orphaned_games = 0;
        let mut applied_wagered = Decimal::ZERO;

        for game in games {
            let Some(&winner) = index.get(&game.winner_id) else {
                tracing::warn!(
                    "Skipping game {}: winner {} is not in the roster",
                    game.id,
                    game.winner_id
                );
                orphaned_games += 1;
                continue;
            };

            applied_wagered += game.wager;
            for (i, balance) in balances.iter_mut().enumerate() {
                if i == winner {
                    *balance += game.wager * others;
                } else {
                    *balance -= game.wager;
                }
            }
        }

        let players = players
            .iter()
            .zip(balances)
            .map(|(player, balance)| Player {
                balance,
                ..player.clone()
            })
            .collect();

        BalanceSheet {
            players,
            applied_games: games.len() - orphaned_games,
            orphaned_games,
            applied_wagered,
        }
    }
}

/// Compute balances for every player
///
/// Returns the same players in the same order with `balance` overwritten.
/// Any balance already present on the input is ignored.
pub fn compute_balances(players: &[Player], games: &[Game]) -> Vec<Player> {
    BalanceCalculator::compute_sheet(players, games).players
}
