//! Summary reporting
//!
//! Presentation helpers for the output boundary: standing labels, money
//! formatting and the plain-text summary printed by the `pool` binary.

use crate::types::SettlementPlan;
use pool_ledger::{Player, PlayerId, CURRENCY_SCALE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

/// Label for a player's net position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    /// Balance above zero
    Winning,
    /// Balance below zero
    OwesMoney,
    /// Balance exactly zero
    BreakEven,
}

impl BalanceStatus {
    /// Classify a balance
    pub fn of(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            BalanceStatus::Winning
        } else if balance < Decimal::ZERO {
            BalanceStatus::OwesMoney
        } else {
            BalanceStatus::BreakEven
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            BalanceStatus::Winning => "Winning",
            BalanceStatus::OwesMoney => "Owes Money",
            BalanceStatus::BreakEven => "Break Even",
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Player with computed balance and its label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    /// Player with `balance` populated
    pub player: Player,

    /// Label derived from the balance
    pub status: BalanceStatus,
}

impl From<Player> for PlayerStanding {
    fn from(player: Player) -> Self {
        let status = BalanceStatus::of(player.balance);
        Self { player, status }
    }
}

/// Format an amount as dollars: absolute value, two decimals
pub fn format_money(amount: Decimal) -> String {
    format!("${:.*}", CURRENCY_SCALE as usize, amount.abs())
}

/// Result of running the full pipeline over one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    /// Every player in roster order
    pub standings: Vec<PlayerStanding>,

    /// Payments that settle all balances
    pub plan: SettlementPlan,

    /// Games included in the balances
    pub game_count: usize,

    /// Sum of wagers across all games
    pub total_wagered: Decimal,
}

impl PoolSummary {
    /// Name for a player ID, or "Unknown player"
    pub fn player_name(&self, id: &PlayerId) -> &str {
        self.standings
            .iter()
            .find(|s| &s.player.id == id)
            .map(|s| s.player.name.as_str())
            .unwrap_or("Unknown player")
    }

    /// Render balances and payments as text
    pub fn render(&self) -> String {
        let mut out = String::new();
        let width = self
            .standings
            .iter()
            .map(|s| s.player.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Player".len());

        // Writing to a String cannot fail
        let _ = writeln!(out, "Poker Pool Summary");
        let _ = writeln!(
            out,
            "{} game(s), {} wagered",
            self.game_count,
            format_money(self.total_wagered)
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "Player Balances");
        let _ = writeln!(out, "{:<width$}  {:>12}  Status", "Player", "Balance");
        for standing in &self.standings {
            let _ = writeln!(
                out,
                "{:<width$}  {:>12}  {}",
                standing.player.name,
                format_money(standing.player.balance),
                standing.status
            );
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Settlement");
        if self.plan.is_empty() {
            let _ = writeln!(out, "No payments needed");
        } else {
            for tx in &self.plan.transactions {
                let _ = writeln!(
                    out,
                    "{} pays {} {}",
                    self.player_name(&tx.from),
                    self.player_name(&tx.to),
                    format_money(tx.amount)
                );
            }
        }

        out
    }
}
