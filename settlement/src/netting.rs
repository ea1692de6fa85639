//! Settlement netting
//!
//! Turns player balances into direct payments that zero every balance.
//!
//! # Algorithm
//!
//! 1. Reject rosters whose exact debts and credits disagree
//! 2. Round balances to currency precision, keeping the total intact
//! 3. Split into debtors (negative) and creditors (positive)
//! 4. Sort debtors largest debt first, creditors largest credit first
//!    (stable, so equal balances keep roster order)
//! 5. Greedy matching: each debtor pays creditors in order until settled
//! 6. Fail if any player ends up more than the tolerance away from zero
//!
//! # Example
//!
//! ```text
//! Balances:
//!   A: +80  (creditor)
//!   B: -70  (debtor)
//!   C: -10  (debtor)
//!
//! Transfers:
//!   B pays A: 70
//!   C pays A: 10
//! ```
//!
//! Each transfer exhausts the debtor or the creditor, so a plan never has
//! more than `debtors + creditors - 1` transfers. Greedy matching is not
//! guaranteed to reach the minimum possible count.

use crate::{
    config::NettingConfig,
    types::{SettlementPlan, Transaction},
    Error, Result,
};
use pool_ledger::{Player, PlayerId, ValidationError};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;

/// Greedy settlement planner
#[derive(Debug, Clone)]
pub struct SettlementPlanner {
    /// Decimal places amounts are rounded to
    currency_scale: u32,

    /// Largest tolerated debt/credit mismatch
    imbalance_tolerance: Decimal,
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self::new(&NettingConfig::default())
    }
}

impl SettlementPlanner {
    /// Create new planner
    pub fn new(config: &NettingConfig) -> Self {
        Self {
            currency_scale: config.currency_scale,
            imbalance_tolerance: config.imbalance_tolerance,
        }
    }

    /// Plan transfers that settle every balance
    ///
    /// Either a complete plan is returned or an error; never a partial list.
    pub fn plan(&self, players: &[Player]) -> Result<SettlementPlan> {
        let mut seen: HashSet<&PlayerId> = HashSet::with_capacity(players.len());
        for player in players {
            if !seen.insert(&player.id) {
                return Err(ValidationError::DuplicatePlayer(player.id.clone()).into());
            }
        }

        // Exact totals: rounding must not manufacture an imbalance
        let total_debt: Decimal = players
            .iter()
            .filter(|p| p.balance < Decimal::ZERO)
            .map(|p| -p.balance)
            .sum();
        let total_credit: Decimal = players
            .iter()
            .filter(|p| p.balance > Decimal::ZERO)
            .map(|p| p.balance)
            .sum();

        if (total_debt - total_credit).abs() > self.imbalance_tolerance {
            tracing::warn!(
                "Rejecting settlement: debt {} vs credit {}",
                total_debt,
                total_credit
            );
            return Err(Error::SettlementImbalance {
                total_debt,
                total_credit,
            });
        }

        let rounded = self.round_balances(players);

        // Remaining balance per roster position
        let mut remaining = rounded.clone();

        let mut debtors: Vec<usize> = (0..players.len())
            .filter(|&i| remaining[i] < Decimal::ZERO)
            .collect();
        let mut creditors: Vec<usize> = (0..players.len())
            .filter(|&i| remaining[i] > Decimal::ZERO)
            .collect();

        // Stable sorts: ties keep roster order
        debtors.sort_by(|&a, &b| remaining[a].cmp(&remaining[b]));
        creditors.sort_by(|&a, &b| remaining[b].cmp(&remaining[a]));

        let mut transactions = Vec::new();

        // Greedy matching: each debtor pays the largest creditors first
        for &debtor in &debtors {
            for &creditor in &creditors {
                let debt = -remaining[debtor];
                if debt <= Decimal::ZERO {
                    break;
                }

                let credit = remaining[creditor];
                if credit <= Decimal::ZERO {
                    continue;
                }

                let amount = debt.min(credit);
                if amount > Decimal::ZERO {
                    tracing::debug!(
                        "{} pays {} {}",
                        players[debtor].id,
                        players[creditor].id,
                        amount
                    );

                    transactions.push(Transaction {
                        from: players[debtor].id.clone(),
                        to: players[creditor].id.clone(),
                        amount,
                    });

                    remaining[debtor] += amount;
                    remaining[creditor] -= amount;
                }
            }
        }

        // What each player is left with once the rounded transfers are made
        for (i, player) in players.iter().enumerate() {
            let settled = rounded[i] - remaining[i];
            let residual = player.balance - settled;
            if residual.abs() > self.imbalance_tolerance {
                tracing::warn!("Unsettled residual {} for {}", residual, player.id);
                return Err(Error::UnsettledResidual {
                    player: player.id.clone(),
                    remaining: residual,
                });
            }
            if !residual.is_zero() {
                tracing::debug!("Dropping sub-tolerance residual {} for {}", residual, player.id);
            }
        }

        let total_transferred: Decimal = transactions.iter().map(|t| t.amount).sum();

        tracing::info!(
            "Settlement planned: {} debtors, {} creditors -> {} transfers ({} total)",
            debtors.len(),
            creditors.len(),
            transactions.len(),
            total_transferred
        );

        Ok(SettlementPlan {
            transactions,
            total_transferred,
            debtor_count: debtors.len(),
            creditor_count: creditors.len(),
        })
    }

    /// Round balances to currency precision without drifting the total
    ///
    /// Every balance is floored to whole currency units, then the units lost
    /// to flooring go back one at a time to the largest remainders (ties in
    /// roster order). The rounded total is the exact total rounded once, so
    /// a zero-sum roster stays zero-sum and no balance moves by a full unit.
    fn round_balances(&self, players: &[Player]) -> Vec<Decimal> {
        let unit = Decimal::new(1, self.currency_scale);
        let factor = Decimal::ONE / unit;

        let mut units: Vec<Decimal> = Vec::with_capacity(players.len());
        let mut remainders: Vec<Decimal> = Vec::with_capacity(players.len());
        for player in players {
            let scaled = player.balance * factor;
            let floor = scaled.floor();
            units.push(floor);
            remainders.push(scaled - floor);
        }

        let exact_total: Decimal = players.iter().map(|p| p.balance).sum();
        let target = (exact_total * factor)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let mut missing = target - units.iter().copied().sum::<Decimal>();

        let mut order: Vec<usize> = (0..players.len()).collect();
        order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));
        for i in order {
            if missing <= Decimal::ZERO || remainders[i].is_zero() {
                break;
            }
            units[i] += Decimal::ONE;
            missing -= Decimal::ONE;
        }

        units.into_iter().map(|u| u * unit).collect()
    }
}

/// Plan settlement with the default netting configuration
pub fn plan_settlement(players: &[Player]) -> Result<SettlementPlan> {
    SettlementPlanner::default().plan(players)
}
