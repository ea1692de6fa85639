//! Core types for settlement

use pool_ledger::{Player, PlayerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Payment instruction: `from` pays `to` `amount`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Paying player (debtor)
    pub from: PlayerId,

    /// Receiving player (creditor)
    pub to: PlayerId,

    /// Amount, always positive
    pub amount: Decimal,
}

/// Complete settlement for one set of balances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Transfers in emission order
    pub transactions: Vec<Transaction>,

    /// Sum of all transfer amounts
    pub total_transferred: Decimal,

    /// Players with a negative balance
    pub debtor_count: usize,

    /// Players with a positive balance
    pub creditor_count: usize,
}

impl SettlementPlan {
    /// Plan with no transfers
    pub fn empty() -> Self {
        Self {
            transactions: Vec::new(),
            total_transferred: Decimal::ZERO,
            debtor_count: 0,
            creditor_count: 0,
        }
    }

    /// Check if no payments are needed
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Upper bound on transfer count for this plan's participants
    pub fn max_transactions(&self) -> usize {
        (self.debtor_count + self.creditor_count).saturating_sub(1)
    }

    /// Apply every transfer to the given balances
    ///
    /// Returns the resulting balance per player; `from` is credited and `to`
    /// is debited, so a correct plan leaves every entry at zero.
    pub fn apply(&self, players: &[Player]) -> HashMap<PlayerId, Decimal> {
        let mut balances: HashMap<PlayerId, Decimal> = players
            .iter()
            .map(|p| (p.id.clone(), p.balance))
            .collect();

        for tx in &self.transactions {
            *balances.entry(tx.from.clone()).or_insert(Decimal::ZERO) += tx.amount;
            *balances.entry(tx.to.clone()).or_insert(Decimal::ZERO) -= tx.amount;
        }

        balances
    }

    /// Check that applying the plan zeroes every balance
    pub fn verify(&self, players: &[Player]) -> bool {
        self.apply(players).values().all(|b| b.is_zero())
    }

    /// Total paid out by a player
    pub fn paid_by(&self, id: &PlayerId) -> Decimal {
        self.transactions
            .iter()
            .filter(|tx| &tx.from == id)
            .map(|tx| tx.amount)
            .sum()
    }

    /// Total received by a player
    pub fn received_by(&self, id: &PlayerId) -> Decimal {
        self.transactions
            .iter()
            .filter(|tx| &tx.to == id)
            .map(|tx| tx.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, balance: i64) -> Player {
        Player {
            balance: Decimal::from(balance),
            ..Player::with_id(PlayerId::new(id), id)
        }
    }

    #[test]
    fn test_apply_and_verify() {
        let players = vec![player("A", 60), player("B", -30), player("C", -30)];
        let plan = SettlementPlan {
            transactions: vec![
                Transaction {
                    from: PlayerId::new("B"),
                    to: PlayerId::new("A"),
                    amount: Decimal::from(30),
                },
                Transaction {
                    from: PlayerId::new("C"),
                    to: PlayerId::new("A"),
                    amount: Decimal::from(30),
                },
            ],
            total_transferred: Decimal::from(60),
            debtor_count: 2,
            creditor_count: 1,
        };

        assert!(plan.verify(&players));
        assert_eq!(plan.received_by(&PlayerId::new("A")), Decimal::from(60));
        assert_eq!(plan.paid_by(&PlayerId::new("B")), Decimal::from(30));
        assert_eq!(plan.max_transactions(), 2);

        let partial = SettlementPlan {
            transactions: plan.transactions[..1].to_vec(),
            ..plan
        };
        assert!(!partial.verify(&players));
    }

    #[test]
    fn test_empty_plan() {
        let plan = SettlementPlan::empty();
        assert!(plan.is_empty());
        assert_eq!(plan.max_transactions(), 0);
        assert!(plan.verify(&[player("A", 0)]));
    }
}
