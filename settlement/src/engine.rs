//! Main settlement engine
//!
//! Orchestrates validation, balance computation and netting over a
//! players/games snapshot.

use crate::{
    config::Config,
    netting::SettlementPlanner,
    report::{PlayerStanding, PoolSummary},
    types::SettlementPlan,
    Result,
};
use pool_ledger::{
    validate_pool, BalanceCalculator, BalanceSheet, Game, Player, PoolSession, StateStore,
};

/// Settlement engine
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    /// Netting planner
    planner: SettlementPlanner,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let planner = SettlementPlanner::new(&config.netting);

        Ok(Self { planner, config })
    }

    /// Engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compute the balance sheet for a snapshot
    pub fn balance_sheet(&self, players: &[Player], games: &[Game]) -> Result<BalanceSheet> {
        if self.config.strict_validation {
            validate_pool(players, games)?;
        }
        Ok(BalanceCalculator::compute_sheet(players, games))
    }

    /// Compute balances for a snapshot
    pub fn balances(&self, players: &[Player], games: &[Game]) -> Result<Vec<Player>> {
        Ok(self.balance_sheet(players, games)?.players)
    }

    /// Plan settlement for players whose balances are already computed
    pub fn plan(&self, balanced_players: &[Player]) -> Result<SettlementPlan> {
        self.planner.plan(balanced_players)
    }

    /// Run the full pipeline: balances, then settlement
    pub fn summarize(&self, players: &[Player], games: &[Game]) -> Result<PoolSummary> {
        tracing::info!(
            "Summarizing pool: {} players, {} games",
            players.len(),
            games.len()
        );

        // Step 1: Balances
        let sheet = self.balance_sheet(players, games)?;

        // Step 2: Settlement
        let plan = self.plan(&sheet.players)?;

        tracing::info!(
            "Summary complete: {} transfers, {} total",
            plan.transactions.len(),
            plan.total_transferred
        );

        // Orphaned games (lenient mode only) count toward neither figure
        Ok(PoolSummary {
            standings: sheet.players.into_iter().map(PlayerStanding::from).collect(),
            plan,
            game_count: sheet.applied_games,
            total_wagered: sheet.applied_wagered,
        })
    }

    /// Run the full pipeline over a session's current snapshot
    pub fn summarize_session<S: StateStore>(&self, session: &PoolSession<S>) -> Result<PoolSummary> {
        self.summarize(session.players(), session.games())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pool_ledger::{MemoryStore, PlayerId, ValidationError};
    use rust_decimal::Decimal;

    fn roster(ids: &[&str]) -> Vec<Player> {
        ids.iter()
            .map(|id| Player::with_id(PlayerId::new(*id), id.to_string()))
            .collect()
    }

    fn game(wager: i64, winner: &str) -> Game {
        Game::new(Decimal::from(wager), PlayerId::new(winner))
    }

    fn engine(strict: bool) -> SettlementEngine {
        SettlementEngine::new(Config {
            strict_validation: strict,
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn test_summarize() {
        let players = roster(&["A", "B", "C"]);
        let games = vec![game(50, "A"), game(20, "C")];

        let summary = engine(true).summarize(&players, &games).unwrap();

        let balances: Vec<Decimal> = summary
            .standings
            .iter()
            .map(|s| s.player.balance)
            .collect();
        assert_eq!(
            balances,
            vec![Decimal::from(80), Decimal::from(-70), Decimal::from(-10)]
        );
        assert_eq!(summary.plan.transactions.len(), 2);
        assert_eq!(summary.game_count, 2);
        assert_eq!(summary.total_wagered, Decimal::from(70));
    }

    #[test]
    fn test_strict_rejects_orphaned_winner() {
        let players = roster(&["A", "B"]);
        let games = vec![game(10, "A"), game(10, "Z")];

        assert!(matches!(
            engine(true).summarize(&players, &games),
            Err(Error::Ledger(pool_ledger::Error::Validation(
                ValidationError::UnknownWinner { .. }
            )))
        ));
    }

    #[test]
    fn test_lenient_skips_orphaned_winner() {
        let players = roster(&["A", "B"]);
        let games = vec![game(10, "A"), game(10, "Z")];

        let summary = engine(false).summarize(&players, &games).unwrap();
        assert_eq!(summary.game_count, 1);
        assert_eq!(summary.total_wagered, Decimal::from(10));
        assert_eq!(summary.plan.transactions.len(), 1);
        assert_eq!(summary.plan.total_transferred, Decimal::from(10));
    }

    #[test]
    fn test_strict_rejects_single_player_games() {
        let players = roster(&["A"]);
        assert!(engine(true).summarize(&players, &[game(10, "A")]).is_err());

        // Lenient mode: the rule degenerates to all zeros
        let summary = engine(false).summarize(&players, &[game(10, "A")]).unwrap();
        assert!(summary.plan.is_empty());
    }

    #[test]
    fn test_summarize_session() {
        let mut session = PoolSession::load(MemoryStore::new(), pool_ledger::Config::default()).unwrap();
        let a = session.add_player("A").unwrap().id.clone();
        session.add_player("B").unwrap();
        session.add_player("C").unwrap();
        session.add_player("D").unwrap();
        session.record_game(Decimal::from(20), &a).unwrap();

        let summary = engine(true).summarize_session(&session).unwrap();
        assert_eq!(summary.plan.transactions.len(), 3);
        assert!(summary.plan.transactions.iter().all(|t| t.to == a));
    }

    #[test]
    fn test_sub_cent_wager_summarized() {
        let ids: Vec<String> = (0..11).map(|i| format!("P{i}")).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let players = roster(&ids);
        let games = vec![Game::new(Decimal::new(5, 3), PlayerId::new("P0"))];

        let summary = engine(true).summarize(&players, &games).unwrap();

        assert_eq!(summary.game_count, 1);
        assert_eq!(summary.total_wagered, Decimal::new(5, 3));
        assert!(!summary.plan.is_empty());
        assert!(summary
            .plan
            .transactions
            .iter()
            .all(|t| t.amount > Decimal::ZERO));

        let balanced: Vec<Player> = summary.standings.iter().map(|s| s.player.clone()).collect();
        for residual in summary.plan.apply(&balanced).values() {
            assert!(residual.abs() <= Decimal::new(1, 2));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.netting.imbalance_tolerance = Decimal::from(-1);
        assert!(matches!(SettlementEngine::new(config), Err(Error::Config(_))));
    }
}
