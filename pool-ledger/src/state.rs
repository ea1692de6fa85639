//! Application state
//!
//! [`PoolSession`] owns the roster, the game log and the current page, and
//! persists them through an injected [`StateStore`]:
//!
//! - load once at startup
//! - save after every successful mutation
//!
//! Balances are never stored here; [`PoolSession::balances`] derives them
//! from the current snapshot on demand.

use crate::{
    balance::compute_balances,
    error::{Error, Result},
    storage::StateStore,
    types::{AppState, Game, Page, Player, PlayerId},
    validation::{check_wager, parse_player_name},
    Config,
};
use rust_decimal::Decimal;

/// Persisted pool session
#[derive(Debug)]
pub struct PoolSession<S: StateStore> {
    state: AppState,
    store: S,
    config: Config,
}

impl<S: StateStore> PoolSession<S> {
    /// Load session from store
    ///
    /// A missing entry starts a fresh session. An entry that fails to
    /// deserialize is logged and replaced by a fresh session.
    pub fn load(store: S, config: Config) -> Result<Self> {
        let state = match store.load(&config.storage_key)? {
            Some(raw) => match serde_json::from_str::<AppState>(&raw) {
                Ok(state) => {
                    tracing::info!(
                        "Loaded pool state: {} players, {} games, page {}",
                        state.players.len(),
                        state.games.len(),
                        state.current_page
                    );
                    state
                }
                Err(e) => {
                    tracing::error!("Failed to load saved state: {}", e);
                    AppState::default()
                }
            },
            None => AppState::default(),
        };

        Ok(Self {
            state,
            store,
            config,
        })
    }

    /// Current snapshot
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Roster in insertion order
    pub fn players(&self) -> &[Player] {
        &self.state.players
    }

    /// Game log in recording order
    pub fn games(&self) -> &[Game] {
        &self.state.games
    }

    /// Current page
    pub fn current_page(&self) -> Page {
        self.state.current_page
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Players with balances derived from the full game log
    pub fn balances(&self) -> Vec<Player> {
        compute_balances(&self.state.players, &self.state.games)
    }

    /// Add a player to the roster
    pub fn add_player(&mut self, name: &str) -> Result<&Player> {
        let name = parse_player_name(name)?;
        let player = Player::new(name);

        tracing::info!("Adding player {} ({})", player.name, player.id);

        let index = self.mutate(|state| {
            state.players.push(player);
            state.players.len() - 1
        })?;
        Ok(&self.state.players[index])
    }

    /// Remove a player from the roster
    ///
    /// Players who won a recorded game cannot be removed, so every game
    /// keeps a winner in the roster.
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Player> {
        let position = self
            .state
            .players
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| Error::UnknownPlayer(id.clone()))?;

        if let Some(game) = self.state.games.iter().find(|g| &g.winner_id == id) {
            return Err(Error::PlayerReferenced {
                player: id.clone(),
                game: game.id.clone(),
            });
        }

        tracing::info!("Removing player {}", id);

        self.mutate(|state| state.players.remove(position))
    }

    /// Record a finished game
    pub fn record_game(&mut self, wager: Decimal, winner_id: &PlayerId) -> Result<&Game> {
        self.ensure_min_players()?;
        let wager = check_wager(wager)?;

        if self.state.player(winner_id).is_none() {
            return Err(Error::UnknownPlayer(winner_id.clone()));
        }

        let game = Game::new(wager, winner_id.clone());
        tracing::info!("Recording game {}: {} won {}", game.id, winner_id, wager);

        let index = self.mutate(|state| {
            state.games.push(game);
            state.games.len() - 1
        })?;
        Ok(&self.state.games[index])
    }

    /// Move to another page
    ///
    /// Games needs a full roster; Summary needs at least one game.
    pub fn navigate(&mut self, page: Page) -> Result<()> {
        match page {
            Page::Setup => {}
            Page::Games => {
                self.ensure_min_players().map_err(|e| Error::Navigation {
                    page,
                    reason: e.to_string(),
                })?;
            }
            Page::Summary => {
                if self.state.games.is_empty() {
                    return Err(Error::Navigation {
                        page,
                        reason: "no games recorded".to_string(),
                    });
                }
            }
        }

        tracing::debug!("Navigating {} -> {}", self.state.current_page, page);

        self.mutate(|state| state.current_page = page)
    }

    /// Clear all players and games and return to setup
    pub fn reset(&mut self) -> Result<()> {
        tracing::info!(
            "Resetting pool ({} players, {} games)",
            self.state.players.len(),
            self.state.games.len()
        );

        self.mutate(|state| *state = AppState::default())
    }

    /// Persist the current snapshot
    pub fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.state)?;
        self.store.save(&self.config.storage_key, &raw)
    }

    fn ensure_min_players(&self) -> Result<()> {
        let actual = self.state.players.len();
        if actual < self.config.min_players {
            return Err(Error::NotEnoughPlayers {
                required: self.config.min_players,
                actual,
            });
        }
        Ok(())
    }

    /// Apply a change and save; on save failure the change is rolled back
    fn mutate<T, F>(&mut self, change: F) -> Result<T>
    where
        F: FnOnce(&mut AppState) -> T,
    {
        let previous = self.state.clone();
        let outcome = change(&mut self.state);

        if let Err(e) = self.save() {
            self.state = previous;
            return Err(e);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn session() -> PoolSession<MemoryStore> {
        PoolSession::load(MemoryStore::new(), Config::default()).unwrap()
    }

    struct FailingStore;

    impl StateStore for FailingStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn save(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("disk full".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_fresh_session() {
        let session = session();
        assert!(session.players().is_empty());
        assert!(session.games().is_empty());
        assert_eq!(session.current_page(), Page::Setup);
    }

    #[test]
    fn test_add_player_persists() {
        let store = MemoryStore::new();
        let mut session = PoolSession::load(&store, Config::default()).unwrap();
        let id = session.add_player("  Alice ").unwrap().id.clone();

        let reloaded = PoolSession::load(&store, Config::default()).unwrap();
        assert_eq!(reloaded.players().len(), 1);
        assert_eq!(reloaded.players()[0].id, id);
        assert_eq!(reloaded.players()[0].name, "Alice");
    }

    #[test]
    fn test_add_player_rejects_blank() {
        let mut session = session();
        assert!(matches!(
            session.add_player("  "),
            Err(Error::InvalidPlayerName(_))
        ));
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_record_game_requires_players() {
        let mut session = session();
        let alice = session.add_player("Alice").unwrap().id.clone();

        assert!(matches!(
            session.record_game(Decimal::from(10), &alice),
            Err(Error::NotEnoughPlayers { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_record_game_and_balances() {
        let mut session = session();
        let a = session.add_player("A").unwrap().id.clone();
        session.add_player("B").unwrap();
        session.add_player("C").unwrap();

        session.record_game(Decimal::from(30), &a).unwrap();

        let balances: Vec<Decimal> = session.balances().iter().map(|p| p.balance).collect();
        assert_eq!(
            balances,
            vec![Decimal::from(60), Decimal::from(-30), Decimal::from(-30)]
        );
        // Stored roster never carries derived balances
        assert!(session.players().iter().all(|p| p.balance == Decimal::ZERO));
    }

    #[test]
    fn test_record_game_validation() {
        let mut session = session();
        let a = session.add_player("A").unwrap().id.clone();
        session.add_player("B").unwrap();

        assert!(matches!(
            session.record_game(Decimal::ZERO, &a),
            Err(Error::InvalidWager(_))
        ));
        assert!(matches!(
            session.record_game(Decimal::from(5), &PlayerId::new("nobody")),
            Err(Error::UnknownPlayer(_))
        ));
        assert!(session.games().is_empty());
    }

    #[test]
    fn test_remove_referenced_player_forbidden() {
        let mut session = session();
        let a = session.add_player("A").unwrap().id.clone();
        let b = session.add_player("B").unwrap().id.clone();
        session.record_game(Decimal::from(10), &a).unwrap();

        assert!(matches!(
            session.remove_player(&a),
            Err(Error::PlayerReferenced { .. })
        ));

        // Losers can still be removed
        let removed = session.remove_player(&b).unwrap();
        assert_eq!(removed.id, b);
        assert!(matches!(
            session.remove_player(&b),
            Err(Error::UnknownPlayer(_))
        ));
    }

    #[test]
    fn test_mutations_return_affected_entries() {
        let mut session = session();
        let a = session.add_player("A").unwrap().id.clone();
        let b = session.add_player("B").unwrap().id.clone();

        let c = session.add_player("C").unwrap();
        assert_eq!(c.name, "C");
        let c = c.id.clone();

        session.record_game(Decimal::from(10), &a).unwrap();
        let game = session.record_game(Decimal::from(25), &c).unwrap();
        assert_eq!(game.wager, Decimal::from(25));
        assert_eq!(game.winner_id, c);

        // Removing from the middle hands back that player and keeps order
        let removed = session.remove_player(&b).unwrap();
        assert_eq!(removed.name, "B");
        let ids: Vec<&PlayerId> = session.players().iter().map(|p| &p.id).collect();
        assert_eq!(ids, vec![&a, &c]);
    }

    #[test]
    fn test_navigation_rules() {
        let mut session = session();
        assert!(matches!(
            session.navigate(Page::Games),
            Err(Error::Navigation { page: Page::Games, .. })
        ));

        let a = session.add_player("A").unwrap().id.clone();
        session.add_player("B").unwrap();
        session.navigate(Page::Games).unwrap();

        assert!(matches!(
            session.navigate(Page::Summary),
            Err(Error::Navigation { page: Page::Summary, .. })
        ));

        session.record_game(Decimal::from(10), &a).unwrap();
        session.navigate(Page::Summary).unwrap();
        assert_eq!(session.current_page(), Page::Summary);

        session.navigate(Page::Setup).unwrap();
        assert_eq!(session.current_page(), Page::Setup);
    }

    #[test]
    fn test_reset() {
        let store = MemoryStore::new();
        let mut session = PoolSession::load(&store, Config::default()).unwrap();
        let a = session.add_player("A").unwrap().id.clone();
        session.add_player("B").unwrap();
        session.record_game(Decimal::from(10), &a).unwrap();
        session.navigate(Page::Games).unwrap();

        session.reset().unwrap();
        assert_eq!(session.state(), &AppState::default());

        let reloaded = PoolSession::load(&store, Config::default()).unwrap();
        assert_eq!(reloaded.state(), &AppState::default());
    }

    #[test]
    fn test_corrupt_state_starts_fresh() {
        let store = MemoryStore::new();
        store
            .save(&Config::default().storage_key, "{not json")
            .unwrap();

        let session = PoolSession::load(&store, Config::default()).unwrap();
        assert_eq!(session.state(), &AppState::default());
    }

    #[test]
    fn test_failed_save_rolls_back() {
        let mut session = PoolSession::load(FailingStore, Config::default()).unwrap();
        assert!(matches!(session.add_player("A"), Err(Error::Storage(_))));
        assert!(session.players().is_empty());
    }
}
