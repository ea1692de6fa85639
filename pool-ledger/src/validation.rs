//! Input validation
//!
//! The balance calculator is total: it accepts any snapshot. These checks
//! are the strict layer callers run before recording or settling.

use crate::{
    error::{Error, Result, ValidationError},
    types::{round_currency, Game, Player, PlayerId},
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

/// Minimum roster size for a game to be meaningful
pub const MIN_PLAYERS: usize = 2;

/// Normalize a player name
///
/// Surrounding whitespace is trimmed; an empty result is rejected.
pub fn parse_player_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::InvalidPlayerName(raw.to_string()));
    }
    Ok(name.to_string())
}

/// Parse a wager entered as text
///
/// Accepts plain decimal notation. The result is rounded to currency
/// precision and must be strictly positive.
pub fn parse_wager(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| Error::InvalidWager(raw.to_string()))?;

    check_wager(value).map_err(|_| Error::InvalidWager(raw.to_string()))
}

/// Check a numeric wager and round it to currency precision
pub fn check_wager(wager: Decimal) -> Result<Decimal> {
    let rounded = round_currency(wager);
    if rounded <= Decimal::ZERO {
        return Err(Error::InvalidWager(wager.to_string()));
    }
    Ok(rounded)
}

/// Validate a players/games snapshot
///
/// Reports the first violation found, checking the roster first and then
/// each game in log order.
pub fn validate_pool(
    players: &[Player],
    games: &[Game],
) -> std::result::Result<(), ValidationError> {
    let mut ids: HashSet<&PlayerId> = HashSet::with_capacity(players.len());
    for player in players {
        if !ids.insert(&player.id) {
            return Err(ValidationError::DuplicatePlayer(player.id.clone()));
        }
    }

    for game in games {
        if players.len() < MIN_PLAYERS {
            return Err(ValidationError::TooFewPlayers {
                game: game.id.clone(),
                player_count: players.len(),
            });
        }

        if game.wager <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveWager {
                game: game.id.clone(),
                wager: game.wager,
            });
        }

        if !ids.contains(&game.winner_id) {
            return Err(ValidationError::UnknownWinner {
                game: game.id.clone(),
                winner: game.winner_id.clone(),
            });
        }
    }

    Ok(())
}
