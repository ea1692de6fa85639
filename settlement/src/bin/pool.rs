//! Poker pool command-line tool
//!
//! Usage: pool <command> [args]
//!
//! State lives in a RocksDB store under the configured data directory
//! (`POOL_DATA_DIR`, default `./data/pool`). `POOL_CONFIG` points at a TOML
//! config file instead.

use anyhow::Context;
use clap::{Parser, Subcommand};
use pool_ledger::{validation::parse_wager, Page, PlayerId, PoolSession, RocksStore};
use settlement::{format_money, BalanceStatus, Config, SettlementEngine};

#[derive(Parser, Debug)]
#[command(name = "pool")]
#[command(about = "Track a poker pool and settle up")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show roster, games and current page
    Status,
    /// Add a player to the roster
    AddPlayer {
        /// Player name
        name: String,
    },
    /// Remove a player who has not won a game
    RemovePlayer {
        /// Player ID
        id: String,
    },
    /// Record a game: every other player pays the wager to the winner
    AddGame {
        /// Wager amount per losing player
        wager: String,
        /// Winning player ID
        winner: String,
    },
    /// Switch page (setup, games, summary)
    Navigate {
        /// Target page
        page: String,
    },
    /// Print balances and settlement payments
    Summary {
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear all players and games
    Reset,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;
    let store = RocksStore::open(&config.ledger).context("failed to open state store")?;
    let mut session = PoolSession::load(store, config.ledger.clone())?;
    let engine = SettlementEngine::new(config)?;

    match args.command {
        Command::Status => {
            println!("Page: {}", session.current_page());
            println!("Players ({}):", session.players().len());
            for player in session.players() {
                println!("  {}  {}", player.id, player.name);
            }
            println!("Games ({}):", session.games().len());
            for game in session.games() {
                let winner = session
                    .state()
                    .player(&game.winner_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or("Unknown player");
                println!(
                    "  Wager: {} | Winner: {} | {}",
                    format_money(game.wager),
                    winner,
                    game.date.to_rfc3339()
                );
            }
        }
        Command::AddPlayer { name } => {
            let player = session.add_player(&name)?;
            println!("Added {} ({})", player.name, player.id);
        }
        Command::RemovePlayer { id } => {
            let player = session.remove_player(&PlayerId::new(id))?;
            println!("Removed {}", player.name);
        }
        Command::AddGame { wager, winner } => {
            let wager = parse_wager(&wager)?;
            let game = session.record_game(wager, &PlayerId::new(winner))?;
            println!("Recorded game {} ({})", game.id, format_money(game.wager));
        }
        Command::Navigate { page } => {
            let page = Page::from_str(&page)
                .with_context(|| format!("unknown page {:?}", page))?;
            session.navigate(page)?;
            println!("Now on {}", session.current_page());
        }
        Command::Summary { json } => {
            let summary = engine.summarize_session(&session)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.render());
            }

            let owing = summary
                .standings
                .iter()
                .filter(|s| s.status == BalanceStatus::OwesMoney)
                .count();
            tracing::info!(
                "{} of {} players owe money",
                owing,
                summary.standings.len()
            );
        }
        Command::Reset => {
            session.reset()?;
            println!("Pool reset");
        }
    }

    Ok(())
}
