//! Actor - Connect-N episode runner
//!
//! Runs a fixed number of games with MCTS players:
//! 1. `selfplay`: the oracle-guided player plays itself and appends training
//!    positions to `<data_dir>/selfplay.jsonl`
//! 2. `match`: the oracle-guided player meets a rollout or random opponent
//!    and the win ratio is reported
//!
//! Progress counters are written to `<data_dir>/actor_stats.json`.

use actor::{Actor, Config};
use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let mut actor = Actor::new(config)?;

    match actor.run() {
        Ok(Some(summary)) => {
            info!(
                games = summary.games,
                win_ratio = summary.win_ratio,
                "Actor completed successfully"
            );
            println!(
                "win ratio: {:.3} ({} wins, {} losses, {} ties)",
                summary.win_ratio, summary.wins, summary.losses, summary.ties
            );
            Ok(())
        }
        Ok(None) => {
            info!("Actor completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Actor failed: {}", e);
            Err(e)
        }
    }
}
