//! Configuration for the Actor service
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use games_gomoku::{Board, Player};
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::mcts_policy::PlayMode;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}
fn default_data_dir() -> String {
    CENTRAL_CONFIG.common.data_dir.clone()
}
fn default_mode() -> String {
    CENTRAL_CONFIG.actor.mode.clone()
}
fn default_episodes() -> u32 {
    CENTRAL_CONFIG.actor.episodes
}
fn default_seed() -> u64 {
    CENTRAL_CONFIG.actor.seed
}
fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.actor.log_interval
}
fn default_opponent() -> String {
    CENTRAL_CONFIG.actor.opponent.clone()
}
fn default_opponent_playouts() -> u32 {
    CENTRAL_CONFIG.actor.opponent_playouts
}
fn default_width() -> usize {
    CENTRAL_CONFIG.board.width
}
fn default_height() -> usize {
    CENTRAL_CONFIG.board.height
}
fn default_win_length() -> usize {
    CENTRAL_CONFIG.board.win_length
}
fn default_start_player() -> u8 {
    CENTRAL_CONFIG.board.start_player
}
fn default_num_playouts() -> u32 {
    CENTRAL_CONFIG.mcts.num_playouts
}
fn default_c_puct() -> f32 {
    CENTRAL_CONFIG.mcts.c_puct as f32
}
fn default_temperature() -> f32 {
    CENTRAL_CONFIG.mcts.temperature as f32
}
fn default_eval_temperature() -> f32 {
    CENTRAL_CONFIG.mcts.eval_temperature as f32
}
fn default_rollout_limit() -> u32 {
    CENTRAL_CONFIG.mcts.rollout_limit
}
fn default_dirichlet_alpha() -> f32 {
    CENTRAL_CONFIG.mcts.dirichlet_alpha as f32
}
fn default_dirichlet_weight() -> f32 {
    CENTRAL_CONFIG.mcts.dirichlet_weight as f32
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "actor")]
#[command(about = "Gomoku actor - self-play and evaluation runner")]
#[command(
    long_about = "Runs Connect-N games with MCTS players.

selfplay: the oracle-guided player plays itself and appends training
positions to <data_dir>/selfplay.jsonl.
match: the oracle-guided player plays an opponent (rollout MCTS or random)
and reports its win ratio.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Data directory for stats and replay output
    #[arg(long, default_value_t = default_data_dir())]
    pub data_dir: String,

    /// Run mode: selfplay or match
    #[arg(long, default_value_t = default_mode())]
    pub mode: String,

    /// Number of games to play
    #[arg(long, default_value_t = default_episodes())]
    pub episodes: u32,

    /// Base RNG seed
    #[arg(long, default_value_t = default_seed())]
    pub seed: u64,

    /// Log progress every N episodes (0 to disable)
    #[arg(long, default_value_t = default_log_interval())]
    pub log_interval: u32,

    /// Match-mode opponent: rollout or random
    #[arg(long, default_value_t = default_opponent())]
    pub opponent: String,

    /// Playouts per move for the rollout opponent
    #[arg(long, default_value_t = default_opponent_playouts())]
    pub opponent_playouts: u32,

    /// Board width
    #[arg(long, default_value_t = default_width())]
    pub width: usize,

    /// Board height
    #[arg(long, default_value_t = default_height())]
    pub height: usize,

    /// Stones in a row needed to win
    #[arg(long, default_value_t = default_win_length())]
    pub win_length: usize,

    /// Player who moves first in self-play (1 or 2)
    #[arg(long, default_value_t = default_start_player())]
    pub start_player: u8,

    /// MCTS playouts per move
    #[arg(long, default_value_t = default_num_playouts())]
    pub num_playouts: u32,

    /// PUCT exploration constant
    #[arg(long, default_value_t = default_c_puct())]
    pub c_puct: f32,

    /// Self-play sampling temperature
    #[arg(long, default_value_t = default_temperature())]
    pub temperature: f32,

    /// Match-mode sampling temperature
    #[arg(long, default_value_t = default_eval_temperature())]
    pub eval_temperature: f32,

    /// Maximum moves per random rollout
    #[arg(long, default_value_t = default_rollout_limit())]
    pub rollout_limit: u32,

    /// Dirichlet noise concentration
    #[arg(long, default_value_t = default_dirichlet_alpha())]
    pub dirichlet_alpha: f32,

    /// Share of Dirichlet noise mixed into self-play move selection
    #[arg(long, default_value_t = default_dirichlet_weight())]
    pub dirichlet_weight: f32,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.play_mode()?;
        self.start_player()?;
        self.board()?;

        if self.opponent != "rollout" && self.opponent != "random" {
            return Err(anyhow!(
                "invalid opponent '{}', expected 'rollout' or 'random'",
                self.opponent
            ));
        }

        if self.episodes == 0 {
            return Err(anyhow!("episodes must be greater than 0"));
        }

        if self.num_playouts == 0 {
            return Err(anyhow!("num_playouts must be greater than 0"));
        }

        if !(self.c_puct.is_finite() && self.c_puct > 0.0) {
            return Err(anyhow!("c_puct must be a positive number"));
        }

        if !(self.temperature > 0.0 && self.eval_temperature > 0.0) {
            return Err(anyhow!("temperature and eval_temperature must be positive"));
        }

        if !(self.dirichlet_alpha > 0.0) {
            return Err(anyhow!("dirichlet_alpha must be positive"));
        }

        if !(0.0..=1.0).contains(&self.dirichlet_weight) {
            return Err(anyhow!("dirichlet_weight must be within [0, 1]"));
        }

        Ok(())
    }

    pub fn play_mode(&self) -> Result<PlayMode> {
        self.mode.parse()
    }

    pub fn start_player(&self) -> Result<Player> {
        Player::from_number(self.start_player)
            .ok_or_else(|| anyhow!("start_player must be 1 or 2, got {}", self.start_player))
    }

    /// Fresh board with the configured geometry.
    pub fn board(&self) -> Result<Board> {
        Ok(Board::new(
            self.width,
            self.height,
            self.win_length,
            self.start_player()?,
        )?)
    }

    /// Search settings for the oracle-guided player.
    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_playouts(self.num_playouts)
            .with_c_puct(self.c_puct)
            .with_rollout_limit(self.rollout_limit)
            .with_dirichlet(self.dirichlet_alpha, self.dirichlet_weight)
    }

    /// Search settings for the rollout opponent.
    pub fn opponent_mcts_config(&self) -> MctsConfig {
        self.mcts_config()
            .with_playouts(self.opponent_playouts)
            .with_dirichlet(self.dirichlet_alpha, 0.0)
    }
}
