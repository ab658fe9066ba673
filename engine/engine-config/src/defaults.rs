//! Default configuration values loaded from config.defaults.toml.
//!
//! The shared TOML file is embedded at compile time, so the binary and the
//! checked-in defaults can never drift apart.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    board: BoardDefaults,
    mcts: MctsDefaults,
    actor: ActorDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    data_dir: String,
    log_level: String,
}

#[derive(Debug, Deserialize)]
struct BoardDefaults {
    width: usize,
    height: usize,
    win_length: usize,
    start_player: u8,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    num_playouts: u32,
    c_puct: f64,
    temperature: f64,
    eval_temperature: f64,
    rollout_limit: u32,
    dirichlet_alpha: f64,
    dirichlet_weight: f64,
}

#[derive(Debug, Deserialize)]
struct ActorDefaults {
    episodes: u32,
    seed: u64,
    mode: String,
    log_interval: u32,
    opponent: String,
    opponent_playouts: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn data_dir() -> &'static str {
    &DEFAULTS.common.data_dir
}
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}

// Board
pub fn width() -> usize {
    DEFAULTS.board.width
}
pub fn height() -> usize {
    DEFAULTS.board.height
}
pub fn win_length() -> usize {
    DEFAULTS.board.win_length
}
pub fn start_player() -> u8 {
    DEFAULTS.board.start_player
}

// MCTS
pub fn num_playouts() -> u32 {
    DEFAULTS.mcts.num_playouts
}
pub fn c_puct() -> f64 {
    DEFAULTS.mcts.c_puct
}
pub fn temperature() -> f64 {
    DEFAULTS.mcts.temperature
}
pub fn eval_temperature() -> f64 {
    DEFAULTS.mcts.eval_temperature
}
pub fn rollout_limit() -> u32 {
    DEFAULTS.mcts.rollout_limit
}
pub fn dirichlet_alpha() -> f64 {
    DEFAULTS.mcts.dirichlet_alpha
}
pub fn dirichlet_weight() -> f64 {
    DEFAULTS.mcts.dirichlet_weight
}

// Actor
pub fn episodes() -> u32 {
    DEFAULTS.actor.episodes
}
pub fn seed() -> u64 {
    DEFAULTS.actor.seed
}
pub fn mode() -> &'static str {
    &DEFAULTS.actor.mode
}
pub fn log_interval() -> u32 {
    DEFAULTS.actor.log_interval
}
pub fn opponent() -> &'static str {
    &DEFAULTS.actor.opponent
}
pub fn opponent_playouts() -> u32 {
    DEFAULTS.actor.opponent_playouts
}
