//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_data_dir() -> String {
    defaults::data_dir().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_width() -> usize {
    defaults::width()
}
fn d_height() -> usize {
    defaults::height()
}
fn d_win_length() -> usize {
    defaults::win_length()
}
fn d_start_player() -> u8 {
    defaults::start_player()
}
fn d_num_playouts() -> u32 {
    defaults::num_playouts()
}
fn d_c_puct() -> f64 {
    defaults::c_puct()
}
fn d_temperature() -> f64 {
    defaults::temperature()
}
fn d_eval_temperature() -> f64 {
    defaults::eval_temperature()
}
fn d_rollout_limit() -> u32 {
    defaults::rollout_limit()
}
fn d_dirichlet_alpha() -> f64 {
    defaults::dirichlet_alpha()
}
fn d_dirichlet_weight() -> f64 {
    defaults::dirichlet_weight()
}
fn d_episodes() -> u32 {
    defaults::episodes()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_mode() -> String {
    defaults::mode().into()
}
fn d_log_interval() -> u32 {
    defaults::log_interval()
}
fn d_opponent() -> String {
    defaults::opponent().into()
}
fn d_opponent_playouts() -> u32 {
    defaults::opponent_playouts()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub actor: ActorConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Board geometry and who moves first
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoardConfig {
    #[serde(default = "d_width")]
    pub width: usize,
    #[serde(default = "d_height")]
    pub height: usize,
    #[serde(default = "d_win_length")]
    pub win_length: usize,
    /// 1 or 2
    #[serde(default = "d_start_player")]
    pub start_player: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: defaults::width(),
            height: defaults::height(),
            win_length: defaults::win_length(),
            start_player: defaults::start_player(),
        }
    }
}

/// MCTS configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_playouts")]
    pub num_playouts: u32,
    #[serde(default = "d_c_puct")]
    pub c_puct: f64,
    #[serde(default = "d_temperature")]
    pub temperature: f64,
    #[serde(default = "d_eval_temperature")]
    pub eval_temperature: f64,
    #[serde(default = "d_rollout_limit")]
    pub rollout_limit: u32,
    #[serde(default = "d_dirichlet_alpha")]
    pub dirichlet_alpha: f64,
    #[serde(default = "d_dirichlet_weight")]
    pub dirichlet_weight: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_playouts: defaults::num_playouts(),
            c_puct: defaults::c_puct(),
            temperature: defaults::temperature(),
            eval_temperature: defaults::eval_temperature(),
            rollout_limit: defaults::rollout_limit(),
            dirichlet_alpha: defaults::dirichlet_alpha(),
            dirichlet_weight: defaults::dirichlet_weight(),
        }
    }
}

/// Actor (self-play / match runner) configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ActorConfig {
    #[serde(default = "d_episodes")]
    pub episodes: u32,
    #[serde(default = "d_seed")]
    pub seed: u64,
    #[serde(default = "d_mode")]
    pub mode: String,
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
    #[serde(default = "d_opponent")]
    pub opponent: String,
    #[serde(default = "d_opponent_playouts")]
    pub opponent_playouts: u32,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            episodes: defaults::episodes(),
            seed: defaults::seed(),
            mode: defaults::mode().into(),
            log_interval: defaults::log_interval(),
            opponent: defaults::opponent().into(),
            opponent_playouts: defaults::opponent_playouts(),
        }
    }
}
