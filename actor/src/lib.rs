//! Actor library: policies, game control and episode running for Connect-N
//!
//! The binary in `main.rs` is a thin wrapper around [`actor::Actor`]; the
//! pieces are exposed here so they can be driven from tests and other tools.

pub mod actor;
pub mod config;
pub mod game;
pub mod mcts_policy;
pub mod policy;
pub mod replay;
pub mod stats;

pub use crate::actor::Actor;
pub use config::Config;
pub use game::{
    evaluate_policies, evaluate_policies_with, play_game, self_play, EvaluationSummary,
    GameRecord, SelfPlayRecord,
};
pub use mcts_policy::{PlayMode, RolloutPolicy, ZeroPolicy};
pub use policy::{dense_distribution, MoveChoice, Policy, RandomPolicy};
pub use replay::{read_replay, ReplayEntry, ReplayWriter};
pub use stats::{ActorStats, ActorStatsSnapshot};
