//! Monte Carlo Tree Search (MCTS) for Connect-N games.
//!
//! Two variants share one arena-backed search tree and differ only in how
//! leaves are evaluated:
//!
//! - [`RolloutMcts`]: uniform priors and random rollouts to the end of the game
//! - [`ZeroMcts`]: priors and values from a policy/value [`Oracle`], as in
//!   AlphaZero
//!
//! # Overview
//!
//! Each playout consists of four phases:
//!
//! 1. **Selection**: Traverse the tree using PUCT to balance exploration and
//!    exploitation
//! 2. **Expansion**: When reaching a leaf, add children for each legal action
//! 3. **Evaluation**: Estimate the leaf value (rollout, oracle, or the exact
//!    outcome if the game is over)
//! 4. **Backpropagation**: Update visit counts and mean values along the
//!    path from leaf to root, flipping sign at each level
//!
//! # Usage
//!
//! ```rust
//! use games_gomoku::{Board, Player};
//! use mcts::{MctsConfig, RolloutMcts};
//!
//! let mut board = Board::new(6, 6, 4, Player::One).unwrap();
//! let mut mcts = RolloutMcts::rollout(MctsConfig::for_testing(), 42);
//!
//! let action = mcts.get_move(&board).unwrap();
//! board.apply_move(action).unwrap();
//! mcts.update_with_move(Some(action));
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_playouts`: Playouts per move decision (default: 2000)
//! - `c_puct`: Exploration constant for PUCT (default: 5.0)
//! - `rollout_limit`: Move cap for a single rollout (default: 1000)
//! - `dirichlet_alpha`, `dirichlet_weight`: Root noise for self-play (default: 0.3, 0.25)
//!
//! Move temperature is passed per call to [`MctsEngine::get_move_probs`].

pub mod config;
pub mod evaluator;
pub mod node;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use evaluator::{
    uniform_priors, Evaluation, Evaluator, EvaluatorError, Oracle, OracleEvaluator, OracleOutput,
    RolloutEvaluator, UniformOracle,
};
pub use node::{NodeId, SearchNode};
pub use search::{
    dirichlet_noise, sample_action, MctsEngine, RolloutMcts, SearchError, ZeroMcts,
};
pub use tree::{SearchTree, TreeStats};
