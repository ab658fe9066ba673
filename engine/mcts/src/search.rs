//! MCTS search engine.
//!
//! Each playout runs the four MCTS phases against a private copy of the board:
//! 1. Selection: descend by PUCT until a leaf, replaying moves on the copy
//! 2. Expansion: add children using the evaluator's priors
//! 3. Evaluation: rollout or oracle value for the player to move at the leaf
//! 4. Backpropagation: update statistics along the path with alternating sign
//!
//! The tree persists between moves. Callers keep it in sync with the real game
//! through [`MctsEngine::update_with_move`].

use games_gomoku::{Board, BoardError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::evaluator::{Evaluator, EvaluatorError, Oracle, OracleEvaluator, RolloutEvaluator};
use crate::tree::{SearchTree, TreeStats};

/// Errors that can occur during MCTS search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Cannot search a finished game")]
    GameOver,

    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Monte Carlo Tree Search engine with a persistent tree.
///
/// Generic over the leaf [`Evaluator`]; see [`RolloutMcts`] and [`ZeroMcts`].
#[derive(Debug)]
pub struct MctsEngine<E: Evaluator> {
    tree: SearchTree,
    evaluator: E,
    config: MctsConfig,
    rng: ChaCha20Rng,
}

/// Pure MCTS: uniform priors, random rollouts.
pub type RolloutMcts = MctsEngine<RolloutEvaluator>;

/// AlphaZero-style MCTS guided by a policy/value oracle.
pub type ZeroMcts<O> = MctsEngine<OracleEvaluator<O>>;

impl RolloutMcts {
    /// Rollout engine capped at `config.rollout_limit` moves per rollout.
    pub fn rollout(config: MctsConfig, seed: u64) -> Self {
        let evaluator = RolloutEvaluator::new(config.rollout_limit);
        Self::new(evaluator, config, seed)
    }
}

impl<O: Oracle> ZeroMcts<O> {
    pub fn zero(oracle: O, config: MctsConfig, seed: u64) -> Self {
        Self::new(OracleEvaluator::new(oracle), config, seed)
    }
}

impl<E: Evaluator> MctsEngine<E> {
    /// Create an engine with a fresh single-node tree.
    pub fn new(evaluator: E, config: MctsConfig, seed: u64) -> Self {
        Self {
            tree: SearchTree::new(),
            evaluator,
            config,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Run a single playout from the root.
    ///
    /// `board` must be the position the current root represents. It is
    /// cloned, never mutated.
    pub fn playout(&mut self, board: &Board) -> Result<(), SearchError> {
        let mut state = board.clone();
        let mut node_id = self.tree.root();
        let mut depth = 0u32;

        // Selection
        while let Some((action, child_id)) = self.tree.select_child(node_id, self.config.c_puct) {
            state.apply_move(action)?;
            node_id = child_id;
            depth += 1;
        }

        // Evaluation + expansion from a single evaluator call
        let evaluation = self.evaluator.evaluate(state, &mut self.rng)?;
        if let Some(priors) = &evaluation.priors {
            self.tree.expand(node_id, priors);
        }

        // Backpropagation
        self.tree.backup(node_id, evaluation.value);

        trace!(
            leaf = node_id.0,
            depth,
            value = evaluation.value,
            expanded = evaluation.priors.is_some(),
            "MCTS playout complete"
        );

        Ok(())
    }

    /// Run `num_playouts` playouts from `board`.
    ///
    /// Statistics accumulate in the persistent tree; `board` is untouched.
    pub fn search(&mut self, board: &Board, num_playouts: u32) -> Result<(), SearchError> {
        // A full board is always terminal, so this also covers "no legal moves"
        if board.is_terminal() {
            return Err(SearchError::GameOver);
        }

        for _ in 0..num_playouts {
            self.playout(board)?;
        }

        let stats = self.tree.stats();
        debug!(
            num_playouts,
            moves_played = board.moves_played(),
            root_visits = stats.root_visits,
            root_value = stats.root_value,
            tree_nodes = stats.total_nodes,
            max_depth = stats.max_depth,
            "MCTS search complete"
        );

        Ok(())
    }

    /// Search and return the most visited root action.
    ///
    /// Ties go to the earliest expanded child.
    pub fn get_move(&mut self, board: &Board) -> Result<usize, SearchError> {
        self.search(board, self.config.num_playouts)?;
        self.tree.best_action().ok_or(SearchError::NoLegalMoves)
    }

    /// Search and return the tempered visit distribution over root children
    /// as parallel (actions, probabilities).
    pub fn get_move_probs(
        &mut self,
        board: &Board,
        temperature: f32,
    ) -> Result<(Vec<usize>, Vec<f32>), SearchError> {
        self.search(board, self.config.num_playouts)?;
        let (actions, probs) = self.tree.move_probs(temperature);
        if actions.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        Ok((actions, probs))
    }

    /// Advance the tree after a real move.
    ///
    /// `Some(action)` promotes the matching root child, keeping its subtree.
    /// `None`, or an action the root never expanded, discards the whole tree.
    pub fn update_with_move(&mut self, action: Option<usize>) {
        let reused = match action {
            Some(action) => self.tree.promote(action),
            None => false,
        };
        if !reused {
            self.tree.reset();
        }
        trace!(?action, reused, tree_nodes = self.tree.len(), "Search tree advanced");
    }

    /// Discard the whole tree.
    pub fn reset(&mut self) {
        self.update_with_move(None);
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }
}

/// Sample an action from parallel (actions, probabilities).
pub fn sample_action(
    actions: &[usize],
    probs: &[f32],
    rng: &mut ChaCha20Rng,
) -> Result<usize, SearchError> {
    let r: f32 = rng.gen();
    let mut cumsum = 0.0;

    for (&action, &p) in actions.iter().zip(probs) {
        cumsum += p;
        if r < cumsum {
            return Ok(action);
        }
    }

    // Fallback to last non-zero action (handles floating point issues)
    for (&action, &p) in actions.iter().zip(probs).rev() {
        if p > 0.0 {
            return Ok(action);
        }
    }

    Err(SearchError::NoLegalMoves)
}

/// Generate Dirichlet-distributed noise using Gamma variates.
pub fn dirichlet_noise(
    n: usize,
    alpha: f32,
    rng: &mut ChaCha20Rng,
) -> Result<Vec<f32>, SearchError> {
    use rand_distr::{Distribution, Gamma};

    let gamma = Gamma::new(alpha as f64, 1.0)
        .map_err(|e| SearchError::InvalidConfig(format!("dirichlet alpha {}: {}", alpha, e)))?;
    let mut samples: Vec<f32> = (0..n).map(|_| gamma.sample(rng) as f32).collect();

    // Normalize
    let sum: f32 = samples.iter().sum();
    if sum > 0.0 {
        for s in &mut samples {
            *s /= sum;
        }
    } else if n > 0 {
        // Every draw underflowed; fall back to uniform
        samples.fill(1.0 / n as f32);
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{uniform_priors, OracleOutput, UniformOracle};
    use games_gomoku::Player;

    /// X | X | _
    /// O | O | _
    /// _ | _ | _
    /// X to move, 2 wins immediately.
    fn tictactoe_win_in_one() -> Board {
        let mut board = Board::new(3, 3, 3, Player::One).unwrap();
        for m in [0, 3, 1, 4] {
            board.apply_move(m).unwrap();
        }
        board
    }

    #[test]
    fn test_single_playout_then_reuse() {
        let board = Board::new(5, 5, 4, Player::One).unwrap();
        let mut mcts = RolloutMcts::rollout(MctsConfig::for_testing().with_playouts(1), 42);

        let action = mcts.get_move(&board).unwrap();
        assert!(board.legal_moves().contains(&action));

        mcts.update_with_move(Some(action));
        let root = mcts.tree().get(mcts.tree().root());
        assert!(root.is_root());
        assert_eq!(root.action, action);
    }

    #[test]
    fn test_search_does_not_mutate_board() {
        let mut board = Board::new(5, 5, 4, Player::One).unwrap();
        board.apply_move(12).unwrap();
        let before = board.clone();

        let mut mcts = RolloutMcts::rollout(MctsConfig::for_testing(), 42);
        mcts.get_move(&board).unwrap();

        assert_eq!(board, before);
        assert_eq!(mcts.tree().get(mcts.tree().root()).visit_count, 50);
    }

    #[test]
    fn test_rollout_finds_winning_move() {
        let board = tictactoe_win_in_one();
        let mut mcts = RolloutMcts::rollout(MctsConfig::for_testing().with_playouts(1000), 42);

        assert_eq!(mcts.get_move(&board).unwrap(), 2);

        // Root value is positive: the side to move has a forced win
        assert!(mcts.stats().root_value > 0.0);
    }

    #[test]
    fn test_zero_finds_winning_move() {
        let board = tictactoe_win_in_one();
        let mut mcts = ZeroMcts::zero(
            UniformOracle::new(),
            MctsConfig::for_testing().with_playouts(400),
            42,
        );

        let (actions, probs) = mcts.get_move_probs(&board, 1e-3).unwrap();
        let winning = actions.iter().position(|&a| a == 2).unwrap();
        assert!(probs[winning] > 0.99);
    }

    #[test]
    fn test_terminal_value_overrides_oracle() {
        // An oracle that always claims the side to move is winning
        let optimist = |b: &Board| -> Result<OracleOutput, EvaluatorError> {
            Ok(OracleOutput {
                priors: uniform_priors(b),
                value: 1.0,
            })
        };
        let board = tictactoe_win_in_one();
        let mut mcts = ZeroMcts::zero(optimist, MctsConfig::for_testing().with_playouts(100), 7);
        mcts.search(&board, 100).unwrap();

        let tree = mcts.tree();
        let winning_child = tree.child(tree.root(), 2).unwrap();
        let node = tree.get(winning_child);
        assert!(node.visit_count > 0);
        // O is to move at the child and has lost
        assert!((node.mean_value + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_malformed_oracle_is_an_error() {
        let broken = |_: &Board| -> Result<OracleOutput, EvaluatorError> {
            Ok(OracleOutput {
                priors: vec![(0, 1.0)],
                value: 0.0,
            })
        };
        let board = Board::new(5, 5, 4, Player::One).unwrap();
        let mut mcts = ZeroMcts::zero(broken, MctsConfig::for_testing(), 1);

        let err = mcts.get_move(&board).unwrap_err();
        assert!(matches!(
            err,
            SearchError::Evaluator(EvaluatorError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_search_on_finished_game() {
        let mut board = Board::new(3, 3, 3, Player::One).unwrap();
        for m in [0, 3, 1, 4, 2] {
            board.apply_move(m).unwrap();
        }
        let mut mcts = RolloutMcts::rollout(MctsConfig::for_testing(), 1);
        assert!(matches!(mcts.get_move(&board), Err(SearchError::GameOver)));
    }

    #[test]
    fn test_search_on_full_board_draw() {
        // X O X / X O O / O X X
        let mut board = Board::new(3, 3, 3, Player::One).unwrap();
        for m in [0, 1, 2, 4, 3, 5, 7, 6, 8] {
            board.apply_move(m).unwrap();
        }
        assert!(board.legal_moves().is_empty());

        let mut mcts = ZeroMcts::zero(UniformOracle::new(), MctsConfig::for_testing(), 1);
        assert!(matches!(
            mcts.get_move_probs(&board, 1.0),
            Err(SearchError::GameOver)
        ));
    }

    #[test]
    fn test_move_probs_distribution() {
        let board = Board::new(4, 4, 3, Player::One).unwrap();
        let mut mcts = RolloutMcts::rollout(MctsConfig::for_testing().with_playouts(200), 3);

        let (actions, probs) = mcts.get_move_probs(&board, 1.0).unwrap();
        assert_eq!(actions.len(), 16);
        assert_eq!(actions.len(), probs.len());
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-4);
        for a in &actions {
            assert!(board.legal_moves().contains(a));
        }

        // Near-zero temperature puts the mass on the most visited children
        let tree = mcts.tree();
        let (_, probs) = tree.move_probs(1e-3);
        let visits: Vec<u32> = tree.root_children().map(|(_, n)| n.visit_count).collect();
        let max_visits = visits.iter().copied().max().unwrap();
        let top_mass: f32 = visits
            .iter()
            .zip(&probs)
            .filter(|(&v, _)| v == max_visits)
            .map(|(_, &p)| p)
            .sum();
        assert!(top_mass > 0.99);
    }

    #[test]
    fn test_tree_reuse_keeps_statistics() {
        let mut board = Board::new(5, 5, 4, Player::One).unwrap();
        let mut mcts = RolloutMcts::rollout(MctsConfig::for_testing().with_playouts(300), 9);

        let action = mcts.get_move(&board).unwrap();
        let tree = mcts.tree();
        let carried = tree.get(tree.child(tree.root(), action).unwrap()).visit_count;
        assert!(carried > 0);

        mcts.update_with_move(Some(action));
        board.apply_move(action).unwrap();
        assert_eq!(mcts.stats().root_visits, carried);

        mcts.get_move(&board).unwrap();
        assert_eq!(mcts.stats().root_visits, carried + 300);
    }

    #[test]
    fn test_update_with_move_resets() {
        let board = Board::new(5, 5, 4, Player::One).unwrap();
        let mut mcts = RolloutMcts::rollout(MctsConfig::for_testing(), 9);
        mcts.get_move(&board).unwrap();
        assert!(mcts.tree().len() > 1);

        mcts.update_with_move(None);
        assert_eq!(mcts.tree().len(), 1);

        mcts.get_move(&board).unwrap();
        // Cell 25 does not exist, so no child matches
        mcts.update_with_move(Some(25));
        assert_eq!(mcts.tree().len(), 1);
        assert_eq!(mcts.stats().root_visits, 0);
    }

    #[test]
    fn test_same_seed_same_search() {
        let board = Board::new(5, 5, 4, Player::One).unwrap();
        let config = MctsConfig::for_testing().with_playouts(100);

        let mut a = RolloutMcts::rollout(config.clone(), 5);
        let mut b = RolloutMcts::rollout(config, 5);
        a.search(&board, 100).unwrap();
        b.search(&board, 100).unwrap();

        let visits_a: Vec<u32> = a.tree().root_children().map(|(_, n)| n.visit_count).collect();
        let visits_b: Vec<u32> = b.tree().root_children().map(|(_, n)| n.visit_count).collect();
        assert_eq!(visits_a, visits_b);
    }

    #[test]
    fn test_sample_action() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let actions = vec![10, 11, 12, 13, 14];
        let probs = vec![0.0, 0.5, 0.3, 0.2, 0.0];

        // Sample many times and check distribution
        let mut counts = [0u32; 5];
        for _ in 0..1000 {
            let action = sample_action(&actions, &probs, &mut rng).unwrap();
            counts[action - 10] += 1;
        }

        // Actions 10 and 14 should never be selected
        assert_eq!(counts[0], 0);
        assert_eq!(counts[4], 0);

        assert!(counts[1] > counts[2]);
        assert!(counts[2] > counts[3]);

        assert!(sample_action(&[], &[], &mut rng).is_err());
    }

    #[test]
    fn test_dirichlet_noise() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let noise = dirichlet_noise(5, 0.3, &mut rng).unwrap();

        // Should sum to 1.0
        let sum: f32 = noise.iter().sum();
        assert!((sum - 1.0).abs() < 0.01);

        // All values should be non-negative
        for &n in &noise {
            assert!(n >= 0.0);
        }

        assert!(dirichlet_noise(5, 0.0, &mut rng).is_err());
    }
}
