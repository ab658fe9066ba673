//! Move selection policies for the actor

use anyhow::{anyhow, Result};
use games_gomoku::Board;
use rand::prelude::*;
use rand_chacha::ChaCha20Rng;

/// A chosen move, plus the distribution it was drawn from when requested.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveChoice {
    /// Cell index to play
    pub action: usize,
    /// Probability per board cell (zero for occupied cells), if requested
    pub distribution: Option<Vec<f32>>,
}

/// Contract between a move-selecting engine and the game controller.
///
/// The controller owns the authoritative board and commits every chosen move
/// itself; policies never mutate the board they are given. After each commit,
/// by either side, the controller reports the move through
/// [`Policy::observe_move`] so that any persistent search tree follows the
/// real game.
pub trait Policy: Send {
    /// Choose a move for the player to move on `board`.
    fn select_move(
        &mut self,
        board: &Board,
        temperature: f32,
        want_distribution: bool,
    ) -> Result<MoveChoice>;

    /// A move was committed to the board, by this policy or its opponent.
    fn observe_move(&mut self, _action: usize) {}

    /// Drop any search state carried between moves.
    fn reset(&mut self) {}

    /// Short label for logs.
    fn name(&self) -> &str;
}

/// Scatter parallel (actions, probabilities) into a dense per-cell vector.
pub fn dense_distribution(board_size: usize, actions: &[usize], probs: &[f32]) -> Vec<f32> {
    let mut dense = vec![0.0; board_size];
    for (&action, &p) in actions.iter().zip(probs) {
        dense[action] = p;
    }
    dense
}

/// Random policy that selects legal moves uniformly at random.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn select_move(
        &mut self,
        board: &Board,
        _temperature: f32,
        want_distribution: bool,
    ) -> Result<MoveChoice> {
        let legal = board.legal_moves();
        if board.is_terminal() || legal.is_empty() {
            return Err(anyhow!("No legal moves available"));
        }

        let action = legal[self.rng.gen_range(0..legal.len())];
        let distribution = want_distribution.then(|| {
            let p = 1.0 / legal.len() as f32;
            dense_distribution(board.size(), legal, &vec![p; legal.len()])
        });

        Ok(MoveChoice {
            action,
            distribution,
        })
    }

    fn name(&self) -> &str {
        "random"
    }
}
