//! Leaf evaluation strategies.
//!
//! An [`Evaluator`] turns the position at a freshly reached leaf into a value
//! estimate for the player to move there, plus the priors used to expand the
//! leaf. Two strategies are provided:
//!
//! - [`RolloutEvaluator`]: uniform priors, value from a uniformly random
//!   playout to the end of the game.
//! - [`OracleEvaluator`]: priors and value from an external policy/value
//!   [`Oracle`] (a trained network in AlphaZero), with exact outcomes
//!   overriding the oracle at terminal positions.

use games_gomoku::{Board, BoardError};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Malformed oracle output: {0}")]
    MalformedOutput(String),

    #[error("Board error during evaluation: {0}")]
    Board(#[from] BoardError),
}

/// Result of evaluating a leaf position.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Priors over the legal actions to expand the leaf with.
    /// `None` for terminal positions, which are never expanded.
    pub priors: Option<Vec<(usize, f32)>>,

    /// Value estimate for the player to move at the leaf, in [-1, 1].
    pub value: f32,
}

/// Trait for leaf evaluators.
pub trait Evaluator: Send + Sync {
    /// Evaluate `board`, a private copy owned by the current playout.
    fn evaluate(&self, board: Board, rng: &mut ChaCha20Rng)
        -> Result<Evaluation, EvaluatorError>;
}

/// Output of a policy/value oracle.
#[derive(Debug, Clone)]
pub struct OracleOutput {
    /// (legal action, prior) covering exactly the board's legal actions
    pub priors: Vec<(usize, f32)>,

    /// Value for the player to move, in [-1, 1]
    pub value: f32,
}

/// External policy/value estimator contract.
///
/// Implemented for any `Fn(&Board) -> Result<OracleOutput, EvaluatorError>`,
/// so a network wrapper can be passed as a closure.
pub trait Oracle: Send + Sync {
    fn policy_value(&self, board: &Board) -> Result<OracleOutput, EvaluatorError>;
}

impl<F> Oracle for F
where
    F: Fn(&Board) -> Result<OracleOutput, EvaluatorError> + Send + Sync,
{
    fn policy_value(&self, board: &Board) -> Result<OracleOutput, EvaluatorError> {
        self(board)
    }
}

/// Equal prior over the board's legal moves.
pub fn uniform_priors(board: &Board) -> Vec<(usize, f32)> {
    let legal = board.legal_moves();
    if legal.is_empty() {
        return Vec::new();
    }
    let prob = 1.0 / legal.len() as f32;
    legal.iter().map(|&action| (action, prob)).collect()
}

/// Oracle stub used when no trained model exists: uniform prior over legal
/// moves and a neutral value.
#[derive(Debug, Clone, Default)]
pub struct UniformOracle;

impl UniformOracle {
    pub fn new() -> Self {
        Self
    }
}

impl Oracle for UniformOracle {
    fn policy_value(&self, board: &Board) -> Result<OracleOutput, EvaluatorError> {
        Ok(OracleOutput {
            priors: uniform_priors(board),
            value: 0.0,
        })
    }
}

/// Random rollout evaluator that plays uniformly random moves to the end of
/// the game.
#[derive(Debug, Clone)]
pub struct RolloutEvaluator {
    /// Maximum rollout length before the result is scored as a draw
    pub max_moves: u32,
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        Self { max_moves: 1000 }
    }
}

impl RolloutEvaluator {
    pub fn new(max_moves: u32) -> Self {
        Self { max_moves }
    }

    /// Play random moves on `board` until the game ends or the move cap is
    /// hit. Returns +1/-1/0 from the perspective of the player to move at
    /// the start of the rollout; hitting the cap scores 0.
    pub fn rollout(&self, board: &mut Board, rng: &mut ChaCha20Rng) -> Result<f32, EvaluatorError> {
        let perspective = board.current_player();

        for _ in 0..self.max_moves {
            if let Some(outcome) = board.terminal_status() {
                return Ok(outcome.value_for(perspective));
            }
            let legal = board.legal_moves();
            let action = legal[rng.gen_range(0..legal.len())];
            board.apply_move(action)?;
        }

        if let Some(outcome) = board.terminal_status() {
            return Ok(outcome.value_for(perspective));
        }

        warn!(
            max_moves = self.max_moves,
            moves_played = board.moves_played(),
            "Rollout reached move limit, scoring as draw"
        );
        Ok(0.0)
    }
}

impl Evaluator for RolloutEvaluator {
    fn evaluate(
        &self,
        mut board: Board,
        rng: &mut ChaCha20Rng,
    ) -> Result<Evaluation, EvaluatorError> {
        let priors = if board.is_terminal() {
            None
        } else {
            Some(uniform_priors(&board))
        };
        let value = self.rollout(&mut board, rng)?;

        Ok(Evaluation { priors, value })
    }
}

/// AlphaZero-style evaluator backed by an [`Oracle`].
#[derive(Debug, Clone)]
pub struct OracleEvaluator<O: Oracle> {
    oracle: O,
}

impl<O: Oracle> OracleEvaluator<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }
}

impl<O: Oracle> Evaluator for OracleEvaluator<O> {
    fn evaluate(
        &self,
        board: Board,
        _rng: &mut ChaCha20Rng,
    ) -> Result<Evaluation, EvaluatorError> {
        // Exact outcome beats any estimate; the oracle is not consulted.
        if let Some(outcome) = board.terminal_status() {
            return Ok(Evaluation {
                priors: None,
                value: outcome.value_for(board.current_player()),
            });
        }

        let output = self.oracle.policy_value(&board)?;
        validate_output(&board, &output)?;

        Ok(Evaluation {
            priors: Some(output.priors),
            value: output.value,
        })
    }
}

/// Check that oracle priors cover exactly the legal actions, once each, with
/// finite non-negative weights, and that the value lies in [-1, 1].
fn validate_output(board: &Board, output: &OracleOutput) -> Result<(), EvaluatorError> {
    if !output.value.is_finite() || !(-1.0..=1.0).contains(&output.value) {
        return Err(EvaluatorError::MalformedOutput(format!(
            "value {} outside [-1, 1]",
            output.value
        )));
    }

    let legal = board.legal_moves();
    if output.priors.len() != legal.len() {
        return Err(EvaluatorError::MalformedOutput(format!(
            "{} priors for {} legal actions",
            output.priors.len(),
            legal.len()
        )));
    }

    let mut seen = vec![false; board.size()];
    for &(action, prior) in &output.priors {
        if !board.is_available(action) {
            return Err(EvaluatorError::MalformedOutput(format!(
                "prior for illegal action {}",
                action
            )));
        }
        if seen[action] {
            return Err(EvaluatorError::MalformedOutput(format!(
                "duplicate prior for action {}",
                action
            )));
        }
        seen[action] = true;

        if !prior.is_finite() || prior < 0.0 {
            return Err(EvaluatorError::MalformedOutput(format!(
                "invalid prior {} for action {}",
                prior, action
            )));
        }
    }

    Ok(())
}
