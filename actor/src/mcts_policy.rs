//! MCTS-based policies
//!
//! [`RolloutPolicy`] wraps pure rollout MCTS and searches every move from
//! scratch. [`ZeroPolicy`] wraps oracle-guided MCTS and, in self-play, mixes
//! Dirichlet noise into the move distribution and keeps the tree between
//! moves, advancing it along every committed move reported to
//! [`Policy::observe_move`].

use anyhow::{anyhow, Result};
use games_gomoku::Board;
use mcts::{
    dirichlet_noise, sample_action, MctsConfig, Oracle, RolloutMcts, ZeroMcts,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::policy::{dense_distribution, MoveChoice, Policy};

/// How the oracle-guided policy consumes its search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Noise-mixed sampling, tree reused along the chosen move
    SelfPlay,
    /// Plain sampling, tree discarded after every move
    Match,
}

impl FromStr for PlayMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "selfplay" | "self-play" => Ok(PlayMode::SelfPlay),
            "match" => Ok(PlayMode::Match),
            other => Err(anyhow!(
                "invalid mode '{}', expected 'selfplay' or 'match'",
                other
            )),
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayMode::SelfPlay => write!(f, "selfplay"),
            PlayMode::Match => write!(f, "match"),
        }
    }
}

/// Pure MCTS player: random rollouts, most-visited move, fresh tree each move.
#[derive(Debug)]
pub struct RolloutPolicy {
    mcts: RolloutMcts,
}

impl RolloutPolicy {
    pub fn new(config: MctsConfig, seed: u64) -> Self {
        Self {
            mcts: RolloutMcts::rollout(config, seed),
        }
    }
}

impl Policy for RolloutPolicy {
    fn select_move(
        &mut self,
        board: &Board,
        temperature: f32,
        want_distribution: bool,
    ) -> Result<MoveChoice> {
        let action = self
            .mcts
            .get_move(board)
            .map_err(|e| anyhow!("Rollout search failed: {}", e))?;

        let distribution = want_distribution.then(|| {
            let (actions, probs) = self.mcts.tree().move_probs(temperature);
            dense_distribution(board.size(), &actions, &probs)
        });

        let stats = self.mcts.stats();
        debug!(
            action,
            root_visits = stats.root_visits,
            root_value = stats.root_value,
            "Rollout MCTS selected move"
        );

        self.mcts.update_with_move(None);

        Ok(MoveChoice {
            action,
            distribution,
        })
    }

    fn reset(&mut self) {
        self.mcts.reset();
    }

    fn name(&self) -> &str {
        "rollout"
    }
}

/// AlphaZero-style player backed by a policy/value oracle.
pub struct ZeroPolicy<O: Oracle> {
    mcts: ZeroMcts<O>,
    mode: PlayMode,
    /// RNG for move sampling and exploration noise
    rng: ChaCha20Rng,
}

impl<O: Oracle> fmt::Debug for ZeroPolicy<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroPolicy")
            .field("mode", &self.mode)
            .field("tree_nodes", &self.mcts.tree().len())
            .finish()
    }
}

impl<O: Oracle> ZeroPolicy<O> {
    pub fn new(oracle: O, config: MctsConfig, mode: PlayMode, seed: u64) -> Self {
        Self {
            mcts: ZeroMcts::zero(oracle, config, seed),
            mode,
            rng: ChaCha20Rng::seed_from_u64(seed.wrapping_add(1)),
        }
    }

    /// Number of nodes currently held by the search tree.
    pub fn tree_size(&self) -> usize {
        self.mcts.tree().len()
    }
}

impl<O: Oracle> Policy for ZeroPolicy<O> {
    fn select_move(
        &mut self,
        board: &Board,
        temperature: f32,
        want_distribution: bool,
    ) -> Result<MoveChoice> {
        let (actions, probs) = self
            .mcts
            .get_move_probs(board, temperature)
            .map_err(|e| anyhow!("Oracle search failed: {}", e))?;

        let action = match self.mode {
            PlayMode::SelfPlay => {
                let config = self.mcts.config();
                let (alpha, weight) = (config.dirichlet_alpha, config.dirichlet_weight);
                let noise = dirichlet_noise(actions.len(), alpha, &mut self.rng)?;
                let mixed: Vec<f32> = probs
                    .iter()
                    .zip(&noise)
                    .map(|(p, n)| (1.0 - weight) * p + weight * n)
                    .collect();
                sample_action(&actions, &mixed, &mut self.rng)?
            }
            PlayMode::Match => {
                let action = sample_action(&actions, &probs, &mut self.rng)?;
                self.mcts.update_with_move(None);
                action
            }
        };

        debug!(
            action,
            mode = %self.mode,
            candidates = actions.len(),
            tree_nodes = self.mcts.tree().len(),
            "Oracle MCTS selected move"
        );

        let distribution =
            want_distribution.then(|| dense_distribution(board.size(), &actions, &probs));

        Ok(MoveChoice {
            action,
            distribution,
        })
    }

    /// Self-play keeps the subtree under the committed move, whoever played
    /// it; a move the root never expanded starts a fresh tree.
    fn observe_move(&mut self, action: usize) {
        if self.mode == PlayMode::SelfPlay {
            self.mcts.update_with_move(Some(action));
        }
    }

    fn reset(&mut self) {
        self.mcts.reset();
    }

    fn name(&self) -> &str {
        "zero"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_gomoku::Player;
    use mcts::{EvaluatorError, OracleOutput, UniformOracle};

    fn board() -> Board {
        Board::new(5, 5, 4, Player::One).unwrap()
    }

    /// Puts 90% of the prior on the first legal move.
    fn peaked_oracle(board: &Board) -> Result<OracleOutput, EvaluatorError> {
        let legal = board.legal_moves();
        let rest = 0.1 / (legal.len() - 1) as f32;
        let priors = legal
            .iter()
            .enumerate()
            .map(|(i, &action)| (action, if i == 0 { 0.9 } else { rest }))
            .collect();
        Ok(OracleOutput { priors, value: 0.0 })
    }

    /// Number of seeds whose self-play move was not a most-visited root child.
    fn off_top_choices(weight: f32, seeds: u64) -> usize {
        let b = board();
        let mut off_top = 0;
        for seed in 0..seeds {
            let mut policy = ZeroPolicy::new(
                peaked_oracle,
                MctsConfig::default()
                    .with_playouts(100)
                    .with_dirichlet(0.3, weight),
                PlayMode::SelfPlay,
                seed,
            );
            let choice = policy.select_move(&b, 1e-3, false).unwrap();

            let tree = policy.mcts.tree();
            let max_visits = tree
                .root_children()
                .map(|(_, node)| node.visit_count)
                .max()
                .unwrap();
            let chosen_visits = tree
                .root_children()
                .find(|(action, _)| *action == choice.action)
                .map(|(_, node)| node.visit_count)
                .unwrap();
            if chosen_visits < max_visits {
                off_top += 1;
            }
        }
        off_top
    }

    #[test]
    fn test_play_mode_parse() {
        assert_eq!("selfplay".parse::<PlayMode>().unwrap(), PlayMode::SelfPlay);
        assert_eq!("match".parse::<PlayMode>().unwrap(), PlayMode::Match);
        assert!("tournament".parse::<PlayMode>().is_err());
        assert_eq!(PlayMode::SelfPlay.to_string(), "selfplay");
    }

    #[test]
    fn test_rollout_policy_resets_after_every_move() {
        let mut policy = RolloutPolicy::new(MctsConfig::for_testing(), 42);
        let b = board();

        let choice = policy.select_move(&b, 1e-3, true).unwrap();
        assert!(b.is_available(choice.action));
        assert_eq!(policy.mcts.tree().len(), 1);

        let dist = choice.distribution.unwrap();
        assert_eq!(dist.len(), 25);
        assert!((dist.iter().sum::<f32>() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_selfplay_reuses_tree() {
        let mut policy = ZeroPolicy::new(
            UniformOracle::new(),
            MctsConfig::default().with_playouts(100),
            PlayMode::SelfPlay,
            7,
        );
        let b = board();

        let choice = policy.select_move(&b, 1.0, true).unwrap();
        assert!(b.is_available(choice.action));
        let dist = choice.distribution.unwrap();
        assert!((dist.iter().sum::<f32>() - 1.0).abs() < 1e-4);

        let child_visits = policy
            .mcts
            .tree()
            .root_children()
            .find(|(action, _)| *action == choice.action)
            .map(|(_, node)| node.visit_count)
            .unwrap();

        // The committed move's subtree survives as the new root
        policy.observe_move(choice.action);
        let root = policy.mcts.tree().get(policy.mcts.tree().root());
        assert!(root.is_root());
        assert_eq!(root.action, choice.action);
        assert_eq!(root.visit_count, child_visits);
    }

    #[test]
    fn test_zero_selfplay_follows_unexpanded_move() {
        let mut policy = ZeroPolicy::new(
            UniformOracle::new(),
            MctsConfig::default().with_playouts(40),
            PlayMode::SelfPlay,
            9,
        );
        let mut b = board();

        let choice = policy.select_move(&b, 1.0, false).unwrap();
        b.apply_move(choice.action).unwrap();
        policy.observe_move(choice.action);

        // Reply with a cell that may or may not be expanded under the new root
        let reply = *b.legal_moves().last().unwrap();
        b.apply_move(reply).unwrap();
        policy.observe_move(reply);

        let choice = policy.select_move(&b, 1.0, false).unwrap();
        assert!(b.is_available(choice.action));
    }

    #[test]
    fn test_selfplay_without_noise_picks_top_visit_move() {
        assert_eq!(off_top_choices(0.0, 10), 0);
    }

    #[test]
    fn test_selfplay_full_noise_spreads_moves() {
        // Dir(0.3) over 25 children rarely lands on the most visited one
        assert!(off_top_choices(1.0, 20) >= 10);
    }

    #[test]
    fn test_zero_match_discards_tree() {
        let mut policy = ZeroPolicy::new(
            UniformOracle::new(),
            MctsConfig::for_evaluation().with_playouts(50),
            PlayMode::Match,
            7,
        );
        let b = board();

        let choice = policy.select_move(&b, 1e-3, false).unwrap();
        assert!(b.is_available(choice.action));
        assert!(choice.distribution.is_none());
        assert_eq!(policy.tree_size(), 1);
    }

    #[test]
    fn test_zero_policy_plays_a_full_game() {
        let mut policy = ZeroPolicy::new(
            UniformOracle::new(),
            MctsConfig::default().with_playouts(30),
            PlayMode::SelfPlay,
            3,
        );
        let mut b = Board::new(4, 4, 3, Player::One).unwrap();

        while !b.is_terminal() {
            let choice = policy.select_move(&b, 1.0, false).unwrap();
            b.apply_move(choice.action).unwrap();
            policy.observe_move(choice.action);
        }
        assert!(b.terminal_status().is_some());
    }
}
