//! Episode runner: self-play data generation and evaluation matches

use anyhow::{anyhow, Result};
use games_gomoku::Board;
use mcts::UniformOracle;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::Config;
use crate::game::{evaluate_policies_with, self_play, EvaluationSummary};
use crate::mcts_policy::{PlayMode, RolloutPolicy, ZeroPolicy};
use crate::policy::{Policy, RandomPolicy};
use crate::replay::{ReplayEntry, ReplayWriter};
use crate::stats::ActorStats;

pub struct Actor {
    config: Config,
    mode: PlayMode,
    board: Board,
    stats: ActorStats,
}

impl Actor {
    pub fn new(config: Config) -> Result<Self> {
        let mode = config.play_mode()?;
        let board = config.board()?;
        let stats = ActorStats::new(&config.data_dir, &mode.to_string());

        info!(
            mode = %mode,
            width = config.width,
            height = config.height,
            win_length = config.win_length,
            num_playouts = config.num_playouts,
            "Actor initialized"
        );

        Ok(Self {
            config,
            mode,
            board,
            stats,
        })
    }

    pub fn stats(&self) -> &ActorStats {
        &self.stats
    }

    /// Run the configured number of episodes. Match mode returns the
    /// candidate's tally; self-play returns `None`.
    pub fn run(&mut self) -> Result<Option<EvaluationSummary>> {
        let result = match self.mode {
            PlayMode::SelfPlay => {
                self.run_self_play()?;
                None
            }
            PlayMode::Match => Some(self.run_match()?),
        };
        self.stats.write_stats();
        Ok(result)
    }

    fn should_log(&self, episode: u32) -> bool {
        self.config.log_interval > 0 && (episode + 1) % self.config.log_interval == 0
    }

    fn run_self_play(&mut self) -> Result<()> {
        let mut policy = ZeroPolicy::new(
            UniformOracle::new(),
            self.config.mcts_config(),
            PlayMode::SelfPlay,
            self.config.seed,
        );
        let mut replay = ReplayWriter::open(&self.config.data_dir)?;
        let start_player = self.config.start_player()?;

        info!(
            episodes = self.config.episodes,
            replay = %replay.path().display(),
            "Starting self-play"
        );

        for episode in 0..self.config.episodes {
            let started = Instant::now();
            let record = self_play(
                &mut self.board,
                &mut policy,
                start_player,
                self.config.temperature,
            )?;

            let outcome = self
                .board
                .terminal_status()
                .ok_or_else(|| anyhow!("self-play ended before the game was over"))?;
            self.stats.record_episode(record.moves.len() as u32, outcome);
            self.stats.record_samples(record.len());

            let samples = record.len();
            replay.append(&ReplayEntry {
                episode,
                width: self.board.width(),
                height: self.board.height(),
                win_length: self.board.win_length(),
                record,
            })?;

            debug!(
                episode,
                samples,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Self-play episode complete"
            );

            if self.should_log(episode) {
                replay.flush()?;
                let snapshot = self.stats.snapshot();
                info!(
                    episode = episode + 1,
                    total = self.config.episodes,
                    samples = snapshot.samples,
                    p1_wins = snapshot.player1_wins,
                    p2_wins = snapshot.player2_wins,
                    draws = snapshot.draws,
                    avg_length = snapshot.avg_episode_length,
                    "Self-play progress"
                );
                self.stats.write_stats();
            }
        }

        replay.flush()?;
        info!(
            games = replay.games_written(),
            replay = %replay.path().display(),
            "Self-play complete"
        );
        Ok(())
    }

    fn opponent(&self) -> Box<dyn Policy> {
        match self.config.opponent.as_str() {
            "random" => Box::new(RandomPolicy::with_seed(self.config.seed.wrapping_add(7))),
            _ => Box::new(RolloutPolicy::new(
                self.config.opponent_mcts_config(),
                self.config.seed.wrapping_add(7),
            )),
        }
    }

    fn run_match(&mut self) -> Result<EvaluationSummary> {
        let mut candidate = ZeroPolicy::new(
            UniformOracle::new(),
            self.config.mcts_config(),
            PlayMode::Match,
            self.config.seed,
        );
        let mut opponent = self.opponent();

        info!(
            episodes = self.config.episodes,
            opponent = opponent.name(),
            opponent_playouts = self.config.opponent_playouts,
            "Starting evaluation match"
        );

        let stats = &self.stats;
        let log_interval = self.config.log_interval;
        let total = self.config.episodes;

        evaluate_policies_with(
            &mut self.board,
            &mut candidate,
            opponent.as_mut(),
            total,
            self.config.eval_temperature,
            |episode, record, tally| {
                stats.record_episode(record.moves.len() as u32, record.outcome);
                if log_interval > 0 && (episode + 1) % log_interval == 0 {
                    info!(
                        episode = episode + 1,
                        total,
                        wins = tally.wins,
                        losses = tally.losses,
                        ties = tally.ties,
                        "Match progress"
                    );
                    stats.write_stats();
                }
            },
        )
    }
}
