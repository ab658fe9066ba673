//! Game controller: drives policies over an authoritative board.
//!
//! The controller owns the board, commits every chosen move, and resets the
//! policies' search state at the start of each game.

use anyhow::{anyhow, Context, Result};
use games_gomoku::{Board, Outcome, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::policy::Policy;

/// Result of one game between two policies.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub outcome: Outcome,
    /// Cell indices in move order
    pub moves: Vec<usize>,
}

/// Training data from one self-play game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfPlayRecord {
    /// Oracle input planes for each position, before the move was played
    pub states: Vec<Vec<f32>>,
    /// Dense search distribution for each position
    pub move_probs: Vec<Vec<f32>>,
    /// Final result from the perspective of the player to move at each position
    pub winners_z: Vec<f32>,
    /// 1, 2, or 0 for a draw
    pub winner: u8,
    pub moves: Vec<usize>,
}

impl SelfPlayRecord {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Win/loss/draw tally from the candidate's perspective.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// `(wins + 0.5 * ties) / games`
    pub win_ratio: f64,
}

/// Play one game. `first` plays as [`Player::One`], `second` as
/// [`Player::Two`]; `start_player` moves first.
pub fn play_game(
    board: &mut Board,
    first: &mut dyn Policy,
    second: &mut dyn Policy,
    start_player: Player,
    temperature: f32,
) -> Result<GameRecord> {
    board.reset(start_player);
    first.reset();
    second.reset();

    let outcome = loop {
        if let Some(outcome) = board.terminal_status() {
            break outcome;
        }

        let mover = board.current_player();
        let policy: &mut dyn Policy = match mover {
            Player::One => &mut *first,
            Player::Two => &mut *second,
        };

        let choice = policy.select_move(board, temperature, false)?;
        board
            .apply_move(choice.action)
            .with_context(|| format!("{} policy chose an illegal move", policy.name()))?;

        let (row, col) = board.to_location(choice.action);
        debug!(
            player = mover.number(),
            policy = policy.name(),
            action = choice.action,
            row,
            col,
            "Move committed"
        );

        first.observe_move(choice.action);
        second.observe_move(choice.action);
    };

    Ok(GameRecord {
        outcome,
        moves: board.history().to_vec(),
    })
}

/// Play one game of `policy` against itself, recording search distributions.
pub fn self_play(
    board: &mut Board,
    policy: &mut dyn Policy,
    start_player: Player,
    temperature: f32,
) -> Result<SelfPlayRecord> {
    board.reset(start_player);
    policy.reset();

    let mut states = Vec::new();
    let mut move_probs = Vec::new();
    let mut movers = Vec::new();

    let outcome = loop {
        if let Some(outcome) = board.terminal_status() {
            break outcome;
        }

        let choice = policy.select_move(board, temperature, true)?;
        let distribution = choice
            .distribution
            .ok_or_else(|| anyhow!("{} policy returned no distribution", policy.name()))?;

        states.push(board.encode_planes());
        move_probs.push(distribution);
        movers.push(board.current_player());

        board.apply_move(choice.action)?;
        policy.observe_move(choice.action);
        debug!(
            action = choice.action,
            moves_played = board.moves_played(),
            "Self-play move committed"
        );
    };

    policy.reset();

    let winners_z = movers.iter().map(|&p| outcome.value_for(p)).collect();
    Ok(SelfPlayRecord {
        states,
        move_probs,
        winners_z,
        winner: outcome.winner().map_or(0, Player::number),
        moves: board.history().to_vec(),
    })
}

/// Play `n_games` between `candidate` (as player one) and `opponent`,
/// alternating who moves first, and report the candidate's win ratio.
pub fn evaluate_policies(
    board: &mut Board,
    candidate: &mut dyn Policy,
    opponent: &mut dyn Policy,
    n_games: u32,
    temperature: f32,
) -> Result<EvaluationSummary> {
    evaluate_policies_with(board, candidate, opponent, n_games, temperature, |_, _, _| {})
}

/// [`evaluate_policies`], calling `on_game(index, record, tally_so_far)`
/// after every finished game.
pub fn evaluate_policies_with<F>(
    board: &mut Board,
    candidate: &mut dyn Policy,
    opponent: &mut dyn Policy,
    n_games: u32,
    temperature: f32,
    mut on_game: F,
) -> Result<EvaluationSummary>
where
    F: FnMut(u32, &GameRecord, &EvaluationSummary),
{
    if n_games == 0 {
        return Err(anyhow!("evaluation needs at least one game"));
    }

    let mut summary = EvaluationSummary::default();

    for i in 0..n_games {
        let start_player = if i % 2 == 0 { Player::One } else { Player::Two };
        let record = play_game(board, candidate, opponent, start_player, temperature)?;
        match record.outcome {
            Outcome::Win(Player::One) => summary.wins += 1,
            Outcome::Win(Player::Two) => summary.losses += 1,
            Outcome::Draw => summary.ties += 1,
        }
        summary.games += 1;
        summary.win_ratio =
            (summary.wins as f64 + 0.5 * summary.ties as f64) / summary.games as f64;
        on_game(i, &record, &summary);
    }

    info!(
        candidate = candidate.name(),
        opponent = opponent.name(),
        games = n_games,
        wins = summary.wins,
        losses = summary.losses,
        ties = summary.ties,
        win_ratio = summary.win_ratio,
        "Evaluation complete"
    );

    Ok(summary)
}
