//! Connect-N board state machine (Gomoku and friends).
//!
//! Two players alternately place stones on a `width x height` grid. The first
//! player to form an unbroken horizontal, vertical, or diagonal line of
//! `win_length` stones wins; a full board without such a line is a draw.
//!
//! # Board Layout
//!
//! Cells are stored densely in row-major order, `index = row * width + col`:
//! ```text
//! Row 2: [10][11][12][13][14]
//! Row 1: [ 5][ 6][ 7][ 8][ 9]
//! Row 0: [ 0][ 1][ 2][ 3][ 4]
//!         Col 0  1  2  3  4
//! ```
//!
//! # Usage
//!
//! ```rust
//! use games_gomoku::{Board, Outcome, Player};
//!
//! let mut board = Board::new(5, 5, 4, Player::One).unwrap();
//! board.apply_move(board.to_index(2, 2).unwrap()).unwrap();
//! assert_eq!(board.current_player(), Player::Two);
//! assert_eq!(board.terminal_status(), None);
//! ```

use thiserror::Error;

/// Errors raised at the board boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board {width}x{height} is smaller than win length {win_length}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        win_length: usize,
    },

    #[error("illegal move: cell {0} is not available")]
    IllegalMove(usize),

    #[error("game is already over")]
    GameOver,
}

/// One side of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 1-based player number, as used in logs and configuration.
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Parse a 1-based player number.
    pub fn from_number(n: u8) -> Option<Player> {
        match n {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Draw,
}

impl Outcome {
    /// Game value from `perspective`'s point of view.
    ///
    /// * `1.0` if `perspective` won
    /// * `-1.0` if `perspective` lost
    /// * `0.0` for a draw
    #[inline]
    pub fn value_for(self, perspective: Player) -> f32 {
        match self {
            Outcome::Win(winner) if winner == perspective => 1.0,
            Outcome::Win(_) => -1.0,
            Outcome::Draw => 0.0,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Win(p) => Some(p),
            Outcome::Draw => None,
        }
    }
}

/// Axis directions scanned from the last move: row, column, and both diagonals.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Number of feature planes produced by [`Board::encode_planes`].
pub const NUM_PLANES: usize = 4;

/// Connect-N board state.
///
/// `Clone` produces a fully independent deep copy, which is what search uses
/// to explore speculative lines without touching the authoritative board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    win_length: usize,
    /// Occupant of each cell, row-major
    cells: Vec<Option<Player>>,
    /// Unplayed cell indices (order not significant)
    available: Vec<usize>,
    /// Played cell indices in move order
    history: Vec<usize>,
    current_player: Player,
    last_move: Option<usize>,
    /// Cached result of the win check run after every committed move
    winner: Option<Player>,
}

impl Board {
    /// Create a board and reset it for a new game.
    ///
    /// Fails if either dimension is smaller than `win_length` (or if
    /// `win_length` is zero).
    pub fn new(
        width: usize,
        height: usize,
        win_length: usize,
        start_player: Player,
    ) -> Result<Self, BoardError> {
        if win_length == 0 || width < win_length || height < win_length {
            return Err(BoardError::InvalidDimensions {
                width,
                height,
                win_length,
            });
        }

        let mut board = Self {
            width,
            height,
            win_length,
            cells: Vec::new(),
            available: Vec::new(),
            history: Vec::new(),
            current_player: start_player,
            last_move: None,
            winner: None,
        };
        board.reset(start_player);
        Ok(board)
    }

    /// Clear the board for a new game with `start_player` to move.
    pub fn reset(&mut self, start_player: Player) {
        let size = self.size();
        self.cells = vec![None; size];
        self.available = (0..size).collect();
        self.history = Vec::with_capacity(size);
        self.current_player = start_player;
        self.last_move = None;
        self.winner = None;
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn win_length(&self) -> usize {
        self.win_length
    }

    /// Total number of cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    /// Convert a cell index into `(row, col)`.
    #[inline]
    pub fn to_location(&self, index: usize) -> (usize, usize) {
        (index / self.width, index % self.width)
    }

    /// Convert `(row, col)` into a cell index, or `None` if off the board.
    #[inline]
    pub fn to_index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            Some(row * self.width + col)
        } else {
            None
        }
    }

    /// Occupant of a cell (`None` = empty or out of range).
    pub fn cell(&self, index: usize) -> Option<Player> {
        self.cells.get(index).copied().flatten()
    }

    /// Indices that can still be played.
    #[inline]
    pub fn legal_moves(&self) -> &[usize] {
        &self.available
    }

    /// Whether `index` is an unplayed cell.
    pub fn is_available(&self, index: usize) -> bool {
        index < self.size() && self.cells[index].is_none()
    }

    /// Played indices in move order.
    #[inline]
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    #[inline]
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    /// Player whose turn it is.
    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Most recently played index, `None` before the first move.
    #[inline]
    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    /// Commit a move for the current player.
    ///
    /// The index must be in [`legal_moves`](Self::legal_moves) and the game
    /// must still be running; otherwise the board is left untouched.
    pub fn apply_move(&mut self, index: usize) -> Result<(), BoardError> {
        if self.winner.is_some() || self.available.is_empty() {
            return Err(BoardError::GameOver);
        }
        let slot = self
            .available
            .iter()
            .position(|&m| m == index)
            .ok_or(BoardError::IllegalMove(index))?;

        self.available.swap_remove(slot);
        self.cells[index] = Some(self.current_player);
        self.history.push(index);
        self.last_move = Some(index);
        self.current_player = self.current_player.opponent();
        self.winner = self.check_winner();

        Ok(())
    }

    /// Look for a completed line through the last move.
    ///
    /// Only the stone just placed can complete a new line, so each of the
    /// four axes is walked outward from that cell in both directions, stopping
    /// at the board edge. Runs never wrap across rows or columns.
    pub fn check_winner(&self) -> Option<Player> {
        let last = self.last_move?;
        let player = self.cells[last]?;
        let (row, col) = self.to_location(last);

        for (dr, dc) in DIRECTIONS {
            let count = 1
                + self.run_length(row, col, dr, dc, player)
                + self.run_length(row, col, -dr, -dc, player);
            if count >= self.win_length {
                return Some(player);
            }
        }

        None
    }

    /// Count contiguous `player` stones starting next to `(row, col)` and
    /// stepping by `(dr, dc)`, clipped at the board edges.
    fn run_length(&self, row: usize, col: usize, dr: isize, dc: isize, player: Player) -> usize {
        let mut count = 0;
        let (mut r, mut c) = (row as isize + dr, col as isize + dc);

        while r >= 0 && r < self.height as isize && c >= 0 && c < self.width as isize {
            if self.cells[r as usize * self.width + c as usize] != Some(player) {
                break;
            }
            count += 1;
            r += dr;
            c += dc;
        }

        count
    }

    /// `Some(outcome)` once the game is over, `None` while it is running.
    pub fn terminal_status(&self) -> Option<Outcome> {
        if let Some(winner) = self.winner {
            Some(Outcome::Win(winner))
        } else if self.history.len() == self.size() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal_status().is_some()
    }

    /// Oracle input planes, each `width * height` floats in row-major order:
    ///
    /// 0. stones of the player to move
    /// 1. stones of the opponent
    /// 2. the last move
    /// 3. all ones when the first mover is to play (even move count)
    pub fn encode_planes(&self) -> Vec<f32> {
        let size = self.size();
        let mut planes = vec![0.0; NUM_PLANES * size];

        for (i, cell) in self.cells.iter().enumerate() {
            match cell {
                Some(p) if *p == self.current_player => planes[i] = 1.0,
                Some(_) => planes[size + i] = 1.0,
                None => {}
            }
        }

        if let Some(last) = self.last_move {
            planes[2 * size + last] = 1.0;
        }

        if self.history.len() % 2 == 0 {
            for v in &mut planes[3 * size..] {
                *v = 1.0;
            }
        }

        planes
    }
}
