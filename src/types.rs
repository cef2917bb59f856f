use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::board::{BOARD_SIZE, Board};

/// One of the two competing colors.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Black,
    White,
}

impl Side {
    /// Strict complement: there is no third side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Cell state occupied by this side's disc.
    pub fn cell(self) -> Cell {
        match self {
            Side::Black => Cell::Black,
            Side::White => Cell::White,
        }
    }
}

/// Contents of a single board square.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl Cell {
    /// Wire code used in exported boards: 0=empty, 1=black, 2=white.
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }
}

/// A board coordinate, 0-indexed row then column.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display("({row}, {col})")]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// Row-major square index, `None` when off the board.
    pub fn index(self) -> Option<usize> {
        self.is_on_board()
            .then(|| self.row as usize * BOARD_SIZE + self.col as usize)
    }

    pub(crate) fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / BOARD_SIZE) as u8,
            col: (idx % BOARD_SIZE) as u8,
        }
    }
}

/// Which kind of player is bound to each side for a game.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Human plays Black, AI plays White.
    HumanVsAi,
    AiVsAi,
    HumanVsHuman,
}

impl GameMode {
    /// Decodes the numeric mode used by the wasm binding.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::HumanVsAi),
            1 => Some(Self::AiVsAi),
            2 => Some(Self::HumanVsHuman),
            _ => None,
        }
    }
}

/// Move chosen by the search together with its score.
///
/// Positive scores favor White and negative scores favor Black, matching the
/// evaluator's sign convention for the side that moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub position: Position,
    pub score: i32,
}

/// Winner of a finished game.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    #[display("{_0} wins")]
    Winner(Side),
    #[display("tie")]
    Tie,
}

/// Final result after game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameResult {
    pub outcome: Outcome,
    pub black_count: u8,
    pub white_count: u8,
}

impl GameResult {
    pub fn from_board(board: &Board) -> Self {
        let black_count = board.count_pieces(Side::Black);
        let white_count = board.count_pieces(Side::White);
        let outcome = if black_count > white_count {
            Outcome::Winner(Side::Black)
        } else if white_count > black_count {
            Outcome::Winner(Side::White)
        } else {
            Outcome::Tie
        };
        Self {
            outcome,
            black_count,
            white_count,
        }
    }
}

/// Public game state handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub board: Board,
    /// `None` once the game is over.
    pub side_to_move: Option<Side>,
    pub mode: GameMode,
    pub black_count: u8,
    pub white_count: u8,
    pub is_game_over: bool,
    /// Contract:
    /// - `true` when the last transition skipped a side that had no legal move.
    /// - `false` after a normal alternation and at game start.
    pub is_pass: bool,
    /// Squares (0..=63) flipped by the last move, empty before the first move.
    pub flipped: Vec<u8>,
    pub last_move: Option<Position>,
    pub result: Option<GameResult>,
}
