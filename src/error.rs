//! Error types reported by the rules engine and the game controller.

use derive_more::Display;

use crate::types::{Position, Side};

/// Why a placement was rejected.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    #[display("square is already occupied")]
    Occupied,
    #[display("move flips no discs")]
    NoFlips,
    #[display("coordinates are off the board")]
    OffBoard,
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The position cannot be played by the side to move.
    #[display("illegal move at {_0}: {_1}")]
    IllegalMove(Position, IllegalMoveReason),

    /// A human move was submitted while an AI controls the side to move.
    #[display("{_0} is not controlled by a human player")]
    NotHumanTurn(Side),

    /// An AI move was requested while a human controls the side to move.
    #[display("{_0} is not controlled by an AI player")]
    NotAiTurn(Side),

    #[display("game is already over")]
    GameAlreadyOver,

    /// The move selector returned nothing although the side has moves.
    #[display("AI for {_0} could not select a move")]
    NoMoveSelected(Side),
}

impl MoveError {
    /// `true` for the errors raised when the wrong kind of player tried to move.
    pub fn is_out_of_turn(&self) -> bool {
        matches!(self, Self::NotHumanTurn(_) | Self::NotAiTurn(_))
    }

    pub fn is_illegal_move(&self) -> bool {
        matches!(self, Self::IllegalMove(..))
    }
}

impl std::error::Error for MoveError {}

/// Error produced when parsing a text board.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum BoardParseError {
    #[display("unexpected character {_0:?} in board text")]
    InvalidCell(char),
    #[display("board text must contain 8 rows of 8 cells, got {_0} cells")]
    WrongCellCount(usize),
}

impl std::error::Error for BoardParseError {}
