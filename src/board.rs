use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::BoardParseError;
use crate::types::{Cell, Position, Side};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

const EMPTY_CHAR: char = '.';
const BLACK_CHAR: char = 'B';
const WHITE_CHAR: char = 'W';

/// Reversi board state represented by two bitboards.
///
/// Bit `row * 8 + col` is set in `black` or `white` when that side owns the
/// square. The board is plain storage: legality lives in [`crate::rules`].
/// `Board` is `Copy`, so every clone is a deep copy with no shared storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Board with no discs at all.
    pub fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// Builds a board from raw bitboards. Squares set in both masks are
    /// treated as black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    /// Returns `(black, white)` bitboards.
    pub fn bitboards(&self) -> (u64, u64) {
        (self.black, self.white)
    }

    /// Returns `(own, opponent)` bitboards from `side`'s point of view.
    pub(crate) fn split(&self, side: Side) -> (u64, u64) {
        match side {
            Side::Black => (self.black, self.white),
            Side::White => (self.white, self.black),
        }
    }

    /// Off-board positions read as empty.
    pub fn get(&self, pos: Position) -> Cell {
        let Some(idx) = pos.index() else {
            return Cell::Empty;
        };
        let square = bit(idx);
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Writes a cell. Off-board positions are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        let Some(idx) = pos.index() else {
            return;
        };
        let square = bit(idx);
        self.black &= !square;
        self.white &= !square;
        match cell {
            Cell::Black => self.black |= square,
            Cell::White => self.white |= square,
            Cell::Empty => {}
        }
    }

    /// Places `side`'s disc on `square` and turns every square in `flips`
    /// to `side`.
    pub(crate) fn place_mask(&mut self, square: u64, flips: u64, side: Side) {
        let changed = square | flips;
        match side {
            Side::Black => {
                self.black |= changed;
                self.white &= !changed;
            }
            Side::White => {
                self.white |= changed;
                self.black &= !changed;
            }
        }
    }

    pub fn count_pieces(&self, side: Side) -> u8 {
        match side {
            Side::Black => self.black.count_ones() as u8,
            Side::White => self.white.count_ones() as u8,
        }
    }

    /// Total number of discs on the board.
    pub fn disc_count(&self) -> u8 {
        (self.black | self.white).count_ones() as u8
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        NUM_SQUARES as u8 - self.disc_count()
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (idx, cell) in board.iter_mut().enumerate() {
            *cell = self.get(Position::from_index(idx)).code();
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Row-major text grid, one character per cell (`.` empty, `B` black,
/// `W` white), rows separated by newlines.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE as u8 {
            for col in 0..BOARD_SIZE as u8 {
                let ch = match self.get(Position::new(row, col)) {
                    Cell::Empty => EMPTY_CHAR,
                    Cell::Black => BLACK_CHAR,
                    Cell::White => WHITE_CHAR,
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses the [`Display`](fmt::Display) format. Whitespace is ignored.
impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut board = Board::empty();
        let mut idx = 0usize;
        for ch in s.chars().filter(|c| !c.is_whitespace()) {
            let cell = match ch {
                EMPTY_CHAR => Cell::Empty,
                BLACK_CHAR => Cell::Black,
                WHITE_CHAR => Cell::White,
                other => return Err(BoardParseError::InvalidCell(other)),
            };
            if idx < NUM_SQUARES {
                board.set(Position::from_index(idx), cell);
            }
            idx += 1;
        }
        if idx != NUM_SQUARES {
            return Err(BoardParseError::WrongCellCount(idx));
        }
        Ok(board)
    }
}

/// Serialized as the 64-cell code array of [`Board::to_array`].
impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().as_slice().serialize(serializer)
    }
}

pub(crate) fn bit(idx: usize) -> u64 {
    if idx < NUM_SQUARES { 1u64 << idx } else { 0 }
}
