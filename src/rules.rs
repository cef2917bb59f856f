//! Move legality, disc flipping and turn-availability checks.
//!
//! Everything here is a pure function over a [`Board`]; the only mutation is
//! [`apply_move`], which refuses illegal moves without touching the board.

use crate::board::{BOARD_SIZE, Board, NUM_SQUARES, bit};
use crate::error::{IllegalMoveReason, MoveError};
use crate::types::{Position, Side};

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const NOT_COL_0: u64 = !0x0101_0101_0101_0101;
const NOT_COL_7: u64 = !0x8080_8080_8080_8080;

/// Opponent of `side`.
pub fn opponent(side: Side) -> Side {
    side.opponent()
}

/// Checks whether `side` may place a disc at `pos`.
pub fn is_legal_move(board: &Board, pos: Position, side: Side) -> bool {
    check_move(board, pos, side).is_ok()
}

/// Returns the mask of discs a move would flip, or the reason it is illegal.
///
/// An occupied target is rejected before any direction is scanned.
pub fn flips_for(board: &Board, pos: Position, side: Side) -> Result<u64, IllegalMoveReason> {
    let idx = pos.index().ok_or(IllegalMoveReason::OffBoard)?;
    let (me, opp) = board.split(side);
    if ((me | opp) & bit(idx)) != 0 {
        return Err(IllegalMoveReason::Occupied);
    }
    match collect_flips(idx, me, opp) {
        0 => Err(IllegalMoveReason::NoFlips),
        flips => Ok(flips),
    }
}

/// Places `side`'s disc at `pos` and flips every bracketed run.
/// Returns the flipped bit mask; an illegal move leaves the board unchanged.
pub fn apply_move(board: &mut Board, pos: Position, side: Side) -> Result<u64, MoveError> {
    let flips = check_move(board, pos, side)?;
    if let Some(idx) = pos.index() {
        board.place_mask(bit(idx), flips, side);
    }
    Ok(flips)
}

/// True iff any square is a legal move for `side`.
pub fn has_any_legal_move(board: &Board, side: Side) -> bool {
    legal_move_mask(board, side) != 0
}

/// Legal moves for `side` in row-major order.
pub fn legal_moves(board: &Board, side: Side) -> Vec<Position> {
    mask_to_indices(legal_move_mask(board, side))
        .into_iter()
        .map(|idx| Position::from_index(idx as usize))
        .collect()
}

/// Returns legal move mask for the given side.
///
/// Each direction walks outward from the mover's discs across runs of
/// opponent discs; a run of up to six opponents ending on an empty square
/// marks that square as legal.
pub fn legal_move_mask(board: &Board, side: Side) -> u64 {
    let (me, opp) = board.split(side);
    let empty = !(me | opp);
    let mut legal = 0u64;

    for (dr, dc) in DIRECTIONS {
        let mut run = shift(me, dr, dc) & opp;
        for _ in 0..BOARD_SIZE - 3 {
            run |= shift(run, dr, dc) & opp;
        }
        legal |= shift(run, dr, dc) & empty;
    }

    legal
}

/// Converts a square mask to ascending square indices.
pub fn mask_to_indices(mask: u64) -> Vec<u8> {
    let mut bits = mask;
    let mut out = Vec::new();

    while bits != 0 {
        let idx = bits.trailing_zeros() as u8;
        out.push(idx);
        bits &= bits - 1;
    }

    out
}

fn check_move(board: &Board, pos: Position, side: Side) -> Result<u64, MoveError> {
    flips_for(board, pos, side).map_err(|reason| MoveError::IllegalMove(pos, reason))
}

fn collect_flips(idx: usize, me: u64, opp: u64) -> u64 {
    if idx >= NUM_SQUARES {
        return 0;
    }

    let row = (idx / BOARD_SIZE) as i32;
    let col = (idx % BOARD_SIZE) as i32;
    let mut flips = 0u64;

    for (dr, dc) in DIRECTIONS {
        let mut r = row + dr;
        let mut c = col + dc;
        let mut line = 0u64;

        while in_bounds(r, c) {
            let square = bit((r as usize) * BOARD_SIZE + c as usize);
            if (opp & square) != 0 {
                line |= square;
            } else {
                if (me & square) != 0 {
                    flips |= line;
                }
                break;
            }

            r += dr;
            c += dc;
        }
    }

    flips
}

fn shift(mask: u64, dr: i32, dc: i32) -> u64 {
    let offset = dr * BOARD_SIZE as i32 + dc;
    let moved = if offset >= 0 {
        mask << offset
    } else {
        mask >> -offset
    };
    match dc {
        1 => moved & NOT_COL_0,
        -1 => moved & NOT_COL_7,
        _ => moved,
    }
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
