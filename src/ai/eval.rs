use crate::board::Board;
use crate::types::Side;

/// Disc differential from `side`'s point of view.
///
/// Purely material: it does not look at mobility or whether the position is
/// terminal.
pub fn evaluate(board: &Board, side: Side) -> i32 {
    board.count_pieces(side) as i32 - board.count_pieces(side.opponent()) as i32
}
