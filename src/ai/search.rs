use std::time::Duration;

use tracing::{debug, warn};
use web_time::Instant;

use crate::ai::eval::evaluate;
use crate::board::Board;
use crate::game::MoveSelector;
use crate::rules;
use crate::types::{SearchResult, Side};

/// Depth used by AI players unless configured otherwise.
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

/// Deepest search an AI player will run. Without pruning the tree grows
/// exponentially with depth.
pub const MAX_SEARCH_DEPTH: u8 = 6;

/// Fixed-depth minimax without pruning.
///
/// Leaves are scored from the point of view of the side that just moved, and
/// the selection polarity is tied to color: White maximizes, Black minimizes.
/// Ties keep the first move in row-major order.
pub struct Searcher {
    start_time: Instant,
    deadline: Option<Duration>,
    timed_out: bool,
    nodes: u64,
}

impl Searcher {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            deadline: None,
            timed_out: false,
            nodes: 0,
        }
    }

    /// Searcher that stops exploring further root moves once `deadline` has
    /// elapsed. The first root move is always searched to full depth.
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            ..Self::new()
        }
    }

    /// Searches the best move for `side`.
    /// Returns `None` when `side` has no legal move.
    pub fn search(&mut self, board: &Board, side: Side, depth: u8) -> Option<SearchResult> {
        self.start_time = Instant::now();
        self.timed_out = false;
        self.nodes = 0;

        let result = self.minimax(board, side, depth, true);

        if self.timed_out {
            warn!(?side, depth, "search deadline reached, returning best root move so far");
        }
        debug!(
            ?side,
            depth,
            nodes = self.nodes,
            elapsed_us = self.start_time.elapsed().as_micros() as u64,
            result = ?result,
            "search finished"
        );

        result
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Number of positions generated by the last search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn minimax(
        &mut self,
        board: &Board,
        side: Side,
        depth: u8,
        root: bool,
    ) -> Option<SearchResult> {
        let opponent = side.opponent();
        let mut best: Option<SearchResult> = None;

        for position in rules::legal_moves(board, side) {
            if root && best.is_some() && self.deadline_passed() {
                self.timed_out = true;
                break;
            }

            let mut next = *board;
            if rules::apply_move(&mut next, position, side).is_err() {
                continue;
            }
            self.nodes += 1;

            let score = if depth == 0 || !rules::has_any_legal_move(&next, opponent) {
                evaluate(&next, side)
            } else {
                match self.minimax(&next, opponent, depth - 1, false) {
                    Some(reply) => reply.score,
                    None => evaluate(&next, side),
                }
            };

            if best.is_none_or(|current| improves(side, score, current.score)) {
                best = Some(SearchResult { position, score });
            }
        }

        best
    }

    fn deadline_passed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| self.start_time.elapsed() >= deadline)
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Best move for `side` searched to `depth` extra plies.
/// Returns `None` when `side` has no legal move.
pub fn best_move(board: &Board, side: Side, depth: u8) -> Option<SearchResult> {
    Searcher::new().search(board, side, depth)
}

fn improves(side: Side, score: i32, best_score: i32) -> bool {
    match side {
        Side::White => score > best_score,
        Side::Black => score < best_score,
    }
}

/// Default AI move selector backed by [`Searcher`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MinimaxSelector {
    deadline: Option<Duration>,
}

impl MinimaxSelector {
    pub fn new(deadline: Option<Duration>) -> Self {
        Self { deadline }
    }
}

impl MoveSelector for MinimaxSelector {
    fn select_move(&self, board: &Board, side: Side, depth: u8) -> Option<SearchResult> {
        let mut searcher = match self.deadline {
            Some(deadline) => Searcher::with_deadline(deadline),
            None => Searcher::new(),
        };
        searcher.search(board, side, depth)
    }
}
