pub mod eval;
pub mod search;

pub use eval::evaluate;
pub use search::{DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH, MinimaxSelector, Searcher, best_move};
