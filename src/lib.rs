use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod rules;
pub mod types;
pub mod wasm;

pub use ai::{MinimaxSelector, Searcher, best_move, evaluate};
pub use board::Board;
pub use config::EngineConfig;
pub use error::{BoardParseError, IllegalMoveReason, MoveError};
pub use game::{GameController, MoveSelector, Phase, Player, PlayerMove};
pub use types::{Cell, GameMode, GameResult, GameState, Outcome, Position, SearchResult, Side};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
