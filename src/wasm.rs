//! Browser-facing wrapper around [`GameController`].
//!
//! Values cross the boundary through `serde-wasm-bindgen`; errors become JS
//! strings carrying the [`MoveError`] message.

use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::error::MoveError;
use crate::game::GameController;
use crate::types::{GameMode, Position};

#[wasm_bindgen]
pub struct ReversiGame {
    inner: GameController,
}

#[wasm_bindgen]
impl ReversiGame {
    /// `mode`: 0 = human vs AI, 1 = AI vs AI, 2 = human vs human.
    #[wasm_bindgen(constructor)]
    pub fn new(mode: u8) -> Result<ReversiGame, JsValue> {
        Ok(Self {
            inner: GameController::new_game(parse_mode(mode)?),
        })
    }

    /// Starts a game with settings deserialized from a JS object such as
    /// `{ search_depth: 2 }`.
    pub fn with_config(mode: u8, config: JsValue) -> Result<ReversiGame, JsValue> {
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(Self {
            inner: GameController::with_config(parse_mode(mode)?, &config),
        })
    }

    /// Legal moves for the side to move; empty once the game is over.
    pub fn legal_moves(&self) -> Result<JsValue, JsValue> {
        let moves = self
            .inner
            .side_to_move()
            .map(|side| self.inner.legal_moves(side))
            .unwrap_or_default();
        Ok(serde_wasm_bindgen::to_value(&moves)?)
    }

    pub fn submit_move(&mut self, row: u8, col: u8) -> Result<JsValue, JsValue> {
        let state = self
            .inner
            .submit_human_move(Position::new(row, col))
            .map_err(to_js_error)?;
        Ok(serde_wasm_bindgen::to_value(&state)?)
    }

    pub fn request_ai_move(&mut self) -> Result<JsValue, JsValue> {
        let state = self.inner.request_ai_move().map_err(to_js_error)?;
        Ok(serde_wasm_bindgen::to_value(&state)?)
    }

    pub fn run_ai_turns(&mut self) -> Result<JsValue, JsValue> {
        let state = self.inner.run_ai_turns().map_err(to_js_error)?;
        Ok(serde_wasm_bindgen::to_value(&state)?)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.current_state())?)
    }

    /// Text grid of the board for debugging.
    pub fn render(&self) -> String {
        self.inner.board().to_string()
    }
}

fn parse_mode(code: u8) -> Result<GameMode, JsValue> {
    GameMode::from_code(code)
        .ok_or_else(|| JsValue::from_str(&format!("unknown game mode {code}")))
}

fn to_js_error(err: MoveError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
