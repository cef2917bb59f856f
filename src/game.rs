//! Turn order, player binding and game-over detection.

use tracing::{debug, info, instrument, warn};

use crate::ai::MinimaxSelector;
use crate::board::Board;
use crate::config::EngineConfig;
use crate::error::MoveError;
use crate::rules;
use crate::types::{GameMode, GameResult, GameState, Position, SearchResult, Side};

/// Pluggable AI move source. The default is [`MinimaxSelector`].
pub trait MoveSelector: Send + Sync {
    fn select_move(&self, board: &Board, side: Side, depth: u8) -> Option<SearchResult>;
}

/// Who produces the moves for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    /// Moves arrive from the presentation layer via
    /// [`GameController::submit_human_move`].
    Human,
    /// Moves are computed synchronously by a [`MoveSelector`].
    Ai { depth: u8 },
}

/// Answer of [`Player::request_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerMove {
    Ready(Position),
    /// A human has to supply the move.
    Pending,
    NoLegalMove,
}

impl Player {
    pub fn is_human(self) -> bool {
        matches!(self, Player::Human)
    }

    /// Never blocks: humans answer [`PlayerMove::Pending`].
    pub fn request_move(
        self,
        board: &Board,
        side: Side,
        selector: &dyn MoveSelector,
    ) -> PlayerMove {
        match self {
            Player::Human => PlayerMove::Pending,
            Player::Ai { depth } => match selector.select_move(board, side, depth) {
                Some(result) => PlayerMove::Ready(result.position),
                None => PlayerMove::NoLegalMove,
            },
        }
    }
}

/// Controller state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingMove(Side),
    GameOver(GameResult),
}

/// Owns the authoritative board for one game.
pub struct GameController {
    board: Board,
    mode: GameMode,
    black: Player,
    white: Player,
    phase: Phase,
    is_pass: bool,
    flipped: Vec<u8>,
    last_move: Option<Position>,
    selector: Box<dyn MoveSelector>,
}

impl GameController {
    /// Starts a game from the standard layout with Black to move.
    pub fn new_game(mode: GameMode) -> Self {
        Self::with_config(mode, &EngineConfig::default())
    }

    pub fn with_config(mode: GameMode, config: &EngineConfig) -> Self {
        Self::with_selector(
            mode,
            config,
            Box::new(MinimaxSelector::new(config.search_deadline())),
        )
    }

    /// Like [`GameController::with_config`] but with a custom AI.
    pub fn with_selector(
        mode: GameMode,
        config: &EngineConfig,
        selector: Box<dyn MoveSelector>,
    ) -> Self {
        Self::from_position(mode, config, selector, Board::new(), Side::Black)
    }

    /// Starts from an arbitrary board with `to_move` about to play.
    ///
    /// If `to_move` has no legal move the turn passes to the other side, and
    /// when neither side can move the game starts out finished.
    #[instrument(skip(config, selector, board))]
    pub fn from_position(
        mode: GameMode,
        config: &EngineConfig,
        selector: Box<dyn MoveSelector>,
        board: Board,
        to_move: Side,
    ) -> Self {
        let ai = Player::Ai {
            depth: config.effective_depth(),
        };
        let (black, white) = match mode {
            GameMode::HumanVsAi => (Player::Human, ai),
            GameMode::AiVsAi => (ai, ai),
            GameMode::HumanVsHuman => (Player::Human, Player::Human),
        };

        let (phase, is_pass) = resolve_phase(&board, to_move);
        info!(%mode, depth = config.effective_depth(), ?phase, "new game");

        Self {
            board,
            mode,
            black,
            white,
            phase,
            is_pass,
            flipped: Vec::new(),
            last_move: None,
            selector,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player_for(&self, side: Side) -> Player {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    /// Side to move, `None` once the game is over.
    pub fn side_to_move(&self) -> Option<Side> {
        match self.phase {
            Phase::AwaitingMove(side) => Some(side),
            Phase::GameOver(_) => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    /// Legal moves for `side` on the live board, in row-major order.
    pub fn legal_moves(&self, side: Side) -> Vec<Position> {
        rules::legal_moves(&self.board, side)
    }

    /// What the player bound to the side to move would do right now.
    pub fn pending_move(&self) -> PlayerMove {
        match self.phase {
            Phase::AwaitingMove(side) => self
                .player_for(side)
                .request_move(&self.board, side, self.selector.as_ref()),
            Phase::GameOver(_) => PlayerMove::NoLegalMove,
        }
    }

    /// Plays a human move for the side to move.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn submit_human_move(&mut self, pos: Position) -> Result<GameState, MoveError> {
        let side = self.awaiting_side()?;
        if !self.player_for(side).is_human() {
            return Err(MoveError::NotHumanTurn(side));
        }

        self.apply_move(pos, side)?;
        Ok(self.current_state())
    }

    /// Computes and plays one AI move for the side to move.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn request_ai_move(&mut self) -> Result<GameState, MoveError> {
        let side = self.awaiting_side()?;
        let player = self.player_for(side);
        if player.is_human() {
            return Err(MoveError::NotAiTurn(side));
        }

        let pos = match player.request_move(&self.board, side, self.selector.as_ref()) {
            PlayerMove::Ready(pos) => pos,
            PlayerMove::Pending | PlayerMove::NoLegalMove => {
                warn!(%side, "AI produced no move");
                return Err(MoveError::NoMoveSelected(side));
            }
        };

        if let Err(err) = self.apply_move(pos, side) {
            warn!(%side, %pos, %err, "AI selected an illegal move");
            return Err(err);
        }
        Ok(self.current_state())
    }

    /// Plays AI moves until the game ends or a human is to move.
    pub fn run_ai_turns(&mut self) -> Result<GameState, MoveError> {
        while let Phase::AwaitingMove(side) = self.phase {
            if self.player_for(side).is_human() {
                break;
            }
            self.request_ai_move()?;
        }
        Ok(self.current_state())
    }

    pub fn current_state(&self) -> GameState {
        let result = match self.phase {
            Phase::GameOver(result) => Some(result),
            Phase::AwaitingMove(_) => None,
        };
        GameState {
            board: self.board,
            side_to_move: self.side_to_move(),
            mode: self.mode,
            black_count: self.board.count_pieces(Side::Black),
            white_count: self.board.count_pieces(Side::White),
            is_game_over: result.is_some(),
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
            last_move: self.last_move,
            result,
        }
    }

    fn awaiting_side(&self) -> Result<Side, MoveError> {
        match self.phase {
            Phase::AwaitingMove(side) => Ok(side),
            Phase::GameOver(_) => Err(MoveError::GameAlreadyOver),
        }
    }

    fn apply_move(&mut self, pos: Position, side: Side) -> Result<(), MoveError> {
        let flips = rules::apply_move(&mut self.board, pos, side)?;

        self.flipped = rules::mask_to_indices(flips);
        self.last_move = Some(pos);
        let (phase, is_pass) = resolve_phase(&self.board, side.opponent());
        self.phase = phase;
        self.is_pass = is_pass;

        debug!(
            %side,
            %pos,
            flipped = self.flipped.len(),
            black = self.board.count_pieces(Side::Black),
            white = self.board.count_pieces(Side::White),
            "move applied"
        );
        if let Phase::GameOver(result) = self.phase {
            info!(
                outcome = %result.outcome,
                black = result.black_count,
                white = result.white_count,
                "game over"
            );
        }

        Ok(())
    }
}

/// Phase entered when `next` is due to move, plus whether a side was skipped.
fn resolve_phase(board: &Board, next: Side) -> (Phase, bool) {
    if rules::has_any_legal_move(board, next) {
        (Phase::AwaitingMove(next), false)
    } else if rules::has_any_legal_move(board, next.opponent()) {
        (Phase::AwaitingMove(next.opponent()), true)
    } else {
        (Phase::GameOver(GameResult::from_board(board)), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IllegalMoveReason;
    use crate::types::Outcome;

    const FULL_BOARD: u64 = u64::MAX;

    struct FixedMoveSelector {
        mv: Option<Position>,
    }

    impl MoveSelector for FixedMoveSelector {
        fn select_move(&self, _board: &Board, _side: Side, _depth: u8) -> Option<SearchResult> {
            self.mv.map(|position| SearchResult { position, score: 0 })
        }
    }

    fn bit(row: usize, col: usize) -> u64 {
        1u64 << (row * 8 + col)
    }

    fn fixed(mode: GameMode, mv: Option<Position>, board: Board, to_move: Side) -> GameController {
        GameController::from_position(
            mode,
            &EngineConfig::default(),
            Box::new(FixedMoveSelector { mv }),
            board,
            to_move,
        )
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameController::new_game(GameMode::HumanVsAi);
        let state = game.current_state();

        assert_eq!(state.side_to_move, Some(Side::Black));
        assert_eq!(state.black_count, 2);
        assert_eq!(state.white_count, 2);
        assert!(!state.is_game_over);
        assert!(!state.is_pass);
        assert!(state.flipped.is_empty());
        assert_eq!(game.legal_moves(Side::Black).len(), 4);
    }

    #[test]
    fn modes_bind_players_per_side() {
        let ai = Player::Ai { depth: 3 };
        let game = GameController::new_game(GameMode::HumanVsAi);
        assert_eq!(game.player_for(Side::Black), Player::Human);
        assert_eq!(game.player_for(Side::White), ai);

        let game = GameController::new_game(GameMode::AiVsAi);
        assert_eq!(game.player_for(Side::Black), ai);
        assert_eq!(game.player_for(Side::White), ai);

        let game = GameController::new_game(GameMode::HumanVsHuman);
        assert_eq!(game.player_for(Side::Black), Player::Human);
        assert_eq!(game.player_for(Side::White), Player::Human);
    }

    #[test]
    fn human_move_alternates_turn() {
        let mut game = GameController::new_game(GameMode::HumanVsHuman);

        let state = game.submit_human_move(Position::new(2, 3)).unwrap();

        assert_eq!(state.side_to_move, Some(Side::White));
        assert_eq!(state.flipped, vec![27]);
        assert_eq!(state.last_move, Some(Position::new(2, 3)));
        assert_eq!((state.black_count, state.white_count), (4, 1));
    }

    #[test]
    fn illegal_human_move_returns_error_and_keeps_state() {
        let mut game = GameController::new_game(GameMode::HumanVsAi);
        let before = game.current_state();

        let err = game.submit_human_move(Position::new(0, 0)).unwrap_err();

        assert_eq!(
            err,
            MoveError::IllegalMove(Position::new(0, 0), IllegalMoveReason::NoFlips)
        );
        assert_eq!(game.current_state(), before);
    }

    #[test]
    fn human_move_on_ai_turn_is_rejected() {
        let mut game = GameController::new_game(GameMode::AiVsAi);

        let err = game.submit_human_move(Position::new(2, 3)).unwrap_err();

        assert_eq!(err, MoveError::NotHumanTurn(Side::Black));
        assert!(err.is_out_of_turn());
    }

    #[test]
    fn ai_move_on_human_turn_is_rejected() {
        let mut game = GameController::new_game(GameMode::HumanVsAi);

        let err = game.request_ai_move().unwrap_err();

        assert_eq!(err, MoveError::NotAiTurn(Side::Black));
        assert!(err.is_out_of_turn());
    }

    #[test]
    fn human_player_request_is_pending() {
        let game = GameController::new_game(GameMode::HumanVsHuman);

        assert_eq!(game.pending_move(), PlayerMove::Pending);
    }

    #[test]
    fn pass_keeps_mover_on_turn_when_opponent_is_stuck() {
        // White fills (0,0); Black then has no square left to play.
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black ^ bit(7, 7) ^ bit(7, 6);
        let board = Board::from_bitboards(black | bit(7, 6), white);
        let mut game = fixed(
            GameMode::AiVsAi,
            Some(Position::new(0, 0)),
            board,
            Side::White,
        );

        let state = game.request_ai_move().unwrap();

        assert!(!state.is_game_over);
        assert_eq!(state.side_to_move, Some(Side::White));
        assert!(state.is_pass);
    }

    #[test]
    fn stuck_side_is_skipped_at_start() {
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        let game = fixed(
            GameMode::HumanVsHuman,
            None,
            Board::from_bitboards(black, white),
            Side::Black,
        );

        assert_eq!(game.side_to_move(), Some(Side::White));
        assert!(game.current_state().is_pass);
    }

    #[test]
    fn both_sides_stuck_ends_game_immediately() {
        let black = FULL_BOARD ^ bit(0, 0);
        let game = fixed(
            GameMode::HumanVsHuman,
            None,
            Board::from_bitboards(black, 0),
            Side::Black,
        );

        let state = game.current_state();
        assert!(state.is_game_over);
        assert_eq!(state.side_to_move, None);
        assert_eq!(
            state.result,
            Some(GameResult {
                outcome: Outcome::Winner(Side::Black),
                black_count: 63,
                white_count: 0,
            })
        );
    }

    #[test]
    fn full_board_after_move_sets_game_over() {
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        let mut game = fixed(
            GameMode::AiVsAi,
            Some(Position::new(0, 0)),
            Board::from_bitboards(black, white),
            Side::White,
        );

        let state = game.request_ai_move().unwrap();

        assert!(state.is_game_over);
        assert_eq!(state.black_count, 0);
        assert_eq!(state.white_count, 64);
        assert_eq!(state.flipped, vec![1]);
        assert_eq!(
            state.result.map(|r| r.outcome),
            Some(Outcome::Winner(Side::White))
        );
    }

    #[test]
    fn moves_after_game_over_are_rejected() {
        let mut game = fixed(
            GameMode::HumanVsHuman,
            None,
            Board::from_bitboards(FULL_BOARD, 0),
            Side::Black,
        );

        assert_eq!(
            game.submit_human_move(Position::new(0, 0)),
            Err(MoveError::GameAlreadyOver)
        );
        assert_eq!(game.request_ai_move(), Err(MoveError::GameAlreadyOver));
    }

    #[test]
    fn illegal_selector_answer_is_reported() {
        let mut game = fixed(
            GameMode::AiVsAi,
            Some(Position::new(0, 0)),
            Board::new(),
            Side::Black,
        );
        let before = game.current_state();

        let err = game.request_ai_move().unwrap_err();

        assert!(err.is_illegal_move());
        assert_eq!(game.current_state(), before);
    }

    #[test]
    fn empty_selector_answer_is_reported() {
        let mut game = fixed(GameMode::AiVsAi, None, Board::new(), Side::Black);

        assert_eq!(
            game.request_ai_move(),
            Err(MoveError::NoMoveSelected(Side::Black))
        );
    }

    #[test]
    fn oversized_depth_is_capped_for_ai_players() {
        let game = GameController::with_config(
            GameMode::AiVsAi,
            &EngineConfig {
                search_depth: 200,
                ..EngineConfig::default()
            },
        );

        assert_eq!(
            game.player_for(Side::White),
            Player::Ai {
                depth: crate::ai::MAX_SEARCH_DEPTH
            }
        );
    }

    #[test]
    fn run_ai_turns_stops_at_human_turn() {
        let mut game = GameController::with_config(
            GameMode::HumanVsAi,
            &EngineConfig {
                search_depth: 1,
                ..EngineConfig::default()
            },
        );
        game.submit_human_move(Position::new(2, 3)).unwrap();

        let state = game.run_ai_turns().unwrap();

        assert_eq!(state.side_to_move, Some(Side::Black));
        assert_eq!(state.black_count + state.white_count, 6);
    }
}
