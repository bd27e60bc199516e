//! WASM bindings for othello-core
//!
//! `computeNextMove` keeps the host-call contract of the browser front end;
//! `WasmGame` exposes the game driver for a front end that keeps no rules of
//! its own.

use wasm_bindgen::prelude::*;

use crate::{encoding, Board, Game, Side, Square, Strategy};

/// Best move for `turn` (0 = First) as `"row col"`, `"-1 -1"` when stuck.
#[wasm_bindgen(js_name = computeNextMove)]
pub fn compute_next_move(encoded_board: &str, turn: i32) -> String {
    encoding::compute_next_move(encoded_board, turn).to_string()
}

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start position, First to move
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame { inner: Game::new() }
    }

    /// Resume from a 64-character board and a turn flag
    #[wasm_bindgen(js_name = fromEncoding)]
    pub fn from_encoding(encoded: &str, turn: i32) -> Result<WasmGame, JsError> {
        let board = Board::from_encoding(encoded)?;
        Ok(WasmGame {
            inner: Game::from_position(board, Side::from_turn_flag(turn)),
        })
    }

    /// 64-character board encoding
    pub fn encoding(&self) -> String {
        self.inner.board().to_encoding()
    }

    /// Side to move (0 = First, 1 = Second)
    pub fn turn(&self) -> i32 {
        self.inner.turn().turn_flag()
    }

    /// Legal moves for the side to move as `[[row, col], ...]`
    #[wasm_bindgen(js_name = legalMoves)]
    pub fn legal_moves(&self) -> Result<JsValue, JsError> {
        let moves: Vec<[u8; 2]> = self
            .inner
            .board()
            .legal_moves(self.inner.turn())
            .iter()
            .map(|sq| [sq.row(), sq.col()])
            .collect();
        Ok(serde_wasm_bindgen::to_value(&moves)?)
    }

    /// Apply a move. Returns true if successful.
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, row: i32, col: i32) -> bool {
        self.inner.play_at(row, col).is_ok()
    }

    /// Let the engine move. Returns `[row, col]`, or `[]` if nothing was played.
    #[wasm_bindgen(js_name = engineMove)]
    pub fn engine_move(&mut self) -> Vec<u8> {
        match self.inner.engine_move() {
            Ok(Some(square)) => vec![square.row(), square.col()],
            _ => vec![],
        }
    }

    /// Play the pick of a named strategy; same return shape as `engineMove`
    #[wasm_bindgen(js_name = strategyMove)]
    pub fn strategy_move(&mut self, strategy: &str) -> Result<Vec<u8>, JsError> {
        let strategy: Strategy = strategy.parse()?;
        Ok(match self.inner.strategy_move(strategy) {
            Ok(Some(square)) => vec![square.row(), square.col()],
            _ => vec![],
        })
    }

    /// Disc count for a side (0 = First, 1 = Second)
    #[wasm_bindgen(js_name = pieceCount)]
    pub fn piece_count(&self, side: i32) -> u32 {
        self.inner.board().piece_count(Side::from_turn_flag(side))
    }

    /// Owner at (row, col): 0 (empty), 1 (First), 2 (Second)
    pub fn cell(&self, row: i32, col: i32) -> u8 {
        match Square::new(row, col).and_then(|sq| self.inner.board().owner(sq)) {
            None => 0,
            Some(Side::First) => 1,
            Some(Side::Second) => 2,
        }
    }

    /// Evaluation from Second's point of view
    pub fn evaluation(&self) -> i32 {
        self.inner.evaluation()
    }

    /// Check if game is over (neither side can move)
    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_over()
    }

    /// Get game result: "ongoing", "first_wins", "second_wins", or "draw"
    pub fn result(&self) -> String {
        self.inner.outcome().as_str().to_string()
    }

    /// Clone the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame { inner: self.inner }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
