//! Turn bookkeeping on top of the engine: who moves next, passes, and the
//! final result.

use crate::{Board, Side, Square, Strategy};

/// Rejected game action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("illegal move at ({row},{col})")]
    IllegalMove { row: i32, col: i32 },

    #[error("game is already over")]
    GameOver,
}

/// Result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    FirstWins,
    SecondWins,
    Draw,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Ongoing => "ongoing",
            Outcome::FirstWins => "first_wins",
            Outcome::SecondWins => "second_wins",
            Outcome::Draw => "draw",
        }
    }
}

/// A game in progress: a board and the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    turn: Side,
}

impl Game {
    /// Start position, First to move.
    pub fn new() -> Game {
        Game {
            board: Board::initial(),
            turn: Side::First,
        }
    }

    /// Resume from an arbitrary position.
    pub fn from_position(board: Board, turn: Side) -> Game {
        Game { board, turn }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    /// Play `square` for the side to move.
    ///
    /// Afterwards the opponent moves if it can, otherwise the mover goes
    /// again. Returns the side that had to pass, if any.
    pub fn play(&mut self, square: Square) -> Result<Option<Side>, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let next = self
            .board
            .apply_move(self.turn, square)
            .ok_or(GameError::IllegalMove {
                row: square.row() as i32,
                col: square.col() as i32,
            })?;

        self.board = next;
        let opponent = self.turn.opposite();
        if next.count_legal_moves(opponent) > 0 {
            self.turn = opponent;
            Ok(None)
        } else {
            Ok(Some(opponent))
        }
    }

    /// Play untrusted coordinates for the side to move.
    pub fn play_at(&mut self, row: i32, col: i32) -> Result<Option<Side>, GameError> {
        let square = Square::new(row, col).ok_or(GameError::IllegalMove { row, col })?;
        self.play(square)
    }

    /// Let the search choose and play for the side to move.
    ///
    /// Returns the square played, or None when the search picked nothing:
    /// either the side to move is stuck or no reply beat the search bound.
    pub fn engine_move(&mut self) -> Result<Option<Square>, GameError> {
        self.strategy_move(Strategy::Minimax)
    }

    /// Play the square `strategy` picks for the side to move.
    pub fn strategy_move(&mut self, strategy: Strategy) -> Result<Option<Square>, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        match strategy.choose(&self.board, self.turn) {
            Some(square) => {
                self.play(square)?;
                Ok(Some(square))
            }
            None => Ok(None),
        }
    }

    pub fn is_over(&self) -> bool {
        self.board.is_terminal()
    }

    /// Disc counts as (first, second).
    pub fn counts(&self) -> (u32, u32) {
        (
            self.board.piece_count(Side::First),
            self.board.piece_count(Side::Second),
        )
    }

    pub fn outcome(&self) -> Outcome {
        if !self.is_over() {
            return Outcome::Ongoing;
        }
        let (first, second) = self.counts();
        if first > second {
            Outcome::FirstWins
        } else if second > first {
            Outcome::SecondWins
        } else {
            Outcome::Draw
        }
    }

    /// Winner of a finished game; None while ongoing or on a draw.
    pub fn winner(&self) -> Option<Side> {
        match self.outcome() {
            Outcome::FirstWins => Some(Side::First),
            Outcome::SecondWins => Some(Side::Second),
            Outcome::Ongoing | Outcome::Draw => None,
        }
    }

    pub fn evaluation(&self) -> i32 {
        self.board.evaluate()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::from_row_col(row, col)
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.turn(), Side::First);
        assert_eq!(game.counts(), (2, 2));
        assert_eq!(game.outcome(), Outcome::Ongoing);
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_play_alternates() {
        let mut game = Game::new();
        assert_eq!(game.play(sq(2, 3)), Ok(None));
        assert_eq!(game.turn(), Side::Second);
        assert_eq!(game.counts(), (4, 1));
    }

    #[test]
    fn test_illegal_move_keeps_state() {
        let mut game = Game::new();
        assert_eq!(
            game.play(sq(0, 0)),
            Err(GameError::IllegalMove { row: 0, col: 0 })
        );
        assert_eq!(game, Game::new());
        assert_eq!(
            game.play_at(9, 0),
            Err(GameError::IllegalMove { row: 9, col: 0 })
        );
    }

    #[test]
    fn test_pass_keeps_turn() {
        // Second plays (0,2); First is left stuck while Second can still play (7,2)
        let first = sq(0, 1).bit() | sq(7, 1).bit();
        let second = sq(0, 0).bit() | sq(7, 0).bit();
        let board = Board::from_masks(first, second).unwrap();
        let mut game = Game::from_position(board, Side::Second);

        assert_eq!(game.play(sq(0, 2)), Ok(Some(Side::First)));
        assert_eq!(game.turn(), Side::Second);
        assert!(!game.is_over());

        assert_eq!(game.play(sq(7, 2)), Ok(Some(Side::First)));
        assert!(game.is_over());
        assert_eq!(game.outcome(), Outcome::SecondWins);
        assert_eq!(game.winner(), Some(Side::Second));
        assert_eq!(game.play(sq(5, 5)), Err(GameError::GameOver));
    }

    #[test]
    fn test_engine_move_on_finished_game() {
        let board = Board::from_masks(0x0000_0000_FFFF_FFFF, 0xFFFF_FFFF_0000_0000).unwrap();
        let mut game = Game::from_position(board, Side::First);
        assert_eq!(game.outcome(), Outcome::Draw);
        assert_eq!(game.engine_move(), Err(GameError::GameOver));
    }

    #[test]
    fn test_engine_move_plays_search_choice() {
        let mut game = Game::new();
        assert_eq!(game.engine_move(), Ok(Some(sq(2, 3))));
        assert_eq!(game.turn(), Side::Second);
    }

    #[test]
    fn test_engine_move_without_pick_keeps_state() {
        // Second has two legal moves but neither beats the search bound
        let board = Board::from_encoding(
            "ewwwwwbwwewwwebwbbwwbbbwbbwbwwbbbbwwwwbbbbwwbwbebbwwwwwbbewwewww",
        )
        .unwrap();
        let mut game = Game::from_position(board, Side::Second);
        assert_eq!(board.count_legal_moves(Side::Second), 2);

        assert_eq!(game.engine_move(), Ok(None));
        assert_eq!(game, Game::from_position(board, Side::Second));

        // A greedy player still finds a move here
        assert_eq!(
            game.strategy_move(Strategy::MinimizeOpponentMobility),
            Ok(Some(sq(1, 5)))
        );
        assert_eq!(game.board().empty_count() + 1, board.empty_count());
    }

    #[test]
    fn test_strategy_move_alternates() {
        let mut game = Game::new();
        assert_eq!(game.strategy_move(Strategy::MobilityDifference), Ok(Some(sq(2, 3))));
        assert_eq!(game.strategy_move(Strategy::MobilityDifference), Ok(Some(sq(2, 2))));
        assert_eq!(game.turn(), Side::First);
    }

    #[test]
    fn test_outcome_strings() {
        assert_eq!(Outcome::Ongoing.as_str(), "ongoing");
        assert_eq!(Outcome::Draw.as_str(), "draw");
    }
}
