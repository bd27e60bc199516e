//! Move-selection strategies.
//!
//! Besides the minimax search there are two one-ply greedy players that only
//! look at mobility after their own move. All of them scan squares in
//! row-major order and replace the current pick only on a strictly better
//! score.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{search, Board, Side, Square};

/// How a side picks its move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Fixed-depth minimax over the positional evaluation.
    #[default]
    Minimax,
    /// Maximize own mobility minus the opponent's after the move.
    MobilityDifference,
    /// Minimize the opponent's mobility after the move.
    MinimizeOpponentMobility,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown strategy {0:?} (expected minimax, mobility-difference or minimize-opponent-mobility)")]
pub struct UnknownStrategy(pub String);

impl Strategy {
    pub const ALL: [Strategy; 3] = [
        Strategy::Minimax,
        Strategy::MobilityDifference,
        Strategy::MinimizeOpponentMobility,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Minimax => "minimax",
            Strategy::MobilityDifference => "mobility-difference",
            Strategy::MinimizeOpponentMobility => "minimize-opponent-mobility",
        }
    }

    /// Square this strategy plays for `side`, or None if it finds nothing.
    pub fn choose(self, board: &Board, side: Side) -> Option<Square> {
        match self {
            Strategy::Minimax => search::best_move(board, side),
            Strategy::MobilityDifference => mobility_difference(board, side),
            Strategy::MinimizeOpponentMobility => minimize_opponent_mobility(board, side),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

/// Best legal square by `score(own_mobility, opponent_mobility)` measured on
/// the board after the move. Earliest square wins ties.
fn greedy(board: &Board, side: Side, score: impl Fn(i32, i32) -> i32) -> Option<Square> {
    let mut best: Option<(i32, Square)> = None;

    for square in board.legal_moves(side).iter() {
        let next = match board.apply_move(side, square) {
            Some(next) => next,
            None => continue,
        };
        let value = score(
            next.count_legal_moves(side) as i32,
            next.count_legal_moves(side.opposite()) as i32,
        );
        if best.map_or(true, |(best_value, _)| value > best_value) {
            best = Some((value, square));
        }
    }

    best.map(|(_, square)| square)
}

/// One-ply pick maximizing own mobility minus the opponent's.
pub fn mobility_difference(board: &Board, side: Side) -> Option<Square> {
    greedy(board, side, |own, opponent| own - opponent)
}

/// One-ply pick leaving the opponent the fewest moves.
pub fn minimize_opponent_mobility(board: &Board, side: Side) -> Option<Square> {
    greedy(board, side, |_, opponent| -opponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::from_row_col(row, col)
    }

    /// Second to move with five replies. After each, (Second, First) mobility:
    /// (0,2) 4/4, (2,0) 4/6, (2,4) 7/8, (3,1) 5/8, (4,2) 9/7.
    fn midgame() -> Board {
        Board::from_encoding("wbeeeeeeeweeeeeeebwbeeeeeebbbeeeeeebweeeeeeeeeeeeeeeeeeeeeeeeeee").unwrap()
    }

    #[test]
    fn test_mobility_difference_takes_strict_best() {
        // Differences 0, -2, -1, -3, +2: the last square wins
        assert_eq!(mobility_difference(&midgame(), Side::Second), Some(sq(4, 2)));
    }

    #[test]
    fn test_minimize_opponent_mobility() {
        // First is left with 4, 6, 8, 8, 7 moves
        assert_eq!(minimize_opponent_mobility(&midgame(), Side::Second), Some(sq(0, 2)));
    }

    #[test]
    fn test_greedy_ties_go_to_earliest_square() {
        // Every opening reply leaves 3 moves to each side
        let board = Board::initial();
        assert_eq!(mobility_difference(&board, Side::First), Some(sq(2, 3)));
        assert_eq!(minimize_opponent_mobility(&board, Side::First), Some(sq(2, 3)));
        assert_eq!(mobility_difference(&board, Side::Second), Some(sq(2, 4)));
        assert_eq!(minimize_opponent_mobility(&board, Side::Second), Some(sq(2, 4)));
    }

    #[test]
    fn test_greedy_without_legal_move() {
        let board = Board::from_masks(sq(0, 1).bit(), sq(0, 0).bit()).unwrap();
        assert_eq!(mobility_difference(&board, Side::First), None);
        assert_eq!(minimize_opponent_mobility(&board, Side::First), None);
        assert_eq!(minimize_opponent_mobility(&board, Side::Second), Some(sq(0, 2)));
    }

    #[test]
    fn test_choose_dispatches() {
        let board = midgame();
        assert_eq!(
            Strategy::MobilityDifference.choose(&board, Side::Second),
            Some(sq(4, 2))
        );
        assert_eq!(
            Strategy::MinimizeOpponentMobility.choose(&board, Side::Second),
            Some(sq(0, 2))
        );
        assert_eq!(
            Strategy::Minimax.choose(&board, Side::Second),
            search::best_move(&board, Side::Second)
        );
    }

    #[test]
    fn test_parse_names() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.as_str().parse(), Ok(strategy));
            assert_eq!(strategy.to_string(), strategy.as_str());
        }
        assert_eq!(
            "greedy".parse::<Strategy>(),
            Err(UnknownStrategy("greedy".to_string()))
        );
        assert_eq!(Strategy::default(), Strategy::Minimax);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Strategy::MinimizeOpponentMobility).unwrap();
        assert_eq!(json, "\"minimize-opponent-mobility\"");
        let parsed: Strategy = serde_json::from_str("\"mobility-difference\"").unwrap();
        assert_eq!(parsed, Strategy::MobilityDifference);
    }
}
