//! Othello move engine with a two-mask bitboard representation.
//!
//! # Board Encoding (2 × 64-bit)
//!
//! ```text
//! One u64 occupancy mask per side. Square (row, col) is bit 8 * row + col:
//!
//!        0  1  2  3  4  5  6  7    <- col
//!   0   00 01 02 03 04 05 06 07
//!   1   08 09 10 11 12 13 14 15
//!   2   16 17 18 19 20 21 22 23
//!   3   24 25 26 27 28 29 30 31
//!   4   32 33 34 35 36 37 38 39
//!   5   40 41 42 43 44 45 46 47
//!   6   48 49 50 51 52 53 54 55
//!   7   56 57 58 59 60 61 62 63
//!
//! The two masks never share a bit.
//! ```
//!
//! # Sides
//!
//! ```text
//! First  = black, 'b' in the text encoding, turn flag 0
//! Second = white, 'w' in the text encoding, any other turn flag
//! ```
//!
//! Evaluations are always from Second's point of view: Second maximizes,
//! First minimizes.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod encoding;
pub mod game;
pub mod search;
pub mod strategy;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use analysis::MoveList;
pub use encoding::{compute_next_move, EncodingError, MoveReply};
pub use game::{Game, GameError, Outcome};
pub use search::{best_move, SearchResult, SearchStats, Searcher, MAX_DEPTH};
pub use strategy::{Strategy, UnknownStrategy};

/// One of the two players.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Side {
    First = 0,
    Second = 1,
}

impl Side {
    /// Get the other side.
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Both sides, First then Second.
    pub fn all() -> [Side; 2] {
        [Side::First, Side::Second]
    }
}

/// A square on the 8x8 board (bit index 0-63).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Create a square from row and column (0-7 each).
    #[inline]
    pub const fn from_row_col(row: u8, col: u8) -> Square {
        debug_assert!(row < 8 && col < 8);
        Square(row * 8 + col)
    }

    /// Range-checked constructor for untrusted coordinates.
    #[inline]
    pub fn new(row: i32, col: i32) -> Option<Square> {
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::from_row_col(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Create a square from its bit index.
    #[inline]
    pub fn from_index(index: u8) -> Option<Square> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Bit index (0-63).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Get the row (0-7).
    #[inline]
    pub const fn row(self) -> u8 {
        self.0 / 8
    }

    /// Get the column (0-7).
    #[inline]
    pub const fn col(self) -> u8 {
        self.0 % 8
    }

    /// Single-bit mask for this square.
    #[inline]
    pub const fn bit(self) -> u64 {
        1u64 << self.0
    }

    /// Step one square along (drow, dcol), or None when leaving the board.
    #[inline]
    pub fn offset(self, drow: i8, dcol: i8) -> Option<Square> {
        Square::new(self.row() as i32 + drow as i32, self.col() as i32 + dcol as i32)
    }

    /// Iterate over all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row(), self.col())
    }
}

/// Rejected board construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("occupancy masks overlap on {0:#018x}")]
    Overlap(u64),
}

/// Board position: one occupancy mask per side.
///
/// Boards are values. Every transition builds a new `Board`; nothing is
/// mutated after construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Board {
    first: u64,
    second: u64,
}

/// Compass offsets (drow, dcol): NW, N, NE, E, SE, S, SW, W.
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

#[inline]
fn set(mask: &mut u64, square: Square) {
    *mask |= square.bit();
}

#[inline]
fn unset(mask: &mut u64, square: Square) {
    *mask &= !square.bit();
}

impl Board {
    /// A board with no discs.
    #[inline]
    pub const fn empty() -> Board {
        Board { first: 0, second: 0 }
    }

    /// Standard start: First on (3,4) and (4,3), Second on (3,3) and (4,4).
    pub const fn initial() -> Board {
        Board {
            first: Square::from_row_col(3, 4).bit() | Square::from_row_col(4, 3).bit(),
            second: Square::from_row_col(3, 3).bit() | Square::from_row_col(4, 4).bit(),
        }
    }

    /// Build a board from the two occupancy masks.
    pub fn from_masks(first: u64, second: u64) -> Result<Board, BoardError> {
        let overlap = first & second;
        if overlap != 0 {
            return Err(BoardError::Overlap(overlap));
        }
        Ok(Board { first, second })
    }

    /// Occupancy mask for a side.
    #[inline]
    pub const fn mask(&self, side: Side) -> u64 {
        match side {
            Side::First => self.first,
            Side::Second => self.second,
        }
    }

    /// Both masks as (first, second).
    #[inline]
    pub const fn masks(&self) -> (u64, u64) {
        (self.first, self.second)
    }

    /// Check whether `side` has a disc on `square`.
    #[inline]
    pub fn occupied_by(&self, side: Side, square: Square) -> bool {
        self.mask(side) & square.bit() != 0
    }

    /// Owner of the disc on `square`, if any.
    #[inline]
    pub fn owner(&self, square: Square) -> Option<Side> {
        if self.occupied_by(Side::First, square) {
            Some(Side::First)
        } else if self.occupied_by(Side::Second, square) {
            Some(Side::Second)
        } else {
            None
        }
    }

    /// Check if a square is empty.
    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        (self.first | self.second) & square.bit() == 0
    }

    /// Number of discs owned by `side`.
    #[inline]
    pub fn piece_count(&self, side: Side) -> u32 {
        self.mask(side).count_ones()
    }

    /// Number of empty squares.
    #[inline]
    pub fn empty_count(&self) -> u32 {
        (self.first | self.second).count_zeros()
    }

    #[inline]
    fn with_masks(side: Side, own: u64, opp: u64) -> Board {
        match side {
            Side::First => Board { first: own, second: opp },
            Side::Second => Board { first: opp, second: own },
        }
    }

    // ========== Move Engine ==========

    /// Place a disc for `side` on `square` and flip every bracketed run.
    ///
    /// Returns None when the square is occupied or no direction flips a disc.
    /// All eight directions are resolved into scratch masks before anything
    /// is returned, so an illegal move has no partial effect.
    pub fn apply_move(&self, side: Side, square: Square) -> Option<Board> {
        if !self.is_empty(square) {
            return None;
        }

        let own = self.mask(side);
        let opp = self.mask(side.opposite());
        let mut next_own = own;
        let mut next_opp = opp;

        for &(drow, dcol) in &DIRECTIONS {
            // Walk over the opponent run
            let mut cursor = square.offset(drow, dcol);
            let mut crossed = false;
            while let Some(sq) = cursor {
                if opp & sq.bit() == 0 {
                    break;
                }
                crossed = true;
                cursor = sq.offset(drow, dcol);
            }

            let end = match cursor {
                Some(end) if crossed && own & end.bit() != 0 => end,
                _ => continue,
            };

            // Walk back from the bracketing disc, converting the run
            let mut back = end.offset(-drow, -dcol);
            while let Some(sq) = back {
                if opp & sq.bit() == 0 {
                    break;
                }
                set(&mut next_own, sq);
                unset(&mut next_opp, sq);
                back = sq.offset(-drow, -dcol);
            }
            set(&mut next_own, square);
        }

        if next_own == own && next_opp == opp {
            return None;
        }
        Some(Board::with_masks(side, next_own, next_opp))
    }

    /// Apply a move given untrusted coordinates.
    ///
    /// Out-of-range coordinates are illegal, checked before occupancy.
    pub fn play(&self, side: Side, row: i32, col: i32) -> Option<Board> {
        let square = Square::new(row, col)?;
        self.apply_move(side, square)
    }

    /// Check if `side` may play on `square`.
    #[inline]
    pub fn is_legal(&self, side: Side, square: Square) -> bool {
        self.apply_move(side, square).is_some()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  0 1 2 3 4 5 6 7")?;
        for row in 0..8u8 {
            write!(f, "{}", row)?;
            for col in 0..8u8 {
                let c = match self.owner(Square::from_row_col(row, col)) {
                    Some(Side::First) => 'B',
                    Some(Side::Second) => 'W',
                    None => '.',
                };
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
