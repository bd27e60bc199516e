//! Text encoding used at the host boundary.
//!
//! # Board (64 characters, row-major)
//!
//! ```text
//! 'b' = First disc, 'w' = Second disc, anything else = empty
//! index = 8 * row + col
//! ```
//!
//! # Reply
//!
//! ```text
//! "<row> <col>"   e.g. "2 3"
//! "-1 -1"         no legal move
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{search, Board, Side, Square};

/// Characters in an encoded board.
pub const ENCODED_LEN: usize = 64;

/// Malformed boundary input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("board encoding must be {expected} characters, found {found}")]
    Length { expected: usize, found: usize },

    #[error("invalid move reply {0:?}: expected \"<row> <col>\"")]
    Reply(String),
}

impl Side {
    /// Turn flag at the host boundary: 0 is First, anything else Second.
    #[inline]
    pub fn from_turn_flag(flag: i32) -> Side {
        if flag == 0 {
            Side::First
        } else {
            Side::Second
        }
    }

    /// Inverse of [`Side::from_turn_flag`].
    #[inline]
    pub fn turn_flag(self) -> i32 {
        self as i32
    }

    /// Character for this side's discs.
    #[inline]
    pub fn to_char(self) -> char {
        match self {
            Side::First => 'b',
            Side::Second => 'w',
        }
    }
}

impl Board {
    /// Decode a 64-character board, rejecting any other length.
    pub fn from_encoding(encoded: &str) -> Result<Board, EncodingError> {
        let found = encoded.chars().count();
        if found != ENCODED_LEN {
            return Err(EncodingError::Length {
                expected: ENCODED_LEN,
                found,
            });
        }
        Ok(Board::decode_lossy(encoded))
    }

    /// Decode without validation: reads at most 64 characters and leaves
    /// missing squares empty.
    pub fn decode_lossy(encoded: &str) -> Board {
        let mut first = 0u64;
        let mut second = 0u64;
        for (i, c) in encoded.chars().take(ENCODED_LEN).enumerate() {
            match c {
                'b' => first |= 1 << i,
                'w' => second |= 1 << i,
                _ => {}
            }
        }
        Board { first, second }
    }

    /// Encode as 64 characters, `'e'` for empty squares.
    pub fn to_encoding(&self) -> String {
        Square::all()
            .map(|square| self.owner(square).map_or('e', Side::to_char))
            .collect()
    }
}

/// Move reply as exchanged with the host: (-1, -1) means no move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReply {
    pub row: i8,
    pub col: i8,
}

impl MoveReply {
    /// The "no legal move" reply.
    pub const NONE: MoveReply = MoveReply { row: -1, col: -1 };

    /// The square this reply names, if it is in range.
    pub fn square(self) -> Option<Square> {
        Square::new(self.row as i32, self.col as i32)
    }
}

impl From<Option<Square>> for MoveReply {
    fn from(square: Option<Square>) -> Self {
        match square {
            Some(sq) => MoveReply {
                row: sq.row() as i8,
                col: sq.col() as i8,
            },
            None => MoveReply::NONE,
        }
    }
}

impl fmt::Display for MoveReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}

impl FromStr for MoveReply {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EncodingError::Reply(s.to_string());
        let mut parts = s.split_whitespace();
        let row = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        let col = parts.next().ok_or_else(invalid)?.parse().map_err(|_| invalid())?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(MoveReply { row, col })
    }
}

/// Host entry point: decode the board, search for `turn`, encode the reply.
pub fn compute_next_move(encoded: &str, turn: i32) -> MoveReply {
    let board = Board::decode_lossy(encoded);
    let side = Side::from_turn_flag(turn);
    MoveReply::from(search::best_move(&board, side))
}
