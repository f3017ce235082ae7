/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use thiserror::Error;

#[cfg(feature = "validate-castling-rights")]
use crate::CastlingRight;
use crate::Rank;

/// The six whitespace-separated fields of a FEN string, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FenField {
    Placement,
    SideToMove,
    Castling,
    EnPassant,
    Halfmove,
    Fullmove,
}

impl fmt::Display for FenField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Placement => "piece placement",
            Self::SideToMove => "side to move",
            Self::Castling => "castling rights",
            Self::EnPassant => "en passant target",
            Self::Halfmove => "halfmove clock",
            Self::Fullmove => "fullmove number",
        };
        write!(f, "{name}")
    }
}

/// Errors that can occur when parsing a FEN string.
///
/// Parsing stops at the first invalid field, so exactly one of these is ever reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenParseError {
    /// No text was supplied.
    #[error("empty FEN string")]
    EmptyInput,

    /// The input did not contain exactly six whitespace-separated fields.
    #[error("FEN must have 6 fields separated by whitespace, found {found}")]
    FieldCountError { found: usize },

    /// The piece placement field did not contain exactly eight ranks.
    #[error("piece placement must have 8 ranks separated by '/', found {found}")]
    RowCountError { found: usize },

    /// A rank contained a character that is neither an empty-square count nor a piece letter.
    #[error("invalid piece {piece:?} on rank {rank}")]
    InvalidPiece { piece: char, rank: Rank },

    /// A rank described more than eight squares.
    #[error("rank {rank} exceeds 8 columns")]
    RowOverflow { rank: Rank },

    /// A rank described fewer than eight squares.
    #[error("rank {rank} has {columns} columns, expected 8")]
    RowIncomplete { rank: Rank, columns: usize },

    /// The side to move was not exactly `w` or `b`.
    #[error("side to move must be 'w' or 'b', found {side:?}")]
    InvalidSideToMove { side: String },

    /// The castling field contained a character outside of `KQkq`.
    #[error("invalid castling character {ch:?}")]
    InvalidCastlingChar { ch: char },

    /// The castling field contained the same right twice.
    #[error("repeated castling character {ch:?}")]
    DuplicateCastlingChar { ch: char },

    /// A castling right was claimed without the king and rook on their home squares.
    #[cfg(feature = "validate-castling-rights")]
    #[error("castling right {right} requires the king and rook on their home squares")]
    CastlingWithoutPieces { right: CastlingRight },

    /// The en passant field was neither `-` nor a two-character square.
    #[error("en passant target must be '-' or a square like 'e3' or 'c6', found {target:?}")]
    InvalidEnPassantFormat { target: String },

    /// The en passant square had a file outside of `a-h`.
    #[error("invalid en passant file {file:?}")]
    InvalidFile { file: char },

    /// The en passant square was not on rank 3 or 6.
    #[error("invalid en passant rank {rank:?}, expected '3' or '6'")]
    InvalidRank { rank: char },

    /// The halfmove clock was not an integer `>= 0`.
    #[error("halfmove clock must be a non-negative integer, found {value:?}")]
    InvalidHalfmove { value: String },

    /// The fullmove number was not an integer `>= 1`.
    #[error("fullmove number must be a positive integer, found {value:?}")]
    InvalidFullmove { value: String },
}

impl FenParseError {
    /// The FEN field that caused this error.
    ///
    /// Returns `None` for errors about the string as a whole, such as [`FenParseError::EmptyInput`].
    pub const fn field(&self) -> Option<FenField> {
        use FenParseError::*;
        match self {
            EmptyInput | FieldCountError { .. } => None,

            RowCountError { .. }
            | InvalidPiece { .. }
            | RowOverflow { .. }
            | RowIncomplete { .. } => Some(FenField::Placement),

            InvalidSideToMove { .. } => Some(FenField::SideToMove),

            InvalidCastlingChar { .. } | DuplicateCastlingChar { .. } => Some(FenField::Castling),
            #[cfg(feature = "validate-castling-rights")]
            CastlingWithoutPieces { .. } => Some(FenField::Castling),

            InvalidEnPassantFormat { .. } | InvalidFile { .. } | InvalidRank { .. } => {
                Some(FenField::EnPassant)
            }

            InvalidHalfmove { .. } => Some(FenField::Halfmove),

            InvalidFullmove { .. } => Some(FenField::Fullmove),
        }
    }
}

/// Errors that can occur when loading a board from an arbitrary grid of cells.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// The grid did not have exactly eight rows.
    #[error("chessboard must have 8 rows, found {found}")]
    RowCount { found: usize },

    /// A row of the grid did not have exactly eight cells.
    #[error("chessboard row {row} must have 8 cells, found {found}")]
    RowLength { row: usize, found: usize },
}
