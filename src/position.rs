/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{num::NonZeroU32, str::FromStr};

use crate::{parse_fen, Board, CastlingRights, Color, FenParseError, Square};

/// A fully validated FEN position.
///
/// A [`Position`] only exists if all six fields of its FEN were valid, and it is never
/// modified after construction.
///
/// # Validation
///
/// Validation is limited to the syntax of each field and simple per-field constraints.
/// No field is checked against another, so a position may claim castling rights for
/// a king that is not on the board, or have two kings of the same color.
/// The `validate-castling-rights` feature adds a check of castling rights against the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: NonZeroU32,
}

impl Position {
    /// Attempt to parse `input` as a FEN string into a [`Position`].
    ///
    /// See also [`parse_fen`].
    #[inline(always)]
    pub fn new(input: &str) -> Result<Self, FenParseError> {
        parse_fen(input)
    }

    /// The piece placement, with row 0 holding rank 8.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The side whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// All four castling rights.
    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    /// Whether White may castle kingside (`K`).
    pub const fn white_kingside(&self) -> bool {
        self.castling.white_kingside()
    }

    /// Whether White may castle queenside (`Q`).
    pub const fn white_queenside(&self) -> bool {
        self.castling.white_queenside()
    }

    /// Whether Black may castle kingside (`k`).
    pub const fn black_kingside(&self) -> bool {
        self.castling.black_kingside()
    }

    /// Whether Black may castle queenside (`q`).
    pub const fn black_queenside(&self) -> bool {
        self.castling.black_queenside()
    }

    /// The en passant target square, always on rank 3 or 6 if present.
    #[inline(always)]
    pub const fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Number of halfmoves since the last capture or pawn advance.
    #[inline(always)]
    pub const fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// The current fullmove number, starting at 1.
    #[inline(always)]
    pub const fn fullmove_number(&self) -> u32 {
        self.fullmove_number.get()
    }
}

impl FromStr for Position {
    type Err = FenParseError;
    /// Alias for [`Position::new`].
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<Option<&str>> for Position {
    type Error = FenParseError;
    /// Parses `input` if present, failing with [`FenParseError::EmptyInput`] if it is `None`.
    fn try_from(input: Option<&str>) -> Result<Self, Self::Error> {
        input.map_or(Err(FenParseError::EmptyInput), Self::new)
    }
}
