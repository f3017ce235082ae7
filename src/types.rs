/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use nom::{
    branch::alt,
    character::complete::{anychar, char, one_of},
    combinator::{all_consuming, map, map_opt, value},
    sequence::pair,
    IResult,
};

/// The two sides of a chess game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl FromStr for Color {
    type Err = String;
    /// Attempts to construct a [`Color`] from exactly `w` or `b`.
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(color)(s)
            .map(|x| x.1)
            .map_err(|e| e.to_string())
    }
}

impl fmt::Display for Color {
    /// Formats this color in FEN notation of `[wb]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "w"),
            Self::Black => write!(f, "b"),
        }
    }
}

/// The six kinds of chess pieces, independent of color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Role {
    /// The uppercase (white) FEN letter of this role.
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

/// A colored chess piece, as it appears in the piece placement field of a FEN.
///
/// Uppercase letters are white pieces and lowercase letters are black pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Piece {
    pub color: Color,
    pub role: Role,
}

impl Piece {
    /// Creates a new [`Piece`] of the given color and role.
    pub const fn new(color: Color, role: Role) -> Self {
        Self { color, role }
    }

    /// Maps one of `PNBRQKpnbrqk` to a [`Piece`], returning `None` for anything else.
    pub const fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let role = match c.to_ascii_lowercase() {
            'p' => Role::Pawn,
            'n' => Role::Knight,
            'b' => Role::Bishop,
            'r' => Role::Rook,
            'q' => Role::Queen,
            'k' => Role::King,
            _ => return None,
        };

        Some(Self { color, role })
    }

    /// The FEN letter of this piece.
    pub const fn char(&self) -> char {
        match self.color {
            Color::White => self.role.char(),
            Color::Black => self.role.char().to_ascii_lowercase(),
        }
    }
}

impl FromStr for Piece {
    type Err = String;
    /// Attempts to construct a [`Piece`] from a single case-sensitive FEN letter.
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(piece)(s)
            .map(|x| x.1)
            .map_err(|e| e.to_string())
    }
}

impl fmt::Display for Piece {
    /// Formats this piece as its FEN letter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// The eight files/columns on a chessboard.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum File {
    #[default]
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    /// All files, from `a` to `h`.
    pub const ALL: [Self; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// Column of this file within a board row, where `a` is column 0.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl FromStr for File {
    type Err = String;
    /// Attempts to construct a [`File`] from a lowercase letter between `a` and `h`.
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(file)(s)
            .map(|x| x.1)
            .map_err(|e| e.to_string())
    }
}

impl fmt::Display for File {
    /// Formats this file in FEN notation of `[a-h]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (*self as u8 + b'a') as char)
    }
}

/// The eight ranks/rows on a chessboard.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    #[default]
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Rank {
    /// All ranks, from `1` to `8`.
    pub const ALL: [Self; 8] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// The rank displayed on board row `row`, where row 0 is rank 8.
    ///
    /// Returns `None` if `row` is not between 0 and 7.
    #[inline(always)]
    pub const fn from_row(row: usize) -> Option<Self> {
        if row < 8 {
            Some(Self::ALL[7 - row])
        } else {
            None
        }
    }

    /// Board row of this rank, where rank 8 is row 0.
    #[inline(always)]
    pub const fn row(&self) -> usize {
        7 - *self as usize
    }
}

impl FromStr for Rank {
    type Err = String;
    /// Attempts to construct a [`Rank`] from a digit between `1` and `8`.
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(rank)(s)
            .map(|x| x.1)
            .map_err(|e| e.to_string())
    }
}

impl fmt::Display for Rank {
    /// Formats this rank in FEN notation of `[1-8]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (*self as u8 + b'1') as char)
    }
}

/// One of the 64 squares on a chessboard.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(pub File, pub Rank);

impl Square {
    #[inline(always)]
    pub const fn file(&self) -> File {
        self.0
    }

    #[inline(always)]
    pub const fn rank(&self) -> Rank {
        self.1
    }
}

impl FromStr for Square {
    type Err = String;
    /// Attempts to construct a [`Square`] from a string in `<file><rank>` notation.
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(square)(s)
            .map(|x| x.1)
            .map_err(|e| e.to_string())
    }
}

impl fmt::Display for Square {
    /// Formats this square in notation of `<file><rank>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}

/// A single castling right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CastlingRight {
    WhiteKingside,
    WhiteQueenside,
    BlackKingside,
    BlackQueenside,
}

impl CastlingRight {
    /// All castling rights, in the conventional `KQkq` order.
    pub const ALL: [Self; 4] = [
        Self::WhiteKingside,
        Self::WhiteQueenside,
        Self::BlackKingside,
        Self::BlackQueenside,
    ];

    /// Maps one of `KQkq` to a [`CastlingRight`].
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'K' => Some(Self::WhiteKingside),
            'Q' => Some(Self::WhiteQueenside),
            'k' => Some(Self::BlackKingside),
            'q' => Some(Self::BlackQueenside),
            _ => None,
        }
    }

    /// The FEN letter of this right.
    pub const fn char(&self) -> char {
        match self {
            Self::WhiteKingside => 'K',
            Self::WhiteQueenside => 'Q',
            Self::BlackKingside => 'k',
            Self::BlackQueenside => 'q',
        }
    }

    /// The side this right belongs to.
    pub const fn color(&self) -> Color {
        match self {
            Self::WhiteKingside | Self::WhiteQueenside => Color::White,
            Self::BlackKingside | Self::BlackQueenside => Color::Black,
        }
    }
}

impl fmt::Display for CastlingRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// The castling rights of both sides.
///
/// All four flags are independent of one another and of the piece placement.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    white_kingside: bool,
    white_queenside: bool,
    black_kingside: bool,
    black_queenside: bool,
}

impl CastlingRights {
    /// No castling rights for either side, written `-` in a FEN.
    pub const NONE: Self = Self {
        white_kingside: false,
        white_queenside: false,
        black_kingside: false,
        black_queenside: false,
    };

    /// Every castling right, written `KQkq` in a FEN.
    pub const ALL: Self = Self {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    /// Whether `right` is held.
    pub const fn has(&self, right: CastlingRight) -> bool {
        match right {
            CastlingRight::WhiteKingside => self.white_kingside,
            CastlingRight::WhiteQueenside => self.white_queenside,
            CastlingRight::BlackKingside => self.black_kingside,
            CastlingRight::BlackQueenside => self.black_queenside,
        }
    }

    /// Grants `right`.
    pub fn insert(&mut self, right: CastlingRight) {
        match right {
            CastlingRight::WhiteKingside => self.white_kingside = true,
            CastlingRight::WhiteQueenside => self.white_queenside = true,
            CastlingRight::BlackKingside => self.black_kingside = true,
            CastlingRight::BlackQueenside => self.black_queenside = true,
        }
    }

    pub const fn white_kingside(&self) -> bool {
        self.white_kingside
    }

    pub const fn white_queenside(&self) -> bool {
        self.white_queenside
    }

    pub const fn black_kingside(&self) -> bool {
        self.black_kingside
    }

    pub const fn black_queenside(&self) -> bool {
        self.black_queenside
    }

    /// Iterates over the rights that are held, in `KQkq` order.
    pub fn iter(&self) -> impl Iterator<Item = CastlingRight> + '_ {
        CastlingRight::ALL.into_iter().filter(move |r| self.has(*r))
    }

    /// Returns `true` if neither side may castle.
    pub const fn is_empty(&self) -> bool {
        !(self.white_kingside || self.white_queenside || self.black_kingside || self.black_queenside)
    }
}

/// Parses exactly `w` to [`Color::White`] or `b` to [`Color::Black`].
pub(crate) fn color(input: &str) -> IResult<&str, Color> {
    alt((
        value(Color::White, char('w')),
        value(Color::Black, char('b')),
    ))(input)
}

/// Parses a case-sensitive FEN letter to a [`Piece`].
pub(crate) fn piece(input: &str) -> IResult<&str, Piece> {
    map_opt(anychar, Piece::from_char)(input)
}

/// Parses a file on a chessboard, which is a lowercase character between `a` and `h` (inclusive).
pub(crate) fn file(input: &str) -> IResult<&str, File> {
    map(one_of("abcdefgh"), |c| File::ALL[(c as u8 - b'a') as usize])(input)
}

/// Parses a rank on a chessboard, which is a numerical character between `1` and `8` (inclusive).
pub(crate) fn rank(input: &str) -> IResult<&str, Rank> {
    map(one_of("12345678"), |c| Rank::ALL[(c as u8 - b'1') as usize])(input)
}

/// Parses a square on a chessboard in file-rank notation.
#[inline(always)]
pub(crate) fn square(input: &str) -> IResult<&str, Square> {
    map(pair(file, rank), |(f, r)| Square(f, r))(input)
}
