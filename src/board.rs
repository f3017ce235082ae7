/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ops::Index;

use crate::{BoardError, Color, Piece, Role, Square};

/// The contents of one square: either empty (`None`) or a single piece.
pub type Cell = Option<Piece>;

/// An 8x8 grid of [`Cell`]s.
///
/// Row 0 holds rank 8 and row 7 holds rank 1. Within each row, column 0 is file `a`
/// and column 7 is file `h`, matching the top-to-bottom, left-to-right order of a FEN.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board([[Cell; 8]; 8]);

impl Board {
    /// A board with no pieces on it.
    pub const EMPTY: Self = Self([[None; 8]; 8]);

    /// Creates a board from an already-sized grid.
    pub const fn new(rows: [[Cell; 8]; 8]) -> Self {
        Self(rows)
    }

    /// The standard initial position of a chess game.
    pub const fn starting() -> Self {
        const fn back_rank(color: Color) -> [Cell; 8] {
            use Role::*;
            let roles = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
            let mut cells = [None; 8];
            let mut i = 0;
            while i < 8 {
                cells[i] = Some(Piece::new(color, roles[i]));
                i += 1;
            }
            cells
        }

        let mut rows = [[None; 8]; 8];
        rows[0] = back_rank(Color::Black);
        rows[1] = [Some(Piece::new(Color::Black, Role::Pawn)); 8];
        rows[6] = [Some(Piece::new(Color::White, Role::Pawn)); 8];
        rows[7] = back_rank(Color::White);
        Self(rows)
    }

    /// Loads a board from an arbitrary grid, such as one built by hand.
    ///
    /// Fails unless `rows` is exactly 8 rows of exactly 8 cells each.
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, BoardError> {
        if rows.len() != 8 {
            return Err(BoardError::RowCount { found: rows.len() });
        }

        let mut grid = [[None; 8]; 8];
        for (row, (dst, src)) in grid.iter_mut().zip(rows).enumerate() {
            let src = src.as_ref();
            if src.len() != 8 {
                return Err(BoardError::RowLength {
                    row,
                    found: src.len(),
                });
            }
            dst.copy_from_slice(src);
        }

        Ok(Self(grid))
    }

    /// All eight rows, from rank 8 down to rank 1.
    #[inline(always)]
    pub const fn rows(&self) -> &[[Cell; 8]; 8] {
        &self.0
    }

    /// The cell at `row` and `col`, or `None` if either is out of bounds.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.0.get(row).and_then(|r| r.get(col)).copied()
    }

    /// The piece on `square`, if any.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Cell {
        self.0[square.rank().row()][square.file().index()]
    }

    /// Iterates over every occupied square and the piece on it.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        use crate::{File, Rank};

        self.0
            .iter()
            .zip(Rank::ALL.into_iter().rev())
            .flat_map(|(cells, rank)| {
                cells
                    .iter()
                    .zip(File::ALL)
                    .filter_map(move |(cell, file)| cell.map(|piece| (Square(file, rank), piece)))
            })
    }

    /// Returns `true` if no square is occupied.
    pub fn is_empty(&self) -> bool {
        self.0.iter().flatten().all(Option::is_none)
    }
}

impl Index<Square> for Board {
    type Output = Cell;

    fn index(&self, square: Square) -> &Self::Output {
        &self.0[square.rank().row()][square.file().index()]
    }
}

impl From<[[Cell; 8]; 8]> for Board {
    fn from(rows: [[Cell; 8]; 8]) -> Self {
        Self::new(rows)
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = BoardError;
    /// Alias for [`Board::from_rows`].
    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}
