/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#![doc = include_str!("../README.md")]

/// Parsing and validation of the six FEN fields.
mod parser;

/// Errors reported when a FEN string or a board grid is rejected.
mod error;

/// The fixed 8x8 piece placement grid.
mod board;

/// The validated result of parsing a FEN string.
mod position;

/// Well-typed representations of colors, pieces, squares, and castling rights.
///
/// Each square-like type implements both [Display] and [FromStr] following FEN notation,
/// making it easy to convert to/from them from strings.
///
/// [Display]: std::fmt::Display
/// [FromStr]: std::str::FromStr
pub mod types;

pub use board::*;
pub use error::*;
pub use parser::parse_fen;
pub use position::*;
pub use types::*;
