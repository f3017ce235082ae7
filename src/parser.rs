/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::num::NonZeroU32;

use nom::{
    branch::alt,
    character::complete::{digit1, one_of, satisfy},
    combinator::{all_consuming, map, map_res, opt, recognize, value, verify},
    sequence::pair,
    IResult,
};

use crate::{
    board::Cell, types, Board, CastlingRight, CastlingRights, Color, FenParseError, Piece,
    Position, Rank, Square,
};

/// Top-level parser to convert a FEN string into a [`Position`].
///
/// The six fields are validated in order, and the first invalid field is reported.
/// Later fields are never inspected once an earlier one has failed.
///
/// See also [`Position::new`]
pub fn parse_fen(input: &str) -> Result<Position, FenParseError> {
    match parse_fields(input) {
        Ok(pos) => {
            log::trace!("parsed FEN {input:?}");
            Ok(pos)
        }
        Err(e) => {
            log::debug!("rejected FEN {input:?}: {e}");
            Err(e)
        }
    }
}

fn parse_fields(input: &str) -> Result<Position, FenParseError> {
    if input.is_empty() {
        return Err(FenParseError::EmptyInput);
    }

    let fields: Vec<&str> = input
        .split(is_separator)
        .filter(|s| !s.is_empty())
        .collect();
    let [placement, side, castling, en_passant, halfmove, fullmove] = fields[..] else {
        return Err(FenParseError::FieldCountError {
            found: fields.len(),
        });
    };

    let board = parse_placement(placement)?;
    let side_to_move = parse_side_to_move(side)?;
    let castling = parse_castling(castling)?;

    #[cfg(feature = "validate-castling-rights")]
    check_castling_pieces(&board, castling)?;

    let en_passant = parse_en_passant(en_passant)?;
    let halfmove_clock = parse_halfmove(halfmove)?;
    let fullmove_number = parse_fullmove(fullmove)?;

    Ok(Position {
        board,
        side_to_move,
        castling,
        en_passant,
        halfmove_clock,
        fullmove_number,
    })
}

/// Whitespace between FEN fields: ASCII whitespace plus the vertical tab.
fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// A single lexeme of a rank in the piece placement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlacementToken {
    /// A run of empty squares.
    Empty(usize),
    Piece(Piece),
}

/// Parses a run-length digit or a piece letter.
///
/// `9` is accepted as a run length so that it is reported as an overflow rather than an unknown piece.
fn placement_token(input: &str) -> IResult<&str, PlacementToken> {
    alt((
        map(satisfy(|c| ('1'..='9').contains(&c)), |c| {
            PlacementToken::Empty((c as u8 - b'0') as usize)
        }),
        map(types::piece, PlacementToken::Piece),
    ))(input)
}

/// Parses the piece placement field into a [`Board`].
fn parse_placement(field: &str) -> Result<Board, FenParseError> {
    let mut rows: Vec<&str> = field.split('/').collect();

    // Trailing `/` separators do not start new ranks.
    while rows.last() == Some(&"") {
        rows.pop();
    }

    if rows.len() != 8 {
        return Err(FenParseError::RowCountError { found: rows.len() });
    }

    let mut grid = [[None; 8]; 8];
    let ranks = Rank::ALL.into_iter().rev();
    for ((cells, row), rank) in grid.iter_mut().zip(rows).zip(ranks) {
        *cells = parse_rank(row, rank)?;
    }

    Ok(Board::new(grid))
}

/// Parses one `/`-separated rank of the piece placement field.
fn parse_rank(row: &str, rank: Rank) -> Result<[Cell; 8], FenParseError> {
    let mut cells = [None; 8];
    let mut col = 0;
    let mut input = row;

    while let Some(next) = input.chars().next() {
        let (rest, token) = placement_token(input)
            .map_err(|_| FenParseError::InvalidPiece { piece: next, rank })?;

        match token {
            PlacementToken::Empty(n) => {
                col += n;
                if col > 8 {
                    return Err(FenParseError::RowOverflow { rank });
                }
            }

            PlacementToken::Piece(piece) => {
                if col >= 8 {
                    return Err(FenParseError::RowOverflow { rank });
                }
                cells[col] = Some(piece);
                col += 1;
            }
        }

        input = rest;
    }

    if col != 8 {
        return Err(FenParseError::RowIncomplete { rank, columns: col });
    }

    Ok(cells)
}

/// Parses the side to move, which must be exactly `w` or `b`.
fn parse_side_to_move(field: &str) -> Result<Color, FenParseError> {
    all_consuming(types::color)(field)
        .map(|(_, color)| color)
        .map_err(|_| FenParseError::InvalidSideToMove {
            side: field.to_string(),
        })
}

/// Parses the castling field, which is either `-` or a non-repeating subset of `KQkq` in any order.
fn parse_castling(field: &str) -> Result<CastlingRights, FenParseError> {
    let mut rights = CastlingRights::NONE;
    if field == "-" {
        return Ok(rights);
    }

    for ch in field.chars() {
        let right =
            CastlingRight::from_char(ch).ok_or(FenParseError::InvalidCastlingChar { ch })?;

        if rights.has(right) {
            return Err(FenParseError::DuplicateCastlingChar { ch });
        }
        rights.insert(right);
    }

    Ok(rights)
}

/// Ensures every claimed castling right has its king and rook on their home squares.
#[cfg(feature = "validate-castling-rights")]
fn check_castling_pieces(board: &Board, rights: CastlingRights) -> Result<(), FenParseError> {
    use crate::{File, Role};

    for right in rights.iter() {
        let color = right.color();
        let home = match color {
            Color::White => Rank::One,
            Color::Black => Rank::Eight,
        };
        let corner = match right {
            CastlingRight::WhiteKingside | CastlingRight::BlackKingside => File::H,
            CastlingRight::WhiteQueenside | CastlingRight::BlackQueenside => File::A,
        };

        let king = board.piece_at(Square(File::E, home)) == Some(Piece::new(color, Role::King));
        let rook = board.piece_at(Square(corner, home)) == Some(Piece::new(color, Role::Rook));
        if !(king && rook) {
            return Err(FenParseError::CastlingWithoutPieces { right });
        }
    }

    Ok(())
}

/// Parses the en passant field, which is either `-` or a square on rank 3 or 6.
fn parse_en_passant(field: &str) -> Result<Option<Square>, FenParseError> {
    if field == "-" {
        return Ok(None);
    }

    let mut chars = field.chars();
    let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(FenParseError::InvalidEnPassantFormat {
            target: field.to_string(),
        });
    };

    let (rest, file) =
        types::file(field).map_err(|_| FenParseError::InvalidFile { file })?;
    let (_, rank) =
        all_consuming(en_passant_rank)(rest).map_err(|_| FenParseError::InvalidRank { rank })?;

    Ok(Some(Square(file, rank)))
}

/// Parses the only two ranks an en passant target can be on.
fn en_passant_rank(input: &str) -> IResult<&str, Rank> {
    alt((
        value(Rank::Three, one_of("3")),
        value(Rank::Six, one_of("6")),
    ))(input)
}

/// Parses an optionally-signed base-10 number that fits in an `i32`.
fn parse_int(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(one_of("+-")), digit1)), str::parse)(input)
}

/// Parses an entire field as an integer that is at least `min`.
fn parse_bounded(field: &str, min: i32) -> Option<u32> {
    all_consuming(verify(parse_int, |n: &i32| *n >= min))(field)
        .ok()
        .and_then(|(_, n)| u32::try_from(n).ok())
}

/// Parses the halfmove clock, which must be an integer `>= 0`.
fn parse_halfmove(field: &str) -> Result<u32, FenParseError> {
    parse_bounded(field, 0).ok_or_else(|| FenParseError::InvalidHalfmove {
        value: field.to_string(),
    })
}

/// Parses the fullmove number, which must be an integer `>= 1`.
fn parse_fullmove(field: &str) -> Result<NonZeroU32, FenParseError> {
    parse_bounded(field, 1)
        .and_then(NonZeroU32::new)
        .ok_or_else(|| FenParseError::InvalidFullmove {
            value: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FenField, File, Role};

    const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN and asserts that it is `Ok`.
    fn new_fen(input: &str) -> Position {
        let pos = parse_fen(input);
        assert!(
            pos.is_ok(),
            "Failed to parse {input:?}\nGot {:?}",
            pos.unwrap_err()
        );
        pos.unwrap()
    }

    /// Parses a FEN and asserts that it is `Err`.
    fn new_err(input: &str) -> FenParseError {
        let pos = parse_fen(input);
        assert!(pos.is_err(), "Should error from {input:?}\nGot {pos:?}");
        pos.unwrap_err()
    }

    /// Builds a FEN from the starting position with field `index` replaced by `value`.
    fn with_field(index: usize, value: &str) -> String {
        let mut fields: Vec<&str> = STARTPOS.split(' ').collect();
        fields[index] = value;
        fields.join(" ")
    }

    fn row(s: &str) -> Vec<Cell> {
        s.chars().map(Piece::from_char).collect()
    }

    #[test]
    fn test_parse_empty_board() {
        let pos = new_fen("8/8/8/8/8/8/8/8 w - - 0 1");
        assert!(pos.board().is_empty());
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.castling_rights(), CastlingRights::NONE);
        assert_eq!(pos.en_passant(), None);
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
    }

    #[test]
    fn test_parse_startpos() {
        let pos = new_fen(STARTPOS);
        let rows = pos.board().rows();
        assert_eq!(rows[0].to_vec(), row("rnbqkbnr"));
        assert_eq!(rows[1].to_vec(), row("pppppppp"));
        assert_eq!(rows[6].to_vec(), row("PPPPPPPP"));
        assert_eq!(rows[7].to_vec(), row("RNBQKBNR"));
        assert_eq!(pos.board(), &Board::starting());
        assert_eq!(pos.castling_rights(), CastlingRights::ALL);
    }

    #[test]
    fn test_parse_whitespace() {
        let pos = new_fen("  \t4k2r/8/8/8/8/8/8/8   b\tk  -\n 7    12 \n");
        assert_eq!(pos.side_to_move(), Color::Black);
        assert!(pos.black_kingside());
        assert_eq!(pos.halfmove_clock(), 7);
        assert_eq!(pos.fullmove_number(), 12);

        let pos = new_fen("8/8/8/8/8/8/8/8 w\x0b-\x0c- 0\r1");
        assert_eq!(pos.castling_rights(), CastlingRights::NONE);
        assert_eq!(pos.fullmove_number(), 1);

        assert_eq!(
            new_err("8/8/8/8/8/8/8/8\u{a0}w - - 0 1"),
            FenParseError::FieldCountError { found: 5 }
        );
    }

    #[test]
    fn test_parse_field_count() {
        assert_eq!(new_err(""), FenParseError::EmptyInput);
        assert_eq!(new_err("   "), FenParseError::FieldCountError { found: 0 });
        assert_eq!(
            new_err("8/8/8/8/8/8/8/8 w - - 0"),
            FenParseError::FieldCountError { found: 5 }
        );
        assert_eq!(
            new_err("8/8/8/8/8/8/8/8 w - - 0 1 moves"),
            FenParseError::FieldCountError { found: 7 }
        );
    }

    #[test]
    fn test_parse_placement() {
        let pos = new_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let board = pos.board();
        assert_eq!(board.rows()[0].to_vec(), row("r...k..r"));
        assert_eq!(
            board.piece_at(Square(File::F, Rank::Three)),
            Some(Piece::new(Color::White, Role::Queen))
        );
        assert_eq!(board.piece_at(Square(File::A, Rank::Four)), None);

        assert_eq!(
            new_err("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            FenParseError::RowOverflow { rank: Rank::Six }
        );
        assert_eq!(
            new_err("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN w KQkq - 0 1"),
            FenParseError::RowIncomplete {
                rank: Rank::One,
                columns: 7
            }
        );
        assert_eq!(
            new_err("8p/8/8/8/8/8/8/8 w - - 0 1"),
            FenParseError::RowOverflow { rank: Rank::Eight }
        );
        assert_eq!(
            new_err("8/8/8/8/8/8/8/4k4 w - - 0 1"),
            FenParseError::RowOverflow { rank: Rank::One }
        );
        assert_eq!(
            new_err("8/p2/8/8/8/8/8/8 w - - 0 1"),
            FenParseError::RowIncomplete {
                rank: Rank::Seven,
                columns: 3
            }
        );
        assert_eq!(
            new_err("8/8//8/8/8/8/8 w - - 0 1"),
            FenParseError::RowIncomplete {
                rank: Rank::Six,
                columns: 0
            }
        );
        assert_eq!(
            new_err("8/8/8/8/8/8/8/7x w - - 0 1"),
            FenParseError::InvalidPiece {
                piece: 'x',
                rank: Rank::One
            }
        );
        assert_eq!(
            new_err("8/8/8/08/8/8/8/8 w - - 0 1"),
            FenParseError::InvalidPiece {
                piece: '0',
                rank: Rank::Five
            }
        );
        assert_eq!(
            new_err("8/8/8/8/8/8/8 w - - 0 1"),
            FenParseError::RowCountError { found: 7 }
        );
        assert_eq!(
            new_err("8/8/8/8/8/8/8/8/8/ w - - 0 1"),
            FenParseError::RowCountError { found: 9 }
        );
        assert_eq!(
            new_err("/////// w - - 0 1"),
            FenParseError::RowCountError { found: 0 }
        );
    }

    #[test]
    fn test_parse_trailing_slashes() {
        let pos = new_fen("8/8/8/8/8/8/8/8/ w - - 0 1");
        assert!(pos.board().is_empty());

        let pos = new_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR// w KQkq - 0 1");
        assert_eq!(pos.board(), &Board::starting());

        assert_eq!(
            new_err("8/8/8/8/8/8/8/ w - - 0 1"),
            FenParseError::RowCountError { found: 7 }
        );
    }

    #[test]
    fn test_parse_rank_order_of_errors() {
        // The first problem scanning left to right wins.
        assert_eq!(
            parse_rank("9x", Rank::Two),
            Err(FenParseError::RowOverflow { rank: Rank::Two })
        );
        assert_eq!(
            parse_rank("x9", Rank::Two),
            Err(FenParseError::InvalidPiece {
                piece: 'x',
                rank: Rank::Two
            })
        );
        assert_eq!(parse_rank("44", Rank::Two).unwrap(), [None; 8]);
        assert_eq!(parse_rank("11111111", Rank::Two).unwrap(), [None; 8]);
    }

    #[test]
    fn test_parse_side_to_move() {
        assert_eq!(parse_side_to_move("w"), Ok(Color::White));
        assert_eq!(parse_side_to_move("b"), Ok(Color::Black));

        for side in ["x", "W", "B", "wb", "white"] {
            assert_eq!(
                new_err(&with_field(1, side)),
                FenParseError::InvalidSideToMove {
                    side: side.to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_castling() {
        assert_eq!(parse_castling("-"), Ok(CastlingRights::NONE));
        assert_eq!(parse_castling("KQkq"), Ok(CastlingRights::ALL));
        assert_eq!(parse_castling("qkQK"), Ok(CastlingRights::ALL));

        let rights = parse_castling("Qk").unwrap();
        assert!(!rights.white_kingside());
        assert!(rights.white_queenside());
        assert!(rights.black_kingside());
        assert!(!rights.black_queenside());

        assert_eq!(
            new_err(&with_field(2, "KQkqK")),
            FenParseError::DuplicateCastlingChar { ch: 'K' }
        );
        assert_eq!(
            new_err(&with_field(2, "KX")),
            FenParseError::InvalidCastlingChar { ch: 'X' }
        );
        assert_eq!(
            new_err(&with_field(2, "-K")),
            FenParseError::InvalidCastlingChar { ch: '-' }
        );
        assert_eq!(
            new_err(&with_field(2, "K-")),
            FenParseError::InvalidCastlingChar { ch: '-' }
        );
        assert_eq!(
            new_err(&with_field(2, "--")),
            FenParseError::InvalidCastlingChar { ch: '-' }
        );
    }

    #[test]
    #[cfg(not(feature = "validate-castling-rights"))]
    fn test_castling_is_not_checked_against_board() {
        let pos = new_fen("8/8/8/8/8/8/8/8 b KQkq - 0 1");
        assert_eq!(pos.castling_rights(), CastlingRights::ALL);
        assert!(pos.board().is_empty());
    }

    #[test]
    #[cfg(feature = "validate-castling-rights")]
    fn test_castling_is_checked_against_board() {
        new_fen(STARTPOS);
        new_fen("r3k3/8/8/8/8/8/8/4K2R w Kq - 0 1");

        assert_eq!(
            new_err("8/8/8/8/8/8/8/8 b KQkq - 0 1"),
            FenParseError::CastlingWithoutPieces {
                right: CastlingRight::WhiteKingside
            }
        );
        assert_eq!(
            new_err("r3k3/8/8/8/8/8/8/4K2R w Kk - 0 1"),
            FenParseError::CastlingWithoutPieces {
                right: CastlingRight::BlackKingside
            }
        );
    }

    #[test]
    fn test_parse_en_passant() {
        assert_eq!(parse_en_passant("-"), Ok(None));
        assert_eq!(
            parse_en_passant("e3"),
            Ok(Some(Square(File::E, Rank::Three)))
        );
        assert_eq!(
            parse_en_passant("a6"),
            Ok(Some(Square(File::A, Rank::Six)))
        );
        assert_eq!(
            parse_en_passant("h6"),
            Ok(Some(Square(File::H, Rank::Six)))
        );

        assert_eq!(
            new_err(&with_field(3, "e4")),
            FenParseError::InvalidRank { rank: '4' }
        );
        assert_eq!(
            new_err(&with_field(3, "i3")),
            FenParseError::InvalidFile { file: 'i' }
        );
        assert_eq!(
            new_err(&with_field(3, "E3")),
            FenParseError::InvalidFile { file: 'E' }
        );
        assert_eq!(
            new_err(&with_field(3, "z9")),
            FenParseError::InvalidFile { file: 'z' }
        );
        for target in ["e", "e33", "é3x"] {
            assert_eq!(
                new_err(&with_field(3, target)),
                FenParseError::InvalidEnPassantFormat {
                    target: target.to_string()
                }
            );
        }
        assert_eq!(
            new_err(&with_field(3, "--")),
            FenParseError::InvalidFile { file: '-' }
        );
        assert_eq!(
            new_err(&with_field(3, "é3")),
            FenParseError::InvalidFile { file: 'é' }
        );
    }

    #[test]
    fn test_parse_counters() {
        let pos = new_fen(&with_field(4, "99"));
        assert_eq!(pos.halfmove_clock(), 99);

        let pos = new_fen("8/8/8/8/8/8/8/8 w - - 2147483647 2147483647");
        assert_eq!(pos.halfmove_clock(), i32::MAX as u32);
        assert_eq!(pos.fullmove_number(), i32::MAX as u32);

        assert_eq!(parse_halfmove("+3"), Ok(3));
        assert_eq!(parse_halfmove("-0"), Ok(0));
        assert_eq!(parse_halfmove("007"), Ok(7));

        for value in ["-1", "x", "1.5", "", "2147483648", "1e3", "3-"] {
            assert_eq!(
                parse_halfmove(value),
                Err(FenParseError::InvalidHalfmove {
                    value: value.to_string()
                })
            );
        }

        for value in ["0", "-0", "-5", "one", "99999999999"] {
            assert_eq!(
                new_err(&with_field(5, value)),
                FenParseError::InvalidFullmove {
                    value: value.to_string()
                }
            );
        }
        assert_eq!(
            new_err(&with_field(4, "-1")),
            FenParseError::InvalidHalfmove {
                value: "-1".to_string()
            }
        );
    }

    #[test]
    fn test_first_invalid_field_wins() {
        assert_eq!(
            new_err("8/8/8/8/8/8/8/9 x KK e4 -1 0"),
            FenParseError::RowOverflow { rank: Rank::One }
        );
        assert_eq!(
            new_err("8/8/8/8/8/8/8/8 x KK e4 -1 0"),
            FenParseError::InvalidSideToMove {
                side: "x".to_string()
            }
        );
        assert_eq!(
            new_err("8/8/8/8/8/8/8/8 w KK e4 -1 0"),
            FenParseError::DuplicateCastlingChar { ch: 'K' }
        );
        assert_eq!(
            new_err("8/8/8/8/8/8/8/8 w - e4 -1 0"),
            FenParseError::InvalidRank { rank: '4' }
        );
        assert_eq!(
            new_err("8/8/8/8/8/8/8/8 w - - -1 0"),
            FenParseError::InvalidHalfmove {
                value: "-1".to_string()
            }
        );
    }

    #[test]
    fn test_errors_name_their_field() {
        let cases = [
            (0, "8/8/8/8/8/8/8/8/8", FenField::Placement),
            (0, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN", FenField::Placement),
            (0, "rnbqkbnr/ppppXppp/8/8/8/8/PPPPPPPP/RNBQKBNR", FenField::Placement),
            (1, "x", FenField::SideToMove),
            (2, "KQkqK", FenField::Castling),
            (2, "KQa", FenField::Castling),
            (3, "e4", FenField::EnPassant),
            (3, "j3", FenField::EnPassant),
            (3, "e3e", FenField::EnPassant),
            (4, "-1", FenField::Halfmove),
            (5, "0", FenField::Fullmove),
        ];

        for (index, value, field) in cases {
            let fen = with_field(index, value);
            let err = new_err(&fen);
            assert_eq!(err.field(), Some(field), "{fen:?} gave {err}");
        }

        assert_eq!(FenParseError::EmptyInput.field(), None);
        assert_eq!(new_err("w - - 0 1").field(), None);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            new_err("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").to_string(),
            "rank 6 exceeds 8 columns"
        );
        assert_eq!(
            new_err(&with_field(0, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN")).to_string(),
            "rank 1 has 7 columns, expected 8"
        );
        assert_eq!(
            new_err(&with_field(1, "x")).to_string(),
            "side to move must be 'w' or 'b', found \"x\""
        );
        assert_eq!(
            new_err(&with_field(5, "0")).to_string(),
            "fullmove number must be a positive integer, found \"0\""
        );
    }
}
