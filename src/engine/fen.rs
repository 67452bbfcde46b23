//! FEN position setup.
//!
//! Only the first four fields matter here: placement, side to move, castling
//! and en passant. Move counters are accepted when present and ignored.

use crate::engine::attacks;
use crate::engine::board::{Board, KingPositions, en_passant_victim};
use crate::engine::types::{CastlingRights, ChessError, Color, Piece, PieceType, Square};

/// Standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The fields of a parsed FEN string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FenPosition {
    pub board: Board,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
}

fn invalid(msg: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(msg.into())
}

/// Parse a FEN string.
///
/// Rejects positions the engine cannot play from: a missing or extra king,
/// pawns on a back rank, the side not to move standing in check, or an
/// en-passant square with no pawn behind it.
pub fn parse(fen: &str) -> Result<FenPosition, ChessError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() != 4 && fields.len() != 6 {
        return Err(invalid(format!(
            "expected 4 or 6 fields, got {}",
            fields.len()
        )));
    }

    // ----- Field 1: Piece placement -----
    let rows: Vec<&str> = fields[0].split('/').collect();
    if rows.len() != 8 {
        return Err(invalid(format!("expected 8 ranks, got {}", rows.len())));
    }

    let mut board = Board::empty();
    let mut kings: [Vec<Square>; 2] = [Vec::new(), Vec::new()];
    for (row, row_str) in rows.iter().enumerate() {
        let rank = 8 - row;
        let mut col: u8 = 0;
        for ch in row_str.chars() {
            if col > 7 {
                return Err(invalid(format!("too many squares in rank {rank}")));
            }
            if let Some(digit) = ch.to_digit(10) {
                if !(1..=8).contains(&digit) {
                    return Err(invalid(format!(
                        "invalid empty count '{ch}' in rank {rank}"
                    )));
                }
                col += digit as u8;
            } else if let Some((color, kind)) = PieceType::from_char(ch) {
                let sq = Square::at(row as u8, col);
                if kind == PieceType::Pawn && (rank == 1 || rank == 8) {
                    return Err(invalid(format!("pawn on back rank at {sq}")));
                }
                if kind == PieceType::King {
                    kings[color.index()].push(sq);
                }
                board.set(sq, Some(Piece::new(color, kind)));
                col += 1;
            } else {
                return Err(invalid(format!(
                    "invalid character '{ch}' in piece placement"
                )));
            }
        }
        if col != 8 {
            return Err(invalid(format!("rank {rank} has {col} squares instead of 8")));
        }
    }

    // Exactly one king per side.
    let mut cache = KingPositions::default();
    for color in Color::BOTH {
        match kings[color.index()].as_slice() {
            [sq] => cache.set(color, *sq),
            other => {
                return Err(invalid(format!(
                    "{color} has {} kings (expected 1)",
                    other.len()
                )));
            }
        }
    }
    board.set_kings(cache);

    // ----- Field 2: Side to move -----
    let side_to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(invalid(format!("invalid side to move: '{other}'"))),
    };

    // ----- Field 3: Castling availability -----
    let castling = CastlingRights::from_fen(fields[2])
        .ok_or_else(|| invalid(format!("invalid castling string: '{}'", fields[2])))?;

    // ----- Field 4: En passant target square -----
    let en_passant = match fields[3] {
        "-" => None,
        s => {
            let ep = Square::from_algebraic(s)
                .ok_or_else(|| invalid(format!("invalid en passant square: '{s}'")))?;
            let behind = en_passant_victim(ep, side_to_move).and_then(|sq| board.piece(sq));
            if behind != Some(Piece::new(!side_to_move, PieceType::Pawn)) {
                return Err(invalid(format!(
                    "en passant square {s} has no {} pawn behind it",
                    !side_to_move
                )));
            }
            Some(ep)
        }
    };

    if attacks::is_in_check(&board, !side_to_move) {
        return Err(invalid(format!(
            "{} is in check but it is {side_to_move}'s move",
            !side_to_move
        )));
    }

    #[cfg(debug_assertions)]
    board.assert_consistent();

    Ok(FenPosition {
        board,
        side_to_move,
        castling,
        en_passant,
    })
}

/// Format a position as FEN. Counters are always written as `0 1`.
pub fn format(
    board: &Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
) -> String {
    let mut fen = String::with_capacity(80);

    for row in 0..8u8 {
        let mut empty = 0u8;
        for col in 0..8u8 {
            match board.piece(Square::at(row, col)) {
                Some(piece) => {
                    if empty > 0 {
                        fen.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    fen.push(piece.to_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            fen.push((b'0' + empty) as char);
        }
        if row < 7 {
            fen.push('/');
        }
    }

    fen.push(' ');
    fen.push(match side_to_move {
        Color::White => 'w',
        Color::Black => 'b',
    });
    fen.push(' ');
    fen.push_str(&castling.to_fen());
    fen.push(' ');
    match en_passant {
        Some(sq) => fen.push_str(&sq.to_algebraic()),
        None => fen.push('-'),
    }
    fen.push_str(" 0 1");
    fen
}
