//! Text rendering of a game.

use std::fmt::Write;

use crate::engine::game::Game;
use crate::engine::types::{Color, GameOutcome, Piece, Square};

const FILES: &str = "  a b c d e f g h";

fn piece_char(piece: Piece, unicode: bool) -> char {
    if unicode { piece.glyph() } else { piece.to_char() }
}

fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

/// The board from White's side, rank 8 on top.
pub fn board(game: &Game, unicode: bool) -> String {
    let empty = if unicode { '·' } else { '.' };
    let mut out = String::with_capacity(220);
    out.push_str(FILES);
    out.push('\n');
    for row in 0..8u8 {
        let rank = 8 - row;
        let _ = write!(out, "{rank} ");
        for col in 0..8u8 {
            let ch = Square::new(row, col)
                .and_then(|sq| game.piece(sq))
                .map_or(empty, |p| piece_char(p, unicode));
            out.push(ch);
            out.push(' ');
        }
        let _ = writeln!(out, "{rank}");
    }
    out.push_str(FILES);
    out
}

/// One line per side listing what it has taken.
pub fn captured(game: &Game, unicode: bool) -> String {
    Color::BOTH
        .iter()
        .map(|&color| {
            let taken: String = game
                .captured(color)
                .iter()
                .map(|&p| piece_char(p, unicode))
                .collect();
            format!("{} captured: {}", side_name(color), taken)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Move history as numbered pairs: `1. e2-e4 e7-e5`.
pub fn history(game: &Game) -> String {
    game.history()
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| {
            let moves: Vec<&str> = pair.iter().map(|r| r.notation.as_str()).collect();
            format!("{}. {}", i + 1, moves.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn, check, or the final result.
pub fn status_line(game: &Game) -> String {
    match game.outcome() {
        GameOutcome::Checkmate { winner } => format!("Checkmate! {} wins", side_name(winner)),
        GameOutcome::Stalemate => "Stalemate".to_string(),
        GameOutcome::Ongoing => {
            let side = game.side_to_move();
            if game.in_check(side) {
                format!("{} to move, in check", side_name(side))
            } else {
                format!("{} to move", side_name(side))
            }
        }
    }
}

/// Everything: board, captures, history and status.
pub fn render(game: &Game, unicode: bool) -> String {
    let mut out = board(game, unicode);
    out.push_str("\n\n");
    out.push_str(&captured(game, unicode));
    if !game.history().is_empty() {
        out.push_str("\n\n");
        out.push_str(&history(game));
    }
    out.push_str("\n\n");
    out.push_str(&status_line(game));
    out
}
