//! Candidate enumeration for the move pickers.
//!
//! Each legal move of the side to move is annotated with what it takes and
//! whether the moved piece would stand attacked afterwards.

use crate::engine::game::Game;
use crate::engine::notation;
use crate::engine::types::{MoveKind, Piece, Square};

/// A legal move with the facts the pickers rank on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    /// Occupant of `to` before the move.
    pub captured: Option<Piece>,
    /// The moved piece would be attacked on `to`.
    pub dangerous: bool,
}

impl Candidate {
    /// Material value of the piece taken, zero for non-captures.
    pub fn capture_value(&self) -> u8 {
        self.captured.map_or(0, |p| p.kind.value())
    }

    /// `e2-e4` / `d4xe5` form, as the move would be recorded.
    pub fn notation(&self) -> String {
        notation::move_notation(self.from, self.to, self.kind.is_capture())
    }
}

/// Every legal move of the side to move, annotated.
pub fn candidates(game: &Game) -> Vec<Candidate> {
    game.all_legal_moves()
        .into_iter()
        .map(|(from, mv)| Candidate {
            from,
            to: mv.to,
            kind: mv.kind,
            captured: game.piece(mv.to),
            dangerous: game.would_be_attacked(from, mv.to),
        })
        .collect()
}
