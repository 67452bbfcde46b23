//! Attack detection.
//!
//! A square is attacked by a colour when one of that colour's pieces could
//! move onto it under the pseudo-legal rules. The scan reuses
//! `movegen::attack_targets` and never consults the legality filter.

use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::types::Color;
use crate::engine::types::Square;

/// Is `target` attacked by any piece of colour `by`?
pub fn is_attacked(board: &Board, target: Square, by: Color) -> bool {
    let mut buf = Vec::with_capacity(28);
    for (from, piece) in board.pieces(by) {
        buf.clear();
        movegen::attack_targets(board, from, piece, &mut buf);
        if buf.iter().any(|mv| mv.to == target) {
            return true;
        }
    }
    false
}

/// Is `color`'s king attacked by the other side?
#[inline]
pub fn is_in_check(board: &Board, color: Color) -> bool {
    is_attacked(board, board.king_square(color), !color)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fen;
    use crate::engine::movegen::{PositionView, pseudo_legal_moves};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn board(fen_str: &str) -> Board {
        fen::parse(fen_str).unwrap().board
    }

    #[test]
    fn starting_position_attacks() {
        let b = Board::starting();
        // Pawns and knights cover the third rank.
        assert!(is_attacked(&b, sq("e3"), Color::White));
        assert!(is_attacked(&b, sq("a3"), Color::White));
        assert!(is_attacked(&b, sq("f6"), Color::Black));
        // Nothing reaches the middle of the board.
        assert!(!is_attacked(&b, sq("e4"), Color::White));
        assert!(!is_attacked(&b, sq("d5"), Color::Black));
    }

    #[test]
    fn pawn_attacks_diagonally_not_forward() {
        let b = board("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert!(is_attacked(&b, sq("d3"), Color::White));
        assert!(is_attacked(&b, sq("f3"), Color::White));
        assert!(!is_attacked(&b, sq("e3"), Color::White));
    }

    #[test]
    fn sliders_are_blocked() {
        let b = board("4k3/8/8/8/R3p3/8/8/4K3 w - - 0 1");
        assert!(is_attacked(&b, sq("e4"), Color::White));
        assert!(!is_attacked(&b, sq("f4"), Color::White));
        assert!(is_attacked(&b, sq("a8"), Color::White));
    }

    #[test]
    fn own_pieces_are_not_attacked_by_own_side() {
        let b = Board::starting();
        assert!(!is_attacked(&b, sq("e2"), Color::White));
    }

    #[test]
    fn detects_check() {
        let b = board("4k3/8/8/8/8/8/8/4K2r w - - 0 1");
        assert!(is_in_check(&b, Color::White));
        assert!(!is_in_check(&b, Color::Black));
        assert!(is_attacked(&b, sq("e1"), Color::Black));
    }

    #[test]
    fn agrees_with_pseudo_legal_destinations_on_occupied_squares() {
        let p = fen::parse("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
        let pos = PositionView {
            board: &p.board,
            en_passant: p.en_passant,
            castling: p.castling,
        };
        for by in Color::BOTH {
            let mut reach = Vec::new();
            for (from, _) in p.board.pieces(by) {
                pseudo_legal_moves(pos, from, &mut reach);
            }
            for target in Square::all() {
                if p.board.is_empty(target) || p.board.is_color(target, by) {
                    continue;
                }
                let expected = reach.iter().any(|mv| mv.to == target);
                assert_eq!(
                    is_attacked(&p.board, target, by),
                    expected,
                    "{target} attacked by {by}"
                );
            }
        }
    }
}
