//! Move generation.
//!
//! Pipeline:
//!   1. Generate pseudo-legal destinations for one piece (ignoring self-check).
//!   2. Filter: play the move on a copy of the board, verify the mover's king
//!      is not attacked, drop the copy.
//!
//! The pseudo-legal rules are the only code that knows how pieces move.
//! `attacks` reuses them in attack-only mode, and castling asks `attacks`
//! about the squares the king passes; neither path ever reaches the filter.

use crate::engine::attacks;
use crate::engine::board::{Board, en_passant_victim};
use crate::engine::types::{
    CastlingRights, Color, LegalMove, MoveKind, Piece, PieceType, Square,
};

// =========================================================================
// Movement tables
// =========================================================================

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

// =========================================================================
// PositionView
// =========================================================================

/// The slice of game state move generation depends on.
#[derive(Clone, Copy, Debug)]
pub struct PositionView<'a> {
    pub board: &'a Board,
    pub en_passant: Option<Square>,
    pub castling: CastlingRights,
}

// =========================================================================
// Public API
// =========================================================================

/// Pseudo-legal destinations of the piece on `from`, appended to `out`.
/// The piece's own colour is the mover. Empty squares produce nothing.
pub fn pseudo_legal_moves(pos: PositionView<'_>, from: Square, out: &mut Vec<LegalMove>) {
    let Some(piece) = pos.board.piece(from) else {
        return;
    };
    let board = pos.board;
    let us = piece.color;

    match piece.kind {
        PieceType::Pawn => pawn_moves(pos, from, us, out),
        PieceType::Knight => step_targets(board, from, us, &KNIGHT_OFFSETS, out),
        PieceType::Bishop => ray_targets(board, from, us, &BISHOP_DIRS, out),
        PieceType::Rook => ray_targets(board, from, us, &ROOK_DIRS, out),
        PieceType::Queen => {
            ray_targets(board, from, us, &ROOK_DIRS, out);
            ray_targets(board, from, us, &BISHOP_DIRS, out);
        }
        PieceType::King => {
            step_targets(board, from, us, &KING_OFFSETS, out);
            castling_moves(pos, from, us, out);
        }
    }
}

/// Squares `piece` on `from` attacks. Same rules as `pseudo_legal_moves`
/// except that pawns hit both diagonals regardless of occupancy and never
/// push, and castling is skipped.
pub(crate) fn attack_targets(board: &Board, from: Square, piece: Piece, out: &mut Vec<LegalMove>) {
    let us = piece.color;
    match piece.kind {
        PieceType::Pawn => {
            for dc in [-1, 1] {
                if let Some(diag) = from.offset(us.forward(), dc)
                    && !board.is_color(diag, us)
                {
                    out.push(LegalMove::new(diag, capture_or_normal(board, diag)));
                }
            }
        }
        PieceType::Knight => step_targets(board, from, us, &KNIGHT_OFFSETS, out),
        PieceType::Bishop => ray_targets(board, from, us, &BISHOP_DIRS, out),
        PieceType::Rook => ray_targets(board, from, us, &ROOK_DIRS, out),
        PieceType::Queen => {
            ray_targets(board, from, us, &ROOK_DIRS, out);
            ray_targets(board, from, us, &BISHOP_DIRS, out);
        }
        PieceType::King => step_targets(board, from, us, &KING_OFFSETS, out),
    }
}

/// Would playing `mv` from `from` leave the mover's own king attacked?
/// Works on a copy of the board; `pos` is never modified.
pub fn is_legal(pos: PositionView<'_>, from: Square, mv: LegalMove) -> bool {
    let Some(piece) = pos.board.piece(from) else {
        return false;
    };
    let mut scratch = *pos.board;
    scratch.apply_move(from, mv.to, mv.kind, PieceType::Queen);
    let king = scratch.king_square(piece.color);
    !attacks::is_attacked(&scratch, king, !piece.color)
}

/// Legal destinations of the piece on `from`.
pub fn legal_moves(pos: PositionView<'_>, from: Square) -> Vec<LegalMove> {
    let mut moves = Vec::with_capacity(32);
    pseudo_legal_moves(pos, from, &mut moves);
    moves.retain(|&mv| is_legal(pos, from, mv));
    moves
}

/// Every legal move for `color`, as (origin, destination) pairs.
pub fn all_legal_moves(pos: PositionView<'_>, color: Color) -> Vec<(Square, LegalMove)> {
    pos.board
        .pieces(color)
        .flat_map(|(from, _)| legal_moves(pos, from).into_iter().map(move |mv| (from, mv)))
        .collect()
}

/// Whether `color` has at least one legal move. Stops at the first one.
pub fn has_legal_move(pos: PositionView<'_>, color: Color) -> bool {
    let mut buf = Vec::with_capacity(32);
    for (from, _) in pos.board.pieces(color) {
        buf.clear();
        pseudo_legal_moves(pos, from, &mut buf);
        if buf.iter().any(|&mv| is_legal(pos, from, mv)) {
            return true;
        }
    }
    false
}

// =========================================================================
// Pawn moves
// =========================================================================

fn pawn_moves(pos: PositionView<'_>, from: Square, us: Color, out: &mut Vec<LegalMove>) {
    let board = pos.board;
    let fwd = us.forward();

    // --- Single and double step ---
    if let Some(one) = from.offset(fwd, 0)
        && board.is_empty(one)
    {
        out.push(LegalMove::new(one, MoveKind::Normal));

        if from.row() == us.pawn_row()
            && let Some(two) = one.offset(fwd, 0)
            && board.is_empty(two)
        {
            out.push(LegalMove::new(two, MoveKind::DoubleStep));
        }
    }

    // --- Diagonal captures and en passant ---
    for dc in [-1, 1] {
        let Some(diag) = from.offset(fwd, dc) else {
            continue;
        };
        if board.is_color(diag, !us) {
            out.push(LegalMove::new(diag, MoveKind::Capture));
        } else if pos.en_passant == Some(diag) && en_passant_available(board, diag, us) {
            out.push(LegalMove::new(diag, MoveKind::EnPassant));
        }
    }
}

/// The target is only usable by the side whose opponent just double-stepped:
/// an enemy pawn must sit right behind it.
fn en_passant_available(board: &Board, target: Square, us: Color) -> bool {
    en_passant_victim(target, us)
        .and_then(|sq| board.piece(sq))
        .is_some_and(|p| p == Piece::new(!us, PieceType::Pawn))
}

// =========================================================================
// Knight and king steps
// =========================================================================

fn step_targets(
    board: &Board,
    from: Square,
    us: Color,
    offsets: &[(i8, i8)],
    out: &mut Vec<LegalMove>,
) {
    for &(dr, dc) in offsets {
        if let Some(to) = from.offset(dr, dc)
            && !board.is_color(to, us)
        {
            out.push(LegalMove::new(to, capture_or_normal(board, to)));
        }
    }
}

// =========================================================================
// Sliders (bishop, rook, queen)
// =========================================================================

fn ray_targets(board: &Board, from: Square, us: Color, dirs: &[(i8, i8)], out: &mut Vec<LegalMove>) {
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(to) = cur.offset(dr, dc) {
            match board.piece(to) {
                None => out.push(LegalMove::new(to, MoveKind::Normal)),
                Some(p) => {
                    if p.color != us {
                        out.push(LegalMove::new(to, MoveKind::Capture));
                    }
                    break;
                }
            }
            cur = to;
        }
    }
}

#[inline]
fn capture_or_normal(board: &Board, to: Square) -> MoveKind {
    if board.is_empty(to) {
        MoveKind::Normal
    } else {
        MoveKind::Capture
    }
}

// =========================================================================
// Castling
// =========================================================================

fn castling_moves(pos: PositionView<'_>, from: Square, us: Color, out: &mut Vec<LegalMove>) {
    let row = us.home_row();
    if from != Square::at(row, 4) {
        return;
    }
    let board = pos.board;
    let them = !us;
    let rook = Some(Piece::new(us, PieceType::Rook));
    let empty = |cols: &[u8]| cols.iter().all(|&c| board.is_empty(Square::at(row, c)));
    let safe = |cols: &[u8]| {
        cols.iter()
            .all(|&c| !attacks::is_attacked(board, Square::at(row, c), them))
    };

    // Kingside: e→g, f and g empty; e, f, g not attacked.
    if pos.castling.king_side(us)
        && empty(&[5, 6])
        && board.piece(Square::at(row, 7)) == rook
        && safe(&[4, 5, 6])
    {
        out.push(LegalMove::new(Square::at(row, 6), MoveKind::CastleKingSide));
    }

    // Queenside: e→c, b, c, d empty; e, d, c not attacked.
    if pos.castling.queen_side(us)
        && empty(&[1, 2, 3])
        && board.piece(Square::at(row, 0)) == rook
        && safe(&[4, 3, 2])
    {
        out.push(LegalMove::new(Square::at(row, 2), MoveKind::CastleQueenSide));
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fen::{self, FenPosition};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn load(fen_str: &str) -> FenPosition {
        fen::parse(fen_str).unwrap()
    }

    fn view(p: &FenPosition) -> PositionView<'_> {
        PositionView {
            board: &p.board,
            en_passant: p.en_passant,
            castling: p.castling,
        }
    }

    fn count_legal(fen_str: &str) -> usize {
        let p = load(fen_str);
        all_legal_moves(view(&p), p.side_to_move).len()
    }

    fn destinations(fen_str: &str, from: &str) -> Vec<LegalMove> {
        let p = load(fen_str);
        legal_moves(view(&p), sq(from))
    }

    // -------------------------------------------------------------------
    // Starting position
    // -------------------------------------------------------------------

    #[test]
    fn starting_position_has_20_moves() {
        assert_eq!(
            count_legal("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            20
        );
    }

    #[test]
    fn starting_position_after_e4() {
        assert_eq!(
            count_legal("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"),
            20
        );
    }

    // -------------------------------------------------------------------
    // Pawn moves
    // -------------------------------------------------------------------

    #[test]
    fn pawn_single_and_double_step() {
        let moves = destinations("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1", "e2");
        assert_eq!(
            moves,
            vec![
                LegalMove::new(sq("e3"), MoveKind::Normal),
                LegalMove::new(sq("e4"), MoveKind::DoubleStep),
            ]
        );
    }

    #[test]
    fn pawn_blocked() {
        assert!(destinations("4k3/8/8/8/8/4p3/4P3/4K3 w - - 0 1", "e2").is_empty());
    }

    #[test]
    fn pawn_double_step_blocked_on_second_square() {
        let moves = destinations("4k3/8/8/8/4p3/8/4P3/4K3 w - - 0 1", "e2");
        assert_eq!(moves, vec![LegalMove::new(sq("e3"), MoveKind::Normal)]);
    }

    #[test]
    fn pawn_diagonal_capture() {
        let moves = destinations("4k3/8/8/8/8/3p4/4P3/4K3 w - - 0 1", "e2");
        assert!(moves.contains(&LegalMove::new(sq("d3"), MoveKind::Capture)));
        assert_eq!(moves.len(), 3);
    }

    #[test]
    fn pawn_promotion_is_a_single_destination() {
        let moves = destinations("7k/4P3/8/8/8/8/8/4K3 w - - 0 1", "e7");
        assert_eq!(moves, vec![LegalMove::new(sq("e8"), MoveKind::Normal)]);
    }

    #[test]
    fn en_passant_move_generated() {
        // After 1. e4 d5 2. e5 f5, White can play exf6 e.p.
        let moves = destinations(
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "e5",
        );
        let ep: Vec<_> = moves
            .iter()
            .filter(|m| m.kind == MoveKind::EnPassant)
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to, sq("f6"));
    }

    #[test]
    fn en_passant_pinned_pawn_is_illegal() {
        // Capturing on d6 would open the fifth rank to the rook on a5.
        let moves = destinations("8/2k5/8/r2pP2K/8/8/8/8 w - d6 0 1", "e5");
        assert!(moves.iter().all(|m| m.kind != MoveKind::EnPassant));
    }

    // -------------------------------------------------------------------
    // Pieces
    // -------------------------------------------------------------------

    #[test]
    fn knight_in_corner() {
        let moves = destinations("4k3/8/8/8/8/8/8/N3K3 w - - 0 1", "a1");
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn rook_ray_stops_at_blockers() {
        // Own pawn on a4 blocks; enemy knight on d1 is captured and ends the ray.
        let moves = destinations("4k3/8/8/8/P7/8/8/R2nK3 w - - 0 1", "a1");
        let targets: Vec<_> = moves.iter().map(|m| m.to.to_algebraic()).collect();
        assert_eq!(targets, vec!["a2", "a3", "b1", "c1", "d1"]);
        assert_eq!(moves.last().unwrap().kind, MoveKind::Capture);
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let moves = destinations("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1", "d4");
        assert_eq!(moves.len(), 27);
    }

    // -------------------------------------------------------------------
    // Castling
    // -------------------------------------------------------------------

    fn castles(fen_str: &str) -> Vec<LegalMove> {
        destinations(fen_str, if fen_str.contains(" w ") { "e1" } else { "e8" })
            .into_iter()
            .filter(|m| m.kind.is_castle())
            .collect()
    }

    #[test]
    fn castling_both_sides() {
        let c = castles("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert_eq!(
            c,
            vec![
                LegalMove::new(sq("g1"), MoveKind::CastleKingSide),
                LegalMove::new(sq("c1"), MoveKind::CastleQueenSide),
            ]
        );
    }

    #[test]
    fn castling_blocked() {
        assert!(castles("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/RN2K1NR w KQkq - 0 1").is_empty());
    }

    #[test]
    fn castling_needs_rights() {
        assert!(castles("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w kq - 0 1").is_empty());
    }

    #[test]
    fn castling_needs_rook_in_corner() {
        let c = castles("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/4K2R w KQkq - 0 1");
        assert_eq!(c, vec![LegalMove::new(sq("g1"), MoveKind::CastleKingSide)]);
    }

    #[test]
    fn castling_through_check_forbidden() {
        // Black rook on f8 attacks f1: kingside is out, queenside is fine.
        let c = castles("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert_eq!(c, vec![LegalMove::new(sq("c1"), MoveKind::CastleQueenSide)]);
    }

    #[test]
    fn castling_into_pawn_attack_forbidden() {
        // Black pawn on h2 attacks g1.
        let c = castles("4k3/8/8/8/8/8/7p/R3K2R w KQ - 0 1");
        assert_eq!(c, vec![LegalMove::new(sq("c1"), MoveKind::CastleQueenSide)]);
    }

    #[test]
    fn queenside_b_file_may_be_attacked() {
        // Rook on b8 hits b1, which the king never crosses.
        let c = castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_eq!(c, vec![LegalMove::new(sq("c1"), MoveKind::CastleQueenSide)]);
    }

    #[test]
    fn no_castling_while_in_check() {
        assert!(castles("4k3/8/8/8/8/8/8/R3K2r w Q - 0 1").is_empty());
    }

    #[test]
    fn black_castling() {
        let c = castles("r3k2r/8/8/8/8/8/8/4K3 b kq - 0 1");
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].to, sq("g8"));
        assert_eq!(c[1].to, sq("c8"));
    }

    // -------------------------------------------------------------------
    // Check evasion and the filter
    // -------------------------------------------------------------------

    #[test]
    fn must_escape_check() {
        let p = load("4k3/8/8/8/8/8/8/R3K2q w Q - 0 1");
        let v = view(&p);
        let moves = all_legal_moves(v, Color::White);
        assert!(!moves.is_empty());
        for (from, mv) in moves {
            let mut copy = p.board;
            copy.apply_move(from, mv.to, mv.kind, PieceType::Queen);
            assert!(
                !attacks::is_attacked(&copy, copy.king_square(Color::White), Color::Black),
                "{from}->{} leaves king in check",
                mv.to
            );
        }
    }

    #[test]
    fn pinned_piece_cannot_leave_line() {
        // Bishop on e2 is pinned by the rook on e8.
        let moves = destinations("4r1k1/8/8/8/8/8/4B3/4K3 w - - 0 1", "e2");
        assert!(moves.is_empty());
    }

    #[test]
    fn filter_leaves_board_untouched() {
        let p = load("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let before = p.board;
        let _ = all_legal_moves(view(&p), Color::White);
        assert_eq!(p.board, before);
    }

    #[test]
    fn has_legal_move_detects_stalemate() {
        let p = load("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
        assert!(!has_legal_move(view(&p), Color::Black));
        assert!(has_legal_move(view(&p), Color::White));
    }

    // -------------------------------------------------------------------
    // Known positions
    // -------------------------------------------------------------------

    #[test]
    fn kiwipete_48_moves() {
        assert_eq!(
            count_legal("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
            48
        );
    }

    #[test]
    fn position_3_14_moves() {
        assert_eq!(count_legal("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"), 14);
    }

    #[test]
    fn legal_moves_from_empty_square() {
        assert!(destinations("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "e4").is_empty());
    }
}
