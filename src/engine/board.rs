//! Mailbox board representation.
//!
//! `Board` is an 8×8 grid of optional pieces plus a cache of both king
//! squares. It is `Copy`: legality checks simulate a move on a by-value copy
//! and drop it, so the authoritative board is only touched by a commit.

use crate::engine::types::{Color, MoveKind, Piece, PieceType, Square};

// ---------------------------------------------------------------------------
// KingPositions
// ---------------------------------------------------------------------------

/// Cached king square for each colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KingPositions([Square; 2]);

impl KingPositions {
    #[inline]
    pub fn get(&self, color: Color) -> Square {
        self.0[color.index()]
    }

    #[inline]
    pub fn set(&mut self, color: Color, sq: Square) {
        self.0[color.index()] = sq;
    }
}

impl Default for KingPositions {
    fn default() -> Self {
        KingPositions([
            Square::at(Color::White.home_row(), 4),
            Square::at(Color::Black.home_row(), 4),
        ])
    }
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Piece placement plus the king-square cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    kings: KingPositions,
}

impl Board {
    /// A board with no pieces. The king cache still points at e1/e8 and must
    /// be fixed up by whoever places the kings.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            kings: KingPositions::default(),
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        let mut board = Board::empty();
        for color in Color::BOTH {
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                board.squares[color.home_row() as usize][col] = Some(Piece::new(color, kind));
                board.squares[color.pawn_row() as usize][col] =
                    Some(Piece::new(color, PieceType::Pawn));
            }
        }
        board
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[inline]
    pub fn piece(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.piece(sq).is_none()
    }

    /// Whether `sq` holds a piece of `color`.
    #[inline]
    pub fn is_color(&self, sq: Square, color: Color) -> bool {
        self.piece(sq).is_some_and(|p| p.color == color)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.kings.get(color)
    }

    #[inline]
    pub fn kings(&self) -> KingPositions {
        self.kings
    }

    /// Every occupied square holding a piece of `color`, row by row from a8.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| {
            self.piece(sq)
                .filter(|p| p.color == color)
                .map(|p| (sq, p))
        })
    }

    // -----------------------------------------------------------------------
    // Piece manipulation (low-level)
    // -----------------------------------------------------------------------

    /// Overwrite a square. Keeps the king cache in step when a king lands.
    #[inline]
    pub(crate) fn set(&mut self, sq: Square, piece: Option<Piece>) {
        if let Some(p) = piece
            && p.kind == PieceType::King
        {
            self.kings.set(p.color, sq);
        }
        self.squares[sq.row() as usize][sq.col() as usize] = piece;
    }

    /// Empty a square, returning what was there.
    #[inline]
    pub(crate) fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.row() as usize][sq.col() as usize].take()
    }

    pub(crate) fn set_kings(&mut self, kings: KingPositions) {
        self.kings = kings;
    }

    // -----------------------------------------------------------------------
    // Move application on the grid
    // -----------------------------------------------------------------------

    /// Relocate pieces for a move: capture, en-passant victim, castling rook,
    /// promotion and king cache. Rights, en-passant target and turn are the
    /// caller's business. Returns the captured piece, if any.
    pub(crate) fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        kind: MoveKind,
        promotion: PieceType,
    ) -> Option<Piece> {
        let mut piece = self.take(from)?;
        let mut captured = self.take(to);

        if kind == MoveKind::EnPassant
            && let Some(victim_sq) = en_passant_victim(to, piece.color)
        {
            captured = self.take(victim_sq);
        }

        if let Some((rook_from, rook_to)) = castle_rook_squares(piece.color, kind) {
            let rook = self.take(rook_from);
            self.set(rook_to, rook);
        }

        if piece.kind == PieceType::Pawn && to.row() == piece.color.promotion_row() {
            piece.kind = promotion;
        }

        self.set(to, Some(piece));
        captured
    }

    /// Reverse `apply_move`. `moved` is the piece as it stood on `from`
    /// before the move, i.e. before any promotion.
    pub(crate) fn retract_move(
        &mut self,
        from: Square,
        to: Square,
        kind: MoveKind,
        moved: Piece,
        captured: Option<Piece>,
    ) {
        self.take(to);
        self.set(from, Some(moved));

        if kind == MoveKind::EnPassant {
            if let Some(victim_sq) = en_passant_victim(to, moved.color) {
                self.set(victim_sq, captured);
            }
        } else {
            self.set(to, captured);
        }

        if let Some((rook_from, rook_to)) = castle_rook_squares(moved.color, kind) {
            let rook = self.take(rook_to);
            self.set(rook_from, rook);
        }
    }

    // -----------------------------------------------------------------------
    // Consistency check (debug builds)
    // -----------------------------------------------------------------------

    /// Verify that the king cache agrees with the grid and that each side
    /// has exactly one king.
    #[cfg(any(debug_assertions, test))]
    pub fn assert_consistent(&self) {
        for color in Color::BOTH {
            let kings: Vec<Square> = self
                .pieces(color)
                .filter(|(_, p)| p.kind == PieceType::King)
                .map(|(sq, _)| sq)
                .collect();
            assert_eq!(kings.len(), 1, "{color} must have exactly one king");
            assert_eq!(
                kings[0],
                self.king_square(color),
                "king cache mismatch for {color}",
            );
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting()
    }
}

// ---------------------------------------------------------------------------
// Special-move geometry
// ---------------------------------------------------------------------------

/// Square of the pawn removed by an en-passant capture landing on `to`:
/// one step back towards the capturer's own side.
#[inline]
pub(crate) fn en_passant_victim(to: Square, mover: Color) -> Option<Square> {
    to.offset(-mover.forward(), 0)
}

/// Rook origin and destination for a castling move, `None` for other kinds.
#[inline]
pub(crate) fn castle_rook_squares(color: Color, kind: MoveKind) -> Option<(Square, Square)> {
    let row = color.home_row();
    match kind {
        MoveKind::CastleKingSide => Some((Square::at(row, 7), Square::at(row, 5))),
        MoveKind::CastleQueenSide => Some((Square::at(row, 0), Square::at(row, 3))),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn starting_layout() {
        let b = Board::starting();
        assert_eq!(
            b.piece(sq("e1")),
            Some(Piece::new(Color::White, PieceType::King))
        );
        assert_eq!(
            b.piece(sq("d8")),
            Some(Piece::new(Color::Black, PieceType::Queen))
        );
        assert_eq!(
            b.piece(sq("a2")),
            Some(Piece::new(Color::White, PieceType::Pawn))
        );
        assert!(b.is_empty(sq("e4")));
        assert_eq!(b.king_square(Color::White), sq("e1"));
        assert_eq!(b.king_square(Color::Black), sq("e8"));
        assert_eq!(b.pieces(Color::White).count(), 16);
        assert_eq!(b.pieces(Color::Black).count(), 16);
        b.assert_consistent();
    }

    #[test]
    fn apply_and_retract_capture() {
        let mut b = Board::starting();
        let before = b;
        b.set(sq("d7"), None);
        b.set(sq("e5"), Some(Piece::new(Color::Black, PieceType::Pawn)));
        b.set(sq("d4"), Some(Piece::new(Color::White, PieceType::Pawn)));
        let staged = b;

        let captured = b.apply_move(sq("d4"), sq("e5"), MoveKind::Capture, PieceType::Queen);
        assert_eq!(captured, Some(Piece::new(Color::Black, PieceType::Pawn)));
        assert!(b.is_empty(sq("d4")));

        b.retract_move(
            sq("d4"),
            sq("e5"),
            MoveKind::Capture,
            Piece::new(Color::White, PieceType::Pawn),
            captured,
        );
        assert_eq!(b, staged);
        assert_ne!(b, before);
    }

    #[test]
    fn castling_moves_rook_and_king_cache() {
        let mut b = Board::starting();
        b.set(sq("f1"), None);
        b.set(sq("g1"), None);
        let staged = b;

        b.apply_move(
            sq("e1"),
            sq("g1"),
            MoveKind::CastleKingSide,
            PieceType::Queen,
        );
        assert_eq!(b.king_square(Color::White), sq("g1"));
        assert_eq!(
            b.piece(sq("f1")),
            Some(Piece::new(Color::White, PieceType::Rook))
        );
        assert!(b.is_empty(sq("h1")));
        b.assert_consistent();

        b.retract_move(
            sq("e1"),
            sq("g1"),
            MoveKind::CastleKingSide,
            Piece::new(Color::White, PieceType::King),
            None,
        );
        assert_eq!(b, staged);
    }

    #[test]
    fn en_passant_removes_adjacent_pawn() {
        let mut b = Board::starting();
        b.set(sq("e2"), None);
        b.set(sq("e5"), Some(Piece::new(Color::White, PieceType::Pawn)));
        b.set(sq("d7"), None);
        b.set(sq("d5"), Some(Piece::new(Color::Black, PieceType::Pawn)));
        let staged = b;

        let captured = b.apply_move(sq("e5"), sq("d6"), MoveKind::EnPassant, PieceType::Queen);
        assert_eq!(captured, Some(Piece::new(Color::Black, PieceType::Pawn)));
        assert!(b.is_empty(sq("d5")));

        b.retract_move(
            sq("e5"),
            sq("d6"),
            MoveKind::EnPassant,
            Piece::new(Color::White, PieceType::Pawn),
            captured,
        );
        assert_eq!(b, staged);
    }

    #[test]
    fn promotion_changes_kind() {
        let mut b = Board::empty();
        b.set(sq("e1"), Some(Piece::new(Color::White, PieceType::King)));
        b.set(sq("e8"), Some(Piece::new(Color::Black, PieceType::King)));
        b.set(sq("a7"), Some(Piece::new(Color::White, PieceType::Pawn)));

        b.apply_move(sq("a7"), sq("a8"), MoveKind::Normal, PieceType::Knight);
        assert_eq!(
            b.piece(sq("a8")),
            Some(Piece::new(Color::White, PieceType::Knight))
        );
    }

    #[test]
    fn special_geometry() {
        assert_eq!(en_passant_victim(sq("d6"), Color::White), Some(sq("d5")));
        assert_eq!(en_passant_victim(sq("e3"), Color::Black), Some(sq("e4")));
        assert_eq!(
            castle_rook_squares(Color::Black, MoveKind::CastleQueenSide),
            Some((sq("a8"), sq("d8")))
        );
        assert_eq!(castle_rook_squares(Color::White, MoveKind::Normal), None);
    }
}
