//! Stateful game controller.
//!
//! `Game` owns the board, turn, castling rights, en-passant target, capture
//! lists and move history. It commits legal moves, reverses them exactly,
//! and keeps the check flags and outcome current after every change. It is
//! the primary type consumers interact with.

use tracing::{debug, info, trace};

use crate::engine::attacks;
use crate::engine::board::{Board, KingPositions};
use crate::engine::fen;
use crate::engine::movegen::{self, PositionView};
use crate::engine::notation;
use crate::engine::types::{
    CastlingRights, ChessError, Color, GameOutcome, LegalMove, MoveKind, Piece, PieceType, Square,
};

// =========================================================================
// Snapshot / MoveRecord
// =========================================================================

/// The auxiliary state a move can change, captured before the move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub en_passant: Option<Square>,
    pub castling: CastlingRights,
    pub kings: KingPositions,
}

/// A committed move, with everything needed to take it back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The piece as it stood on `from`, before any promotion.
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub kind: MoveKind,
    /// Kind the pawn became, for promoting moves.
    pub promotion: Option<PieceType>,
    pub notation: String,
    pub snapshot: Snapshot,
}

// =========================================================================
// Game
// =========================================================================

/// A complete game: position, history, undo and status tracking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    /// Pieces taken, indexed by the colour that took them.
    captured: [Vec<Piece>; 2],
    history: Vec<MoveRecord>,
    in_check: [bool; 2],
    outcome: GameOutcome,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self {
            board: Board::starting(),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            captured: [Vec::new(), Vec::new()],
            history: Vec::new(),
            in_check: [false; 2],
            outcome: GameOutcome::Ongoing,
        }
    }

    /// Create a game from a FEN string. History starts empty.
    pub fn from_fen(fen_str: &str) -> Result<Self, ChessError> {
        let pos = fen::parse(fen_str)?;
        let mut game = Self {
            board: pos.board,
            side_to_move: pos.side_to_move,
            castling: pos.castling,
            en_passant: pos.en_passant,
            ..Self::new()
        };
        game.evaluate_status();
        Ok(game)
    }

    /// Back to the starting position with an empty history.
    pub fn reset(&mut self) {
        *self = Self::new();
        debug!("game reset");
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Piece on a square, if any.
    pub fn piece(&self, sq: Square) -> Option<Piece> {
        self.board.piece(sq)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    pub fn king_square(&self, color: Color) -> Square {
        self.board.king_square(color)
    }

    /// Whether `color`'s king is attacked. Only the side to move can be.
    pub fn in_check(&self, color: Color) -> bool {
        self.in_check[color.index()]
    }

    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_over()
    }

    /// Committed moves, oldest first.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// Pieces captured by `color`, in capture order.
    pub fn captured(&self, color: Color) -> &[Piece] {
        &self.captured[color.index()]
    }

    /// Current position as FEN.
    pub fn to_fen(&self) -> String {
        fen::format(&self.board, self.side_to_move, self.castling, self.en_passant)
    }

    pub(crate) fn view(&self) -> PositionView<'_> {
        PositionView {
            board: &self.board,
            en_passant: self.en_passant,
            castling: self.castling,
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            en_passant: self.en_passant,
            castling: self.castling,
            kings: self.board.kings(),
        }
    }

    // -----------------------------------------------------------------
    // Move queries
    // -----------------------------------------------------------------

    /// Legal destinations from `sq`. Empty unless the square holds a piece
    /// of the side to move.
    pub fn legal_moves(&self, sq: Square) -> Vec<LegalMove> {
        if !self.board.is_color(sq, self.side_to_move) {
            return Vec::new();
        }
        movegen::legal_moves(self.view(), sq)
    }

    /// Every legal move for the side to move.
    pub fn all_legal_moves(&self) -> Vec<(Square, LegalMove)> {
        movegen::all_legal_moves(self.view(), self.side_to_move)
    }

    /// Is `sq` attacked by any piece of `by`?
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        attacks::is_attacked(&self.board, sq, by)
    }

    /// Would the piece moving `from` → `to` stand attacked on `to` once the
    /// move is played? False when the move is not legal.
    pub fn would_be_attacked(&self, from: Square, to: Square) -> bool {
        let Some(mv) = self.legal_moves(from).into_iter().find(|m| m.to == to) else {
            return false;
        };
        let mut scratch = self.board;
        scratch.apply_move(from, to, mv.kind, PieceType::Queen);
        attacks::is_attacked(&scratch, to, !self.side_to_move)
    }

    // -----------------------------------------------------------------
    // Commit
    // -----------------------------------------------------------------

    /// Play `from` → `to`. Returns false, leaving the game untouched, if the
    /// move is not legal.
    pub fn commit(&mut self, from: Square, to: Square, promotion: Option<PieceType>) -> bool {
        self.try_commit(from, to, promotion).is_ok()
    }

    /// Play `from` → `to` and return the history entry it produced.
    ///
    /// A pawn reaching the far rank becomes `promotion`, or a queen when no
    /// choice is given. Every check happens before the first mutation, so an
    /// error always leaves the game exactly as it was.
    pub fn try_commit(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<&MoveRecord, ChessError> {
        let us = self.side_to_move;

        if self.outcome.is_over() {
            trace!(%from, %to, outcome = %self.outcome, "commit rejected: game over");
            return Err(ChessError::GameOver(self.outcome));
        }
        let piece = self.board.piece(from).ok_or(ChessError::EmptySquare(from))?;
        if piece.color != us {
            trace!(%from, %to, "commit rejected: wrong side");
            return Err(ChessError::WrongTurn {
                square: from,
                expected: us,
            });
        }
        if let Some(kind) = promotion
            && !kind.is_promotion_choice()
        {
            return Err(ChessError::InvalidPromotion(kind));
        }
        let Some(mv) = self.legal_moves(from).into_iter().find(|m| m.to == to) else {
            trace!(%from, %to, "commit rejected: illegal");
            return Err(ChessError::IllegalMove { from, to });
        };

        let snapshot = self.snapshot();
        let notation = notation::move_notation(from, to, mv.kind.is_capture());

        // ---- Pieces: capture, en passant, castling rook, promotion ----
        let promote_to = promotion.unwrap_or(PieceType::Queen);
        let captured = self.board.apply_move(from, to, mv.kind, promote_to);
        if let Some(victim) = captured {
            self.captured[us.index()].push(victim);
            // A rook taken in its corner can never castle again.
            if victim.kind == PieceType::Rook {
                revoke_rook_right(&mut self.castling, victim.color, to);
            }
        }
        let promoted = (piece.kind == PieceType::Pawn && to.row() == us.promotion_row())
            .then_some(promote_to);

        // ---- Castling rights ----
        match piece.kind {
            PieceType::King => self.castling.revoke_all(us),
            PieceType::Rook => revoke_rook_right(&mut self.castling, us, from),
            _ => {}
        }

        // ---- En passant target ----
        self.en_passant = if mv.kind == MoveKind::DoubleStep {
            from.offset(us.forward(), 0)
        } else {
            None
        };

        self.history.push(MoveRecord {
            from,
            to,
            piece,
            captured,
            kind: mv.kind,
            promotion: promoted,
            notation,
            snapshot,
        });

        self.side_to_move = !us;
        self.evaluate_status();

        let record = &self.history[self.history.len() - 1];
        debug!(
            notation = %record.notation,
            kind = %record.kind,
            side = %us,
            "move committed"
        );
        Ok(record)
    }

    // -----------------------------------------------------------------
    // Undo
    // -----------------------------------------------------------------

    /// Take back the last move. False when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.try_undo().is_ok()
    }

    /// Take back the last move and return its history entry.
    pub fn try_undo(&mut self) -> Result<MoveRecord, ChessError> {
        let record = self.history.pop().ok_or(ChessError::NothingToUndo)?;
        let mover = record.piece.color;

        self.board.retract_move(
            record.from,
            record.to,
            record.kind,
            record.piece,
            record.captured,
        );
        if record.captured.is_some() {
            self.captured[mover.index()].pop();
        }

        self.en_passant = record.snapshot.en_passant;
        self.castling = record.snapshot.castling;
        self.board.set_kings(record.snapshot.kings);

        self.side_to_move = mover;
        self.evaluate_status();

        debug!(notation = %record.notation, side = %mover, "move undone");
        Ok(record)
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    fn evaluate_status(&mut self) {
        let us = self.side_to_move;
        let check = attacks::is_in_check(&self.board, us);
        self.in_check = [false; 2];
        self.in_check[us.index()] = check;

        let can_move = movegen::has_legal_move(self.view(), us);
        self.outcome = match (check, can_move) {
            (_, true) => GameOutcome::Ongoing,
            (true, false) => GameOutcome::Checkmate { winner: !us },
            (false, false) => GameOutcome::Stalemate,
        };

        if self.outcome.is_over() {
            info!(outcome = %self.outcome, "game over");
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop the castling right tied to a rook standing on `sq`, if `sq` is one
/// of `color`'s home corners.
fn revoke_rook_right(castling: &mut CastlingRights, color: Color, sq: Square) {
    if sq.row() != color.home_row() {
        return;
    }
    match sq.col() {
        0 => castling.revoke_queen_side(color),
        7 => castling.revoke_king_side(color),
        _ => {}
    }
}

// =========================================================================
// Tests
// =========================================================================
