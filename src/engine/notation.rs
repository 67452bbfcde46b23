//! Simplified move notation: `e2-e4`, `d4xe5`.
//!
//! No piece letters, no check or mate suffixes, no disambiguation.

use crate::engine::types::Square;

/// Notation for a move from `from` to `to`.
pub fn move_notation(from: Square, to: Square, capture: bool) -> String {
    let sep = if capture { 'x' } else { '-' };
    format!("{from}{sep}{to}")
}
