use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::engine::game::{Game, MoveRecord};
use crate::engine::types::{Color, Piece, Square};

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// JSON snapshot of a session's game.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: String,
    pub board: Vec<Vec<Option<String>>>,
    pub fen: String,
    pub side_to_move: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub check: CheckFlags,
    pub move_history: Vec<String>,
    pub captured_pieces: CapturedPieces,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_move: Option<LastMove>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_color: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckFlags {
    pub white: bool,
    pub black: bool,
}

/// Pieces taken, keyed by the side that took them.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPieces {
    pub white: Vec<String>,
    pub black: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMove {
    pub from: String,
    pub to: String,
    pub notation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<String>,
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// 8×8 board array. Row 0 = rank 8. Uppercase for White, lowercase for
/// Black, `None` for empty.
pub fn board_rows(game: &Game) -> Vec<Vec<Option<String>>> {
    (0..8u8)
        .map(|row| {
            (0..8u8)
                .map(|col| {
                    Square::new(row, col)
                        .and_then(|sq| game.piece(sq))
                        .map(|p| p.to_char().to_string())
                })
                .collect()
        })
        .collect()
}

fn piece_names(pieces: &[Piece]) -> Vec<String> {
    pieces.iter().map(|p| p.to_char().to_string()).collect()
}

impl From<&MoveRecord> for LastMove {
    fn from(record: &MoveRecord) -> Self {
        LastMove {
            from: record.from.to_string(),
            to: record.to.to_string(),
            notation: record.notation.clone(),
            promotion: record.promotion.map(|p| p.to_string()),
        }
    }
}

impl GameView {
    pub fn new(
        game: &Game,
        id: Uuid,
        created_at: DateTime<Utc>,
        ai_color: Option<Color>,
    ) -> Self {
        let outcome = game.outcome();
        GameView {
            id: id.to_string(),
            board: board_rows(game),
            fen: game.to_fen(),
            side_to_move: game.side_to_move().to_string(),
            status: outcome.as_str().to_string(),
            winner: outcome.winner().map(|c| c.to_string()),
            check: CheckFlags {
                white: game.in_check(Color::White),
                black: game.in_check(Color::Black),
            },
            move_history: game.history().iter().map(|r| r.notation.clone()).collect(),
            captured_pieces: CapturedPieces {
                white: piece_names(game.captured(Color::White)),
                black: piece_names(game.captured(Color::Black)),
            },
            last_move: game.last_move().map(LastMove::from),
            ai_color: ai_color.map(|c| c.to_string()),
            created_at: created_at.to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn board_rows_follow_rank_order() {
        let rows = board_rows(&Game::new());
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0][0].as_deref(), Some("r"));
        assert_eq!(rows[7][4].as_deref(), Some("K"));
        assert_eq!(rows[4][4], None);
    }

    #[test]
    fn json_fields() {
        let mut game = Game::new();
        assert!(game.commit(sq("e2"), sq("e4"), None));
        assert!(game.commit(sq("d7"), sq("d5"), None));
        assert!(game.commit(sq("e4"), sq("d5"), None));

        let id = Uuid::new_v4();
        let view = GameView::new(&game, id, Utc::now(), Some(Color::Black));
        let json: Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();

        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["sideToMove"], "black");
        assert_eq!(json["status"], "ongoing");
        assert!(json.get("winner").is_none());
        assert_eq!(json["check"]["black"], false);
        assert_eq!(json["moveHistory"][2], "e4xd5");
        assert_eq!(json["capturedPieces"]["white"][0], "p");
        assert_eq!(json["lastMove"]["notation"], "e4xd5");
        assert_eq!(json["aiColor"], "black");
        assert_eq!(json["board"][3][3], "P");
    }

    #[test]
    fn json_reports_winner() {
        let game =
            Game::from_fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let view = GameView::new(&game, Uuid::nil(), Utc::now(), None);
        assert_eq!(view.status, "checkmate");
        assert_eq!(view.winner.as_deref(), Some("black"));
        assert!(view.check.white);
        assert!(view.ai_color.is_none());
    }
}
