//! One human-facing game session, with an optional computer opponent.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::ai::{Candidate, MovePicker, RandomPicker, picker_for};
use crate::config::AppConfig;
use crate::engine::game::{Game, MoveRecord};
use crate::engine::types::{ChessError, Color, PieceType, Square};

use super::view::GameView;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("it is the computer's move ({0})")]
    ComputerToMove(Color),

    #[error(transparent)]
    Chess(#[from] ChessError),
}

struct AiSeat {
    color: Color,
    picker: Box<dyn MovePicker>,
}

pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    game: Game,
    ai: Option<AiSeat>,
    ai_delay: Duration,
    hints: RandomPicker,
}

impl Session {
    /// New game with the computer configured by `config`.
    pub fn new(config: &AppConfig) -> Self {
        let ai = config
            .ai_enabled
            .then(|| (config.ai_color, picker_for(config.ai_strategy, config.ai_seed)));
        Self::with_game(Game::new(), ai, config.ai_delay()).with_hint_seed(config.ai_seed)
    }

    pub fn with_game(
        game: Game,
        ai: Option<(Color, Box<dyn MovePicker>)>,
        ai_delay: Duration,
    ) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            game,
            ai: ai.map(|(color, picker)| AiSeat { color, picker }),
            ai_delay,
            hints: RandomPicker::new(None),
        };
        info!(
            id = %session.id,
            ai_color = ?session.ai_color(),
            ai_delay_ms = ai_delay.as_millis() as u64,
            "session started"
        );
        session
    }

    /// Reseed the hint generator.
    pub fn with_hint_seed(mut self, seed: Option<u64>) -> Self {
        self.hints = RandomPicker::new(seed);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Side the computer plays, if any.
    pub fn ai_color(&self) -> Option<Color> {
        self.ai.as_ref().map(|seat| seat.color)
    }

    pub fn is_ai_turn(&self) -> bool {
        self.ai_color() == Some(self.game.side_to_move())
    }

    fn human_to_move(&self) -> Result<(), SessionError> {
        if self.game.is_game_over() {
            return Err(ChessError::GameOver(self.game.outcome()).into());
        }
        if self.is_ai_turn() {
            return Err(SessionError::ComputerToMove(self.game.side_to_move()));
        }
        Ok(())
    }

    /// Play a human move. Refused while the computer is to move.
    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceType>,
    ) -> Result<MoveRecord, SessionError> {
        self.human_to_move()?;
        let record = self.game.try_commit(from, to, promotion)?;
        Ok(record.clone())
    }

    /// A random legal move for the human side. Same guards as `play`.
    pub fn hint(&mut self) -> Result<Candidate, SessionError> {
        self.human_to_move()?;
        let hint = self.hints.pick(&self.game)?;
        debug!(from = %hint.from, to = %hint.to, "hint");
        Ok(hint)
    }

    /// Let the computer move if it is its turn, after the configured delay.
    /// Returns `None` when there was nothing to do.
    pub async fn ai_reply(&mut self) -> Result<Option<MoveRecord>, ChessError> {
        if !self.is_ai_turn() || self.game.is_game_over() {
            return Ok(None);
        }
        if !self.ai_delay.is_zero() {
            tokio::time::sleep(self.ai_delay).await;
        }
        let Some(seat) = self.ai.as_mut() else {
            return Ok(None);
        };
        let choice = seat.picker.pick(&self.game)?;
        debug!(picker = seat.picker.name(), from = %choice.from, to = %choice.to, "computer move");
        let record = self.game.try_commit(choice.from, choice.to, None)?;
        Ok(Some(record.clone()))
    }

    /// Take back the human's last move. Against the computer this also takes
    /// back its reply, so the human is to move again. Returns the number of
    /// plies undone.
    pub fn undo(&mut self) -> Result<usize, ChessError> {
        let plies = if self.ai.is_some() && !self.is_ai_turn() { 2 } else { 1 };
        let plies = plies.min(self.game.history().len());
        if plies == 0 {
            return Err(ChessError::NothingToUndo);
        }
        for _ in 0..plies {
            self.game.try_undo()?;
        }
        Ok(plies)
    }

    pub fn reset(&mut self) {
        self.game.reset();
    }

    pub fn view(&self) -> GameView {
        GameView::new(&self.game, self.id, self.created_at, self.ai_color())
    }
}
