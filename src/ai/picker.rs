//! Move pickers: the `MovePicker` trait, `RandomPicker` and `CapturePicker`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::AiStrategy;
use crate::engine::game::Game;
use crate::engine::types::ChessError;

use super::evaluation::{Candidate, candidates};

/// Captures beyond this rank are never considered.
const TOP_CAPTURES: usize = 3;

// =========================================================================
// MovePicker trait
// =========================================================================

/// Chooses a move for the side to move.
pub trait MovePicker: Send {
    /// Select a move in the current position.
    fn pick(&mut self, game: &Game) -> Result<Candidate, ChessError>;

    /// Human-readable name for this picker.
    fn name(&self) -> &str;
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn no_moves(game: &Game) -> ChessError {
    ChessError::GameOver(game.outcome())
}

// =========================================================================
// RandomPicker
// =========================================================================

/// Uniform over all legal moves.
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: make_rng(seed),
        }
    }
}

impl MovePicker for RandomPicker {
    fn pick(&mut self, game: &Game) -> Result<Candidate, ChessError> {
        candidates(game)
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| no_moves(game))
    }

    fn name(&self) -> &str {
        "random"
    }
}

// =========================================================================
// CapturePicker
// =========================================================================

/// Greedy one-ply heuristic.
///
/// Takes the most valuable piece on offer (randomly among the best three
/// when more than three captures exist). Without captures it plays a move
/// that leaves the piece unattacked, and only when none exists any move.
pub struct CapturePicker {
    rng: StdRng,
}

impl CapturePicker {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: make_rng(seed),
        }
    }

    fn choose(&mut self, pool: &[Candidate]) -> Option<Candidate> {
        pool.choose(&mut self.rng).copied()
    }
}

impl MovePicker for CapturePicker {
    fn pick(&mut self, game: &Game) -> Result<Candidate, ChessError> {
        let all = candidates(game);
        if all.is_empty() {
            return Err(no_moves(game));
        }

        let mut captures: Vec<Candidate> =
            all.iter().filter(|c| c.captured.is_some()).copied().collect();
        if !captures.is_empty() {
            captures.sort_by_key(|c| std::cmp::Reverse(c.capture_value()));
            let picked = if captures.len() > TOP_CAPTURES {
                self.choose(&captures[..TOP_CAPTURES])
            } else {
                Some(captures[0])
            };
            return picked.ok_or_else(|| no_moves(game));
        }

        let safe: Vec<Candidate> = all.iter().filter(|c| !c.dangerous).copied().collect();
        let pool = if safe.is_empty() { &all } else { &safe };
        self.choose(pool).ok_or_else(|| no_moves(game))
    }

    fn name(&self) -> &str {
        "capture"
    }
}

/// Build the picker for a configured strategy.
pub fn picker_for(strategy: AiStrategy, seed: Option<u64>) -> Box<dyn MovePicker> {
    match strategy {
        AiStrategy::Capture => Box::new(CapturePicker::new(seed)),
        AiStrategy::Random => Box::new(RandomPicker::new(seed)),
    }
}
