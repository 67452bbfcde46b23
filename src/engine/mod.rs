pub mod attacks;
pub mod board;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod notation;
pub mod types;

pub use board::Board;
pub use game::{Game, MoveRecord, Snapshot};
pub use movegen::PositionView;
pub use types::*;
