pub mod evaluation;
pub mod picker;

pub use evaluation::{Candidate, candidates};
pub use picker::{CapturePicker, MovePicker, RandomPicker, picker_for};
