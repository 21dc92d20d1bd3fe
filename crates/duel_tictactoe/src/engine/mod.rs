//! AI opponent: tunable move selection and move analysis.
//!
//! Everything here is a pure function of its inputs plus an injected
//! random source, so the engine is safe to call from any thread.

mod analysis;
mod difficulty;
mod minimax;
mod persona;
mod policy;

pub use analysis::{MoveAnalysis, MoveEvaluation, analyze_move};
pub use difficulty::{Difficulty, MINIMAX_THRESHOLD};
pub use minimax::{DRAW, LOSS, WIN, minimax};
pub use persona::random_ai_name;
pub use policy::{select_move, weighted_random_move};
