//! Pure tic-tac-toe rules and a tunable AI opponent.
//!
//! # Architecture
//!
//! - **Types**: [`Board`], [`Square`], [`Player`] with value semantics
//! - **Rules**: line detection and [`GameResult`] evaluation
//! - **Engine**: difficulty-scaled move selection, minimax and move analysis
//!
//! # Example
//!
//! ```
//! use duel_tictactoe::{Board, Difficulty, Player, select_move};
//! use rand::SeedableRng;
//!
//! let board: Board = "XX.|OO.|...".parse().unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let cell = select_move(&board, Difficulty::MAX, Player::O, Player::X, &mut rng);
//! assert_eq!(cell, Some(5));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
mod position;
pub mod rules;
mod types;

pub use engine::{
    Difficulty, MoveAnalysis, MoveEvaluation, analyze_move, minimax, random_ai_name, select_move,
    weighted_random_move,
};
pub use position::{CellKind, Position};
pub use rules::{GameResult, LINES, Line, check_game_result, find_winning_move};
pub use types::{Board, BoardError, CELLS, Player, Square};
