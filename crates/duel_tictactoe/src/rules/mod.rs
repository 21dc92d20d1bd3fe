//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]; shared by the move engine and the
//! server's room coordinator so both agree on what ends a game.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, Line, find_winning_move, winning_line};

use crate::types::{Board, Player};
use serde::Serialize;

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameResult {
    /// Game is ongoing.
    InProgress,
    /// A player completed a line.
    Win {
        /// The winning mark.
        mark: Player,
        /// The completed line.
        line: Line,
    },
    /// Board full with no winning line.
    Draw,
}

impl GameResult {
    /// True once the game can no longer continue.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }

    /// The winning mark, if any.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameResult::Win { mark, .. } => Some(*mark),
            _ => None,
        }
    }
}

/// Evaluates a board. At most one winner is ever reported: the first
/// completed line in [`LINES`] order.
pub fn check_game_result(board: &Board) -> GameResult {
    if let Some((mark, line)) = winning_line(board) {
        return GameResult::Win { mark, line };
    }
    if is_full(board) {
        return GameResult::Draw;
    }
    GameResult::InProgress
}
