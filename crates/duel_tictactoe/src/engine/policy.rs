//! Move selection for the AI opponent.

use super::difficulty::{Difficulty, MINIMAX_THRESHOLD};
use super::minimax::minimax;
use crate::position::Position;
use crate::rules::find_winning_move;
use crate::types::{Board, Player};
use rand::Rng;
use tracing::{debug, instrument};

/// Picks a move for `ai` at the given difficulty.
///
/// Returns `None` only when the board has no empty cell.
///
/// Each call rolls `r` in `[0, 1)`. When `r` exceeds the skill the move is
/// weighted-random. Otherwise skills below 0.7 win or block when they can,
/// and higher skills play the minimax move.
#[instrument(skip(board, rng), fields(difficulty = %difficulty, ai = %ai))]
pub fn select_move<R: Rng>(
    board: &Board,
    difficulty: Difficulty,
    ai: Player,
    human: Player,
    rng: &mut R,
) -> Option<usize> {
    if board.empty_positions().next().is_none() {
        debug!("No empty cells");
        return None;
    }

    let skill = difficulty.skill();
    let roll: f64 = rng.random();
    if roll > skill {
        debug!(roll, skill, "Playing a human-like move");
        return weighted_random_move(board, rng);
    }

    if skill < MINIMAX_THRESHOLD {
        if let Some(cell) = find_winning_move(board, ai) {
            debug!(cell, "Taking immediate win");
            return Some(cell);
        }
        if let Some(cell) = find_winning_move(board, human) {
            debug!(cell, "Blocking opponent");
            return Some(cell);
        }
        return weighted_random_move(board, rng);
    }

    let (score, best) = minimax(board, true, ai, human);
    debug!(score, ?best, "Minimax search complete");
    best.or_else(|| weighted_random_move(board, rng))
}

/// Random empty cell favoring the center (weight 3) and corners (2)
/// over edges (1).
pub fn weighted_random_move<R: Rng>(board: &Board, rng: &mut R) -> Option<usize> {
    let candidates: Vec<(usize, u32)> = Position::open(board)
        .map(|cell| (cell.index(), cell.kind().weight()))
        .collect();

    let total: u32 = candidates.iter().map(|(_, weight)| weight).sum();
    if total == 0 {
        return None;
    }

    let mut ticket = rng.random_range(0..total);
    for &(cell, weight) in &candidates {
        if ticket < weight {
            return Some(cell);
        }
        ticket -= weight;
    }
    candidates.last().map(|&(cell, _)| cell)
}
