//! Exhaustive game-tree search.
//!
//! The 3x3 tree is small enough (fewer than 9! leaves, far fewer after
//! terminal pruning) that the search runs without depth limits or a
//! transposition table.

use crate::rules::{GameResult, check_game_result, winning_line};
use crate::types::{Board, Player};

/// Score of a position the searching side has won.
pub const WIN: i32 = 1;
/// Score of a drawn position.
pub const DRAW: i32 = 0;
/// Score of a position the searching side has lost.
pub const LOSS: i32 = -1;

/// Scores `board` from `ai`'s point of view and recommends a move for
/// whichever side is to play (`ai` when `maximizing`).
///
/// Terminal positions score [`WIN`], [`LOSS`] or [`DRAW`] with no depth
/// discount. Empty cells are tried in ascending index order and the
/// first strictly better child is kept, so results are reproducible.
/// A move that completes a line for the mover is returned at once,
/// which makes an immediate win preferred over a slower forced win of
/// the same score.
pub fn minimax(board: &Board, maximizing: bool, ai: Player, human: Player) -> (i32, Option<usize>) {
    match check_game_result(board) {
        GameResult::Win { mark, .. } => return (if mark == ai { WIN } else { LOSS }, None),
        GameResult::Draw => return (DRAW, None),
        GameResult::InProgress => {}
    }

    let mover = if maximizing { ai } else { human };
    let mut best: Option<(i32, usize)> = None;

    for pos in board.empty_positions() {
        let child = board.placed(pos, mover);

        if winning_line(&child).is_some() {
            let score = if mover == ai { WIN } else { LOSS };
            return (score, Some(pos));
        }

        let (score, _) = minimax(&child, !maximizing, ai, human);
        let improves = match best {
            None => true,
            Some((best_score, _)) if maximizing => score > best_score,
            Some((best_score, _)) => score < best_score,
        };
        if improves {
            best = Some((score, pos));
        }
    }

    match best {
        Some((score, pos)) => (score, Some(pos)),
        None => (DRAW, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_scores() {
        let x_won: Board = "XXX|OO.|...".parse().unwrap();
        assert_eq!(minimax(&x_won, true, Player::X, Player::O), (WIN, None));
        assert_eq!(minimax(&x_won, true, Player::O, Player::X), (LOSS, None));

        let drawn: Board = "XOX|XOO|OXX".parse().unwrap();
        assert_eq!(minimax(&drawn, true, Player::X, Player::O), (DRAW, None));
    }

    #[test]
    fn test_takes_immediate_win() {
        // O to move can win at 5; X threatens 2.
        let board: Board = "XX.|OO.|X..".parse().unwrap();
        assert_eq!(minimax(&board, true, Player::O, Player::X), (WIN, Some(5)));
    }

    #[test]
    fn test_blocks_threat() {
        // O must block the top row.
        let board: Board = "XX.|.O.|...".parse().unwrap();
        let (_, best) = minimax(&board, true, Player::O, Player::X);
        assert_eq!(best, Some(2));
    }

    #[test]
    fn test_prefers_immediate_win_over_slower_forced_win() {
        // X wins at 8 now; 3 creates a triple threat that wins a move later.
        let board: Board = "X.O|.X.|.O.".parse().unwrap();
        let (later, _) = minimax(&board.placed(3, Player::X), false, Player::X, Player::O);
        assert_eq!(later, WIN);

        let (score, best) = minimax(&board, true, Player::X, Player::O);
        assert_eq!(score, WIN);
        assert_eq!(best, Some(8));
    }

    #[test]
    fn test_minimizing_node_picks_human_best() {
        // Human (X) to move completes the top row.
        let board: Board = "XX.|OO.|...".parse().unwrap();
        assert_eq!(minimax(&board, false, Player::O, Player::X), (LOSS, Some(2)));
    }

    #[test]
    fn test_empty_board_is_a_draw_with_perfect_play() {
        let (score, best) = minimax(&Board::new(), true, Player::X, Player::O);
        assert_eq!(score, DRAW);
        assert_eq!(best, Some(0));
    }
}
