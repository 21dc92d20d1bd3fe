//! Post-move feedback for players.

use super::minimax::minimax;
use crate::rules::{find_winning_move, winning_line};
use crate::types::{Board, Player};
use tracing::{debug, instrument};

/// Qualitative verdict on a played move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MoveEvaluation {
    /// Completes a line, whether or not it is the search's pick.
    #[display("Brilliant winning move!")]
    BrilliantWin,

    /// Optimal without winning outright.
    #[display("Perfect strategic move!")]
    Perfect,

    /// Not the search's pick, but stops the opponent's immediate win.
    #[display("Excellent defensive play!")]
    GoodDefense,

    /// The opponent had an immediate win that was left open.
    #[display("Missed a blocking opportunity")]
    MissedBlock,

    /// Anything else that is not optimal.
    #[display("Could have been better")]
    Suboptimal,

    /// No optimal move exists to compare against.
    #[display("Good move!")]
    Good,
}

/// Result of [`analyze_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_new::new)]
pub struct MoveAnalysis {
    /// Whether the played move matches the search's recommendation.
    pub is_optimal: bool,
    /// The recommended move, if the board had any.
    pub optimal_move: Option<usize>,
    /// Verdict bucket.
    pub evaluation: MoveEvaluation,
}

/// Grades `played` by searching from `player`'s perspective.
///
/// `board` is the position before the move. The result is advisory only
/// and never feeds back into game state.
#[instrument(skip(board), fields(player = %player))]
pub fn analyze_move(
    board: &Board,
    played: usize,
    player: Player,
    opponent: Player,
) -> MoveAnalysis {
    let (score, optimal_move) = minimax(board, true, player, opponent);
    let is_optimal = optimal_move == Some(played);

    let completes_line = |mark: Player| {
        board
            .with_mark(played, mark)
            .map(|next| winning_line(&next).is_some())
            .unwrap_or(false)
    };

    let evaluation = match optimal_move {
        None => MoveEvaluation::Good,
        Some(_) if completes_line(player) => MoveEvaluation::BrilliantWin,
        Some(_) if is_optimal => MoveEvaluation::Perfect,
        Some(_) => {
            if completes_line(opponent) {
                MoveEvaluation::GoodDefense
            } else if find_winning_move(board, opponent).is_some() {
                MoveEvaluation::MissedBlock
            } else {
                MoveEvaluation::Suboptimal
            }
        }
    };

    debug!(score, ?optimal_move, is_optimal, %evaluation, "Move analyzed");
    MoveAnalysis::new(is_optimal, optimal_move, evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brilliant_win() {
        let board: Board = "XX.|OO.|...".parse().unwrap();
        let analysis = analyze_move(&board, 2, Player::X, Player::O);
        assert!(analysis.is_optimal);
        assert_eq!(analysis.optimal_move, Some(2));
        assert_eq!(analysis.evaluation, MoveEvaluation::BrilliantWin);
    }

    #[test]
    fn test_second_winning_cell_is_still_brilliant() {
        // X wins at 5 (the search's pick) or at 6.
        let board: Board = "XOO|XX.|..O".parse().unwrap();
        let analysis = analyze_move(&board, 6, Player::X, Player::O);
        assert!(!analysis.is_optimal);
        assert_eq!(analysis.optimal_move, Some(5));
        assert_eq!(analysis.evaluation, MoveEvaluation::BrilliantWin);
    }

    #[test]
    fn test_perfect_block() {
        // O must block at 2; the block is the search's choice.
        let board: Board = "XX.|.O.|...".parse().unwrap();
        let analysis = analyze_move(&board, 2, Player::O, Player::X);
        assert!(analysis.is_optimal);
        assert_eq!(analysis.evaluation, MoveEvaluation::Perfect);
    }

    #[test]
    fn test_missed_block() {
        let board: Board = "XX.|.O.|...".parse().unwrap();
        let analysis = analyze_move(&board, 8, Player::O, Player::X);
        assert!(!analysis.is_optimal);
        assert_eq!(analysis.optimal_move, Some(2));
        assert_eq!(analysis.evaluation, MoveEvaluation::MissedBlock);
    }

    #[test]
    fn test_defensive_play_when_a_win_was_available() {
        // O could win at 5 but blocks X at 2 instead.
        let board: Board = "XX.|OO.|X..".parse().unwrap();
        let analysis = analyze_move(&board, 2, Player::O, Player::X);
        assert!(!analysis.is_optimal);
        assert_eq!(analysis.optimal_move, Some(5));
        assert_eq!(analysis.evaluation, MoveEvaluation::GoodDefense);
    }

    #[test]
    fn test_full_board_is_good() {
        let board: Board = "XOX|XOO|OXX".parse().unwrap();
        let analysis = analyze_move(&board, 0, Player::X, Player::O);
        assert_eq!(analysis.optimal_move, None);
        assert_eq!(analysis.evaluation, MoveEvaluation::Good);
        assert_eq!(analysis.evaluation.to_string(), "Good move!");
    }
}
