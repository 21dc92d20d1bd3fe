//! Exhaustive property checks for rules and the move engine.
//!
//! The game is small enough to enumerate every reachable position, so
//! these tests check properties over the whole state space instead of
//! sampling it.

use std::collections::HashSet;

use duel_tictactoe::{
    Board, Difficulty, GameResult, MoveEvaluation, Player, Square, analyze_move,
    check_game_result, find_winning_move, minimax, select_move,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Every position reachable from the empty board by legal alternating play.
fn reachable_positions() -> Vec<Board> {
    let mut seen = HashSet::new();
    let mut stack = vec![Board::new()];
    while let Some(board) = stack.pop() {
        if !seen.insert(board) {
            continue;
        }
        if check_game_result(&board).is_terminal() {
            continue;
        }
        let mover = side_to_move(&board);
        for pos in board.empty_positions() {
            stack.push(board.with_mark(pos, mover).expect("empty cell"));
        }
    }
    seen.into_iter().collect()
}

fn side_to_move(board: &Board) -> Player {
    if board.count(Player::X) == board.count(Player::O) {
        Player::X
    } else {
        Player::O
    }
}

fn in_progress(board: &Board) -> bool {
    check_game_result(board) == GameResult::InProgress
}

fn completes_line(board: &Board, cell: usize, mark: Player) -> bool {
    let next = board.with_mark(cell, mark).expect("legal move");
    check_game_result(&next).winner() == Some(mark)
}

#[test]
fn test_reachable_state_count() {
    assert_eq!(reachable_positions().len(), 5478);
}

#[test]
fn test_last_empty_cell_always_filled_at_max_difficulty() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut checked = 0;
    for board in reachable_positions() {
        let empties: Vec<usize> = board.empty_positions().collect();
        if empties.len() != 1 || !in_progress(&board) {
            continue;
        }
        let mover = side_to_move(&board);
        let cell = select_move(&board, Difficulty::MAX, mover, mover.opponent(), &mut rng);
        assert_eq!(cell, Some(empties[0]), "board:\n{}", board.display());
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn test_never_misses_immediate_win_at_max_difficulty() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut checked = 0;
    for board in reachable_positions() {
        if !in_progress(&board) {
            continue;
        }
        let mover = side_to_move(&board);
        if find_winning_move(&board, mover).is_none() {
            continue;
        }
        let cell = select_move(&board, Difficulty::MAX, mover, mover.opponent(), &mut rng)
            .expect("board has empty cells");
        assert!(
            completes_line(&board, cell, mover),
            "picked {cell} instead of winning on\n{}",
            board.display()
        );
        checked += 1;
    }
    assert!(checked > 100);
}

#[test]
fn test_minimax_branch_never_misses_immediate_win() {
    for board in reachable_positions() {
        if !in_progress(&board) {
            continue;
        }
        let mover = side_to_move(&board);
        if find_winning_move(&board, mover).is_none() {
            continue;
        }
        let (score, best) = minimax(&board, true, mover, mover.opponent());
        assert_eq!(score, 1);
        assert!(completes_line(&board, best.expect("move"), mover));
    }
}

#[test]
fn test_result_symmetric_under_relabeling() {
    // All 3^9 boards, reachable or not.
    for code in 0..3u32.pow(9) {
        let mut squares = [Square::Empty; 9];
        let mut rest = code;
        for sq in squares.iter_mut() {
            *sq = match rest % 3 {
                0 => Square::Empty,
                1 => Square::Occupied(Player::X),
                _ => Square::Occupied(Player::O),
            };
            rest /= 3;
        }
        let board = Board::from(squares);

        let expected = match check_game_result(&board) {
            GameResult::Win { mark, line } => GameResult::Win {
                mark: mark.opponent(),
                line,
            },
            other => other,
        };
        assert_eq!(check_game_result(&board.relabeled()), expected);
    }
}

#[test]
fn test_selected_moves_are_always_legal() {
    let mut rng = StdRng::seed_from_u64(2024);
    for board in reachable_positions() {
        if !in_progress(&board) || board.empty_positions().count() > 7 {
            continue;
        }
        let mover = side_to_move(&board);
        let difficulty = Difficulty::new(rng.random_range(0..=100));
        let cell = select_move(&board, difficulty, mover, mover.opponent(), &mut rng)
            .expect("in-progress board has a move");
        assert!(board.with_mark(cell, mover).is_ok());
    }
}

#[test]
fn test_perfect_play_from_empty_board_draws() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut board = Board::new();
    let mut mover = Player::X;
    while in_progress(&board) {
        let cell = select_move(&board, Difficulty::MAX, mover, mover.opponent(), &mut rng)
            .expect("move");
        board = board.with_mark(cell, mover).expect("legal");
        mover = mover.opponent();
    }
    assert_eq!(check_game_result(&board), GameResult::Draw);
}

/// Searching from a fixed O-versus-X perspective, whatever player is being
/// analyzed, grades X's winning move as a miss. Analysis must search for
/// the player that actually moved.
#[test]
fn test_analysis_searches_from_the_moving_players_side() {
    let board: Board = "XX.|OO.|...".parse().unwrap();

    let (_, fixed_perspective) = minimax(&board, true, Player::O, Player::X);
    assert_eq!(fixed_perspective, Some(5));

    let analysis = analyze_move(&board, 2, Player::X, Player::O);
    assert_eq!(analysis.optimal_move, Some(2));
    assert!(analysis.is_optimal);
    assert_eq!(analysis.evaluation, MoveEvaluation::BrilliantWin);
}
