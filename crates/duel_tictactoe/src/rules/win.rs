//! Win detection logic for tic-tac-toe.

use crate::types::{Board, Player, Square};

/// Three cell indices forming a row, column or diagonal.
pub type Line = [usize; 3];

/// Winning combinations.
pub const LINES: [Line; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // Rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // Columns
    [0, 4, 8], [2, 4, 6],             // Diagonals
];

/// Returns the first completed line and its owner.
pub fn winning_line(board: &Board) -> Option<(Player, Line)> {
    let squares = board.squares();
    LINES.iter().find_map(|&[a, b, c]| match squares[a] {
        Square::Occupied(player) if squares[b] == squares[a] && squares[c] == squares[a] => {
            Some((player, [a, b, c]))
        }
        _ => None,
    })
}

/// Finds a cell that completes a line for `player` right now: a line
/// holding two of their marks and one empty cell.
pub fn find_winning_move(board: &Board, player: Player) -> Option<usize> {
    let squares = board.squares();
    LINES.iter().find_map(|line| {
        let own = line
            .iter()
            .filter(|&&i| squares[i] == Square::Occupied(player))
            .count();
        let empty = line.iter().copied().find(|&i| squares[i] == Square::Empty);
        match (own, empty) {
            (2, Some(cell)) => Some(cell),
            _ => None,
        }
    })
}
