//! Board geometry: named cells and their strategic class.

use crate::types::Board;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// A named cell, in row-major order so that `cell as usize` is its index.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Position {
    /// Cell 0.
    NorthWest,
    /// Cell 1.
    North,
    /// Cell 2.
    NorthEast,
    /// Cell 3.
    West,
    /// Cell 4.
    Center,
    /// Cell 5.
    East,
    /// Cell 6.
    SouthWest,
    /// Cell 7.
    South,
    /// Cell 8.
    SouthEast,
}

/// Geometric class of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// The middle cell, part of four lines.
    Center,
    /// A corner, part of three lines.
    Corner,
    /// An edge midpoint, part of two lines.
    Edge,
}

impl CellKind {
    /// Weight used by the human-like random policy.
    pub fn weight(self) -> u32 {
        match self {
            CellKind::Center => 3,
            CellKind::Corner => 2,
            CellKind::Edge => 1,
        }
    }
}

impl Position {
    /// Board index, 0-8.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Cell at a board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// Accepts an index (`"4"`) or a name (`"center"`, `"south-east"`).
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        match input.parse::<usize>() {
            Ok(index) => Self::from_index(index),
            Err(_) => Self::from_str(input).ok(),
        }
    }

    /// Geometric class of this cell.
    pub fn kind(self) -> CellKind {
        match self.index() {
            4 => CellKind::Center,
            i if i % 2 == 0 => CellKind::Corner,
            _ => CellKind::Edge,
        }
    }

    /// Unoccupied cells in board order.
    pub fn open(board: &Board) -> impl Iterator<Item = Position> + '_ {
        Self::iter().filter(move |cell| board.is_empty(cell.index()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CELLS, Player};

    #[test]
    fn test_index_matches_order() {
        for (index, cell) in Position::iter().enumerate() {
            assert_eq!(cell.index(), index);
            assert_eq!(Position::from_index(index), Some(cell));
        }
        assert_eq!(Position::from_index(CELLS), None);
    }

    #[test]
    fn test_kinds() {
        let kinds: Vec<CellKind> = Position::iter().map(Position::kind).collect();
        assert_eq!(kinds.iter().filter(|k| **k == CellKind::Corner).count(), 4);
        assert_eq!(kinds.iter().filter(|k| **k == CellKind::Edge).count(), 4);
        assert_eq!(Position::Center.kind(), CellKind::Center);
        let total: u32 = kinds.iter().map(|k| k.weight()).sum();
        assert_eq!(total, 15);
    }

    #[test]
    fn test_parse_names_and_numbers() {
        assert_eq!(Position::parse("4"), Some(Position::Center));
        assert_eq!(Position::parse(" South-East "), Some(Position::SouthEast));
        assert_eq!(Position::parse("9"), None);
        assert_eq!(Position::parse("nowhere"), None);
        assert_eq!(Position::NorthWest.to_string(), "north-west");
    }

    #[test]
    fn test_open_skips_occupied() {
        let board: Board = "X...O....".parse().unwrap();
        let open: Vec<Position> = Position::open(&board).collect();
        assert_eq!(open.len(), 7);
        assert!(!open.contains(&Position::NorthWest));
        assert!(!open.contains(&Position::Center));
        assert!(board.with_mark(open[0].index(), Player::O).is_ok());
    }
}
