//! Core domain types for tic-tac-toe.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// Player mark.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Player {
    /// Player X (goes first).
    X,
    /// Player O (goes second).
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A square on the tic-tac-toe board.
///
/// Serialized as `"X"`, `"O"` or `""` to match the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Square {
    /// Empty square.
    #[default]
    Empty,
    /// Square occupied by a player.
    Occupied(Player),
}

impl Square {
    /// Returns the occupying player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Square::Empty => None,
            Square::Occupied(player) => Some(player),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Square::Empty => "",
            Square::Occupied(Player::X) => "X",
            Square::Occupied(Player::O) => "O",
        }
    }
}

impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SquareVisitor;

        impl Visitor<'_> for SquareVisitor {
            type Value = Square;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(r#"one of "X", "O", "" or null"#)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Square, E> {
                match v {
                    "" => Ok(Square::Empty),
                    "X" => Ok(Square::Occupied(Player::X)),
                    "O" => Ok(Square::Occupied(Player::O)),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }

            fn visit_unit<E: de::Error>(self) -> Result<Square, E> {
                Ok(Square::Empty)
            }

            fn visit_none<E: de::Error>(self) -> Result<Square, E> {
                Ok(Square::Empty)
            }
        }

        // `null` is accepted as an empty cell.
        deserializer.deserialize_any(SquareVisitor)
    }
}

/// Error raised when a board cannot be built or a mark cannot be placed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum BoardError {
    /// Wrong number of cells.
    #[display("Board must have exactly 9 cells, got {}", _0)]
    InvalidLength(usize),

    /// Unknown cell symbol in text notation.
    #[display("Invalid cell symbol {:?}", _0)]
    InvalidSymbol(char),

    /// Position outside 0-8.
    #[display("Position {} is out of bounds (must be 0-8)", _0)]
    OutOfBounds(usize),

    /// Target square already holds a mark.
    #[display("Square {} is already occupied", _0)]
    Occupied(usize),
}

impl std::error::Error for BoardError {}

/// 3x3 tic-tac-toe board in row-major order.
///
/// Boards are values: placing a mark returns a new board and leaves
/// the original untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Square>", into = "Vec<Square>")]
pub struct Board {
    squares: [Square; CELLS],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; CELLS],
        }
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<Square> {
        self.squares.get(pos).copied()
    }

    /// Checks if a square is empty. Out-of-range positions are never empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; CELLS] {
        &self.squares
    }

    /// Iterates empty positions in ascending order.
    pub fn empty_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(|(_, sq)| **sq == Square::Empty)
            .map(|(pos, _)| pos)
    }

    /// Counts the marks a player has on the board.
    pub fn count(&self, player: Player) -> usize {
        self.squares
            .iter()
            .filter(|sq| **sq == Square::Occupied(player))
            .count()
    }

    /// Returns a copy of this board with `player`'s mark at `pos`.
    pub fn with_mark(&self, pos: usize, player: Player) -> Result<Board, BoardError> {
        match self.get(pos) {
            None => Err(BoardError::OutOfBounds(pos)),
            Some(Square::Occupied(_)) => Err(BoardError::Occupied(pos)),
            Some(Square::Empty) => Ok(self.placed(pos, player)),
        }
    }

    /// Unchecked placement for positions already known to be empty.
    pub(crate) fn placed(&self, pos: usize, player: Player) -> Board {
        let mut next = *self;
        next.squares[pos] = Square::Occupied(player);
        next
    }

    /// Swaps every X for an O and vice versa.
    pub fn relabeled(&self) -> Board {
        let mut next = *self;
        for sq in next.squares.iter_mut() {
            if let Square::Occupied(player) = *sq {
                *sq = Square::Occupied(player.opponent());
            }
        }
        next
    }

    /// Three-line grid with empty cells shown by their index.
    pub fn display(&self) -> String {
        self.squares
            .chunks(3)
            .enumerate()
            .map(|(row, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(col, square)| match square.player() {
                        Some(player) => player.to_string(),
                        None => (row * 3 + col).to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<[Square; CELLS]> for Board {
    fn from(squares: [Square; CELLS]) -> Self {
        Self { squares }
    }
}

impl TryFrom<Vec<Square>> for Board {
    type Error = BoardError;

    fn try_from(cells: Vec<Square>) -> Result<Self, Self::Error> {
        let len = cells.len();
        let squares: [Square; CELLS] = cells
            .try_into()
            .map_err(|_| BoardError::InvalidLength(len))?;
        Ok(Self { squares })
    }
}

impl From<Board> for Vec<Square> {
    fn from(board: Board) -> Self {
        board.squares.to_vec()
    }
}

/// Compact notation: nine cells of `X`, `O` or `.`/`_`/`-` for empty.
/// Whitespace and `|` separators are ignored, so `"XO.|.X.|..O"` parses.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .map(|c| match c.to_ascii_uppercase() {
                'X' => Ok(Square::Occupied(Player::X)),
                'O' => Ok(Square::Occupied(Player::O)),
                '.' | '_' | '-' => Ok(Square::Empty),
                other => Err(BoardError::InvalidSymbol(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Board::try_from(cells)
    }
}
