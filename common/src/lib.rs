//! A knowledge-based Minesweeper player.
//!
//! The agent keeps a list of [`Sentence`]s ("exactly `count` of these cells
//! are mines") built from the clues the board reports, and repeatedly
//! simplifies them until no new safe cells, mines or sentences can be
//! deduced.

mod agent;
mod board;
mod error;
mod game;
mod select;
mod sentence;

pub use agent::KnowledgeAgent;
pub use board::Board;
pub use error::{AgentError, BoardError};
pub use game::{Game, GameState, Step};
pub use select::{FirstCandidate, MoveSelector, RandomSelector};
pub use sentence::Sentence;

use std::fmt;

use itertools::iproduct;

/// A coordinate on the board. Ordered row-major so that sets of cells
/// iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Height and width of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize,
}

impl Dimensions {
    pub const fn new(height: usize, width: usize) -> Self {
        Dimensions { height, width }
    }

    /// Total number of cells on the board. Boards are validated with
    /// [`Dimensions::checked_len`] before use.
    pub const fn len(&self) -> usize {
        self.height * self.width
    }

    /// Total number of cells, or `None` if it does not fit in a `usize`.
    pub const fn checked_len(&self) -> Option<usize> {
        self.height.checked_mul(self.width)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Every cell of the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        iproduct!(0..self.height, 0..self.width).map(Cell::from)
    }

    /// All cells within one row and column of `cell`, not including the cell
    /// itself. Board edges and corners are clipped.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + use<> {
        let height = self.height;
        let width = self.width;

        iproduct!(-1isize..=1, -1isize..=1).filter_map(move |(dr, dc)| {
            if dr == 0 && dc == 0 {
                return None;
            }
            let row = cell.row.checked_add_signed(dr)?;
            let col = cell.col.checked_add_signed(dc)?;
            (row < height && col < width).then_some(Cell { row, col })
        })
    }
}
