use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::IteratorRandom;

use crate::{BoardError, Cell, Dimensions};

/// The hidden layout of a game: where the mines are, and which of them the
/// player has flagged so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dimensions: Dimensions,
    mines: BTreeSet<Cell>,
    mines_found: BTreeSet<Cell>,
}

impl Board {
    /// Places `mines` mines uniformly at random. At least one cell must be
    /// left free.
    pub fn new<R>(dimensions: Dimensions, mines: usize, rng: &mut R) -> Result<Self, BoardError>
    where
        R: Rng + ?Sized,
    {
        let cells = checked_len(dimensions)?;
        if mines >= cells {
            return Err(BoardError::TooManyMines { mines, cells });
        }
        let mines = dimensions.cells().choose_multiple(rng, mines);
        Self::with_mines(dimensions, mines)
    }

    /// A board with a fixed layout.
    pub fn with_mines(
        dimensions: Dimensions,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, BoardError> {
        checked_len(dimensions)?;
        let mines = mines
            .into_iter()
            .map(|cell| {
                if dimensions.contains(cell) {
                    Ok(cell)
                } else {
                    Err(BoardError::OutOfBounds(cell))
                }
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Board {
            dimensions,
            mines,
            mines_found: BTreeSet::new(),
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Number of mines within one row and column of `cell`, not including
    /// the cell itself.
    pub fn nearby_mines(&self, cell: Cell) -> u8 {
        self.dimensions
            .neighbors(cell)
            .filter(|neighbor| self.mines.contains(neighbor))
            .count() as u8
    }

    /// Records that the player believes `cell` holds a mine.
    pub fn flag(&mut self, cell: Cell) -> Result<(), BoardError> {
        if !self.dimensions.contains(cell) {
            return Err(BoardError::OutOfBounds(cell));
        }
        self.mines_found.insert(cell);
        Ok(())
    }

    pub fn mines_found(&self) -> &BTreeSet<Cell> {
        &self.mines_found
    }

    /// Every mine has been flagged, and nothing else.
    pub fn won(&self) -> bool {
        self.mines_found == self.mines
    }
}

fn checked_len(dimensions: Dimensions) -> Result<usize, BoardError> {
    dimensions.checked_len().ok_or(BoardError::TooLarge {
        height: dimensions.height,
        width: dimensions.width,
    })
}
