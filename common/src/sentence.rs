use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::Cell;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// The count is signed so that a sentence pushed past its limits by
/// contradictory knowledge (a mine marked in a sentence that says it has none
/// left) stays representable and can be reported instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: isize,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: isize) -> Self {
        Sentence {
            cells: cells.into_iter().collect(),
            count,
        }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> isize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// An empty sentence carries no information.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Whether the sentence can still be satisfied: `0 <= count <= len`.
    pub fn is_consistent(&self) -> bool {
        self.count >= 0 && self.count as usize <= self.cells.len()
    }

    /// Cells known to be mines: all of them once the count equals the number
    /// of cells.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count >= 0 && self.cells.len() == self.count as usize {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Cells known to be safe: all of them once the count drops to zero.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            self.count -= 1;
        }
    }

    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    /// Whether this sentence's cells are a non-empty subset of `other`'s.
    pub fn is_subset_of(&self, other: &Sentence) -> bool {
        !self.cells.is_empty() && self.cells.is_subset(&other.cells)
    }

    /// Subset resolution: the mines of `sub` are all inside `self`, so the
    /// cells of `self` outside `sub` hold the remaining mines.
    pub fn difference(&self, sub: &Sentence) -> Sentence {
        Sentence {
            cells: self.cells.difference(&sub.cells).copied().collect(),
            count: self.count - sub.count,
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().join(", "), self.count)
    }
}
