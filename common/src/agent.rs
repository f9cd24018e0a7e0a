use std::collections::BTreeSet;
use std::mem;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::{AgentError, Cell, Dimensions, MoveSelector, Sentence};

/// Minesweeper player that reasons over the clues it has been given.
///
/// The agent keeps track of which cells it has played, which cells it knows
/// to be safe or mines, and a list of [`Sentence`]s that are known to be true.
/// Every clue is folded into that knowledge and the knowledge is simplified
/// until nothing more can be deduced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeAgent {
    dimensions: Dimensions,
    moves_made: BTreeSet<Cell>,
    safes: BTreeSet<Cell>,
    mines: BTreeSet<Cell>,
    knowledge: Vec<Sentence>,
}

impl KnowledgeAgent {
    pub fn new(dimensions: Dimensions) -> Self {
        KnowledgeAgent {
            dimensions,
            moves_made: BTreeSet::new(),
            safes: BTreeSet::new(),
            mines: BTreeSet::new(),
            knowledge: Vec::new(),
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn moves_made(&self) -> &BTreeSet<Cell> {
        &self.moves_made
    }

    pub fn safes(&self) -> &BTreeSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &BTreeSet<Cell> {
        &self.mines
    }

    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    /// Marks a cell as a mine and removes it from every sentence.
    ///
    /// Rejected without any change when the cell is known safe, or when a
    /// sentence containing it would be left unsatisfiable.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<(), AgentError> {
        self.check_mark(cell, true)?;
        self.propagate(cell, true);
        self.purge();
        Ok(())
    }

    /// Marks a cell as safe and removes it from every sentence.
    ///
    /// Rejected without any change when the cell is a known mine, or when a
    /// sentence containing it would be left unsatisfiable.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<(), AgentError> {
        self.check_mark(cell, false)?;
        self.propagate(cell, false);
        self.purge();
        Ok(())
    }

    fn check_mark(&self, cell: Cell, mine: bool) -> Result<(), AgentError> {
        self.check_bounds(cell)?;
        let opposite = if mine { &self.safes } else { &self.mines };
        if opposite.contains(&cell) {
            return Err(AgentError::ConflictingMark(cell));
        }
        for sentence in self.knowledge.iter().filter(|s| s.contains(cell)) {
            let mut marked = sentence.clone();
            if mine {
                marked.mark_mine(cell);
            } else {
                marked.mark_safe(cell);
            }
            if !marked.is_consistent() {
                return Err(AgentError::Contradiction(format!(
                    "marking {cell} would leave {marked}"
                )));
            }
        }
        Ok(())
    }

    fn propagate(&mut self, cell: Cell, mine: bool) {
        if mine {
            self.mines.insert(cell);
        } else {
            self.safes.insert(cell);
        }
        for sentence in &mut self.knowledge {
            if mine {
                sentence.mark_mine(cell);
            } else {
                sentence.mark_safe(cell);
            }
        }
    }

    /// Drops empty sentences and keeps the first of any duplicates.
    fn purge(&mut self) {
        self.knowledge = mem::take(&mut self.knowledge)
            .into_iter()
            .filter(|sentence| !sentence.is_empty())
            .unique()
            .collect();
    }

    /// Called when the board reports, for a safe cell that was just played,
    /// how many of its neighbours are mines.
    ///
    /// The cell is recorded as a move and as safe, a sentence over its
    /// undetermined neighbours is added, and the knowledge base is then
    /// simplified to a fixpoint. If the clue is malformed, or it makes the
    /// knowledge contradictory, the agent is left untouched and an error is
    /// returned.
    pub fn record_clue(&mut self, cell: Cell, count: u8) -> Result<(), AgentError> {
        let mut next = self.clone();
        match next.apply_clue(cell, count) {
            Ok(inference) => {
                debug!(
                    %cell,
                    passes = inference.passes,
                    marked = inference.marked,
                    derived = inference.derived,
                    sentences = next.knowledge.len(),
                    "knowledge settled"
                );
                *self = next;
                Ok(())
            }
            Err(err) => {
                warn!(%cell, count, %err, "rejected clue");
                Err(err)
            }
        }
    }

    fn apply_clue(&mut self, cell: Cell, count: u8) -> Result<Inference, AgentError> {
        self.check_bounds(cell)?;
        if self.mines.contains(&cell) {
            return Err(AgentError::ConflictingMark(cell));
        }

        self.moves_made.insert(cell);
        self.mark_safe(cell)?;

        // Known mines are already accounted for; known safes add nothing.
        let mut remaining = count as isize;
        let mut undetermined = BTreeSet::new();
        for neighbor in self.dimensions.neighbors(cell) {
            if self.mines.contains(&neighbor) {
                remaining -= 1;
            } else if !self.safes.contains(&neighbor) && !self.moves_made.contains(&neighbor) {
                undetermined.insert(neighbor);
            }
        }

        let invalid = |reason| AgentError::InvalidClue {
            cell,
            count,
            reason,
        };
        if remaining < 0 {
            return Err(invalid("fewer mines than known neighbouring mines"));
        }
        if remaining as usize > undetermined.len() {
            return Err(invalid("more mines than undetermined neighbours"));
        }

        if !undetermined.is_empty() {
            let sentence = Sentence::new(undetermined, remaining);
            if !self.knowledge.contains(&sentence) {
                debug!(%sentence, "added sentence from clue");
                self.knowledge.push(sentence);
            }
        }

        self.infer()
    }

    /// Repeats the inference rules until a full pass changes nothing:
    /// settled sentences mark their cells, sentences contained in other
    /// sentences are subtracted from them, and empty or duplicate sentences
    /// are dropped.
    fn infer(&mut self) -> Result<Inference, AgentError> {
        let mut inference = Inference::default();
        loop {
            inference.passes += 1;
            let mut changed = false;

            let mut safes = BTreeSet::new();
            let mut mines = BTreeSet::new();
            for sentence in &self.knowledge {
                safes.extend(sentence.known_safes());
                mines.extend(sentence.known_mines());
            }
            if let Some(cell) = safes.intersection(&mines).next() {
                return Err(AgentError::Contradiction(format!(
                    "{cell} is both safe and a mine"
                )));
            }
            for &cell in &safes {
                if self.mines.contains(&cell) {
                    return Err(AgentError::Contradiction(format!(
                        "{cell} is a known mine but deduced safe"
                    )));
                }
                self.propagate(cell, false);
            }
            for &cell in &mines {
                if self.safes.contains(&cell) {
                    return Err(AgentError::Contradiction(format!(
                        "{cell} is known safe but deduced a mine"
                    )));
                }
                self.propagate(cell, true);
            }
            inference.marked += safes.len() + mines.len();
            if !safes.is_empty() || !mines.is_empty() {
                debug!(
                    safes = %safes.iter().join(" "),
                    mines = %mines.iter().join(" "),
                    "marked cells"
                );
                changed = true;
            }

            if let Some(sentence) = self.knowledge.iter().find(|s| !s.is_consistent()) {
                return Err(AgentError::Contradiction(format!(
                    "unsatisfiable sentence {sentence}"
                )));
            }

            let mut derived: Vec<Sentence> = Vec::new();
            for (outer, inner) in self.knowledge.iter().cartesian_product(&self.knowledge) {
                if outer == inner || !inner.is_subset_of(outer) {
                    continue;
                }
                let rest = outer.difference(inner);
                if !rest.is_consistent() {
                    return Err(AgentError::Contradiction(format!(
                        "{inner} cannot be part of {outer}"
                    )));
                }
                if rest.is_empty() || self.knowledge.contains(&rest) || derived.contains(&rest) {
                    continue;
                }
                debug!(sentence = %rest, "derived sentence");
                derived.push(rest);
            }
            changed |= !derived.is_empty();
            inference.derived += derived.len();
            self.knowledge.extend(derived);
            self.purge();

            if !changed {
                return Ok(inference);
            }
        }
    }

    /// Picks a cell that is known to be safe and has not been played yet.
    /// Only inspects the agent.
    pub fn make_safe_move<S>(&self, selector: &mut S) -> Option<Cell>
    where
        S: MoveSelector + ?Sized,
    {
        let candidates: Vec<Cell> = self.safes.difference(&self.moves_made).copied().collect();
        pick(selector, &candidates)
    }

    /// Picks any cell that has not been played and is not a known mine.
    pub fn make_random_move<S>(&self, selector: &mut S) -> Option<Cell>
    where
        S: MoveSelector + ?Sized,
    {
        let candidates: Vec<Cell> = self
            .dimensions
            .cells()
            .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
            .collect();
        pick(selector, &candidates)
    }

    fn check_bounds(&self, cell: Cell) -> Result<(), AgentError> {
        if self.dimensions.contains(cell) {
            Ok(())
        } else {
            Err(AgentError::OutOfBounds(cell))
        }
    }
}

/// Work done by one run of the inference loop. Every pass but the last
/// marks at least one cell or derives at least one sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Inference {
    passes: usize,
    marked: usize,
    derived: usize,
}

/// Ask the selector, discarding anything it returns that was not offered.
fn pick<S>(selector: &mut S, candidates: &[Cell]) -> Option<Cell>
where
    S: MoveSelector + ?Sized,
{
    if candidates.is_empty() {
        return None;
    }
    selector
        .select(candidates)
        .filter(|cell| candidates.binary_search(cell).is_ok())
}
