use rand::Rng;
use rand::seq::IndexedRandom;

use crate::Cell;

/// Picks one move out of a list of candidates.
///
/// The agent decides which cells are eligible; the selector only breaks the
/// tie between them. Candidates always arrive in row-major order.
pub trait MoveSelector {
    fn select(&mut self, candidates: &[Cell]) -> Option<Cell>;
}

impl<F> MoveSelector for F
where
    F: FnMut(&[Cell]) -> Option<Cell>,
{
    fn select(&mut self, candidates: &[Cell]) -> Option<Cell> {
        self(candidates)
    }
}

/// Uniformly random choice.
#[derive(Debug, Clone)]
pub struct RandomSelector<R> {
    rng: R,
}

impl<R: Rng> RandomSelector<R> {
    pub fn new(rng: R) -> Self {
        RandomSelector { rng }
    }
}

impl<R: Rng> MoveSelector for RandomSelector<R> {
    fn select(&mut self, candidates: &[Cell]) -> Option<Cell> {
        candidates.choose(&mut self.rng).copied()
    }
}

/// Always takes the first candidate, i.e. the top-left-most eligible cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl MoveSelector for FirstCandidate {
    fn select(&mut self, candidates: &[Cell]) -> Option<Cell> {
        candidates.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_selector_picks_a_candidate() {
        let mut selector = RandomSelector::new(StdRng::seed_from_u64(7));
        let candidates = [Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2)];
        for _ in 0..20 {
            let picked = selector.select(&candidates).unwrap();
            assert!(candidates.contains(&picked));
        }
        assert_eq!(selector.select(&[]), None);
    }

    #[test]
    fn test_random_selector_is_reproducible() {
        let candidates: Vec<Cell> = (0..10).map(|i| Cell::new(i, i)).collect();
        let mut a = RandomSelector::new(StdRng::seed_from_u64(42));
        let mut b = RandomSelector::new(StdRng::seed_from_u64(42));
        for _ in 0..10 {
            assert_eq!(a.select(&candidates), b.select(&candidates));
        }
    }

    #[test]
    fn test_first_candidate_and_closure() {
        let candidates = [Cell::new(0, 2), Cell::new(1, 0)];
        assert_eq!(FirstCandidate.select(&candidates), Some(Cell::new(0, 2)));
        assert_eq!(FirstCandidate.select(&[]), None);

        let mut last = |cells: &[Cell]| cells.last().copied();
        assert_eq!(last.select(&candidates), Some(Cell::new(1, 0)));
    }
}
