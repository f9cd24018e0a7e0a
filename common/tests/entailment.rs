//! Uses a SAT solver as an oracle: everything the agent concludes must
//! follow from the clues it was given.

use itertools::Itertools;
use minesweeper_ai::{Board, Cell, Dimensions, FirstCandidate, KnowledgeAgent, RandomSelector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use varisat::{CnfFormula, ExtendFormula, Lit, Solver, Var};

fn mine(dims: Dimensions, cell: Cell) -> Lit {
    Lit::from_var(Var::from_index(cell.row * dims.width + cell.col), true)
}

fn at_most(formula: &mut CnfFormula, lits: &[Lit], k: isize) {
    if k < 0 {
        formula.add_clause(&[]);
        return;
    }
    for combo in lits.iter().copied().combinations(k as usize + 1) {
        let clause: Vec<Lit> = combo.iter().map(|&lit| !lit).collect();
        formula.add_clause(&clause);
    }
}

fn at_least(formula: &mut CnfFormula, lits: &[Lit], k: isize) {
    if k <= 0 {
        return;
    }
    if k as usize > lits.len() {
        formula.add_clause(&[]);
        return;
    }
    for combo in lits.iter().copied().combinations(lits.len() - k as usize + 1) {
        formula.add_clause(&combo);
    }
}

fn satisfiable(base: &CnfFormula, extra: &CnfFormula) -> bool {
    let mut solver = Solver::new();
    solver.add_formula(base);
    solver.add_formula(extra);
    solver.solve().unwrap()
}

/// Plays a game from real clues and returns the agent together with the CNF
/// encoding of every clue it received.
fn play(dims: Dimensions, mines: usize, seed: u64) -> (KnowledgeAgent, CnfFormula) {
    let mut rng = StdRng::seed_from_u64(seed);
    let board = Board::new(dims, mines, &mut rng).unwrap();
    let mut selector = RandomSelector::new(rng);
    let mut agent = KnowledgeAgent::new(dims);
    let mut clues = CnfFormula::new();

    loop {
        let Some(cell) = agent
            .make_safe_move(&mut selector)
            .or_else(|| agent.make_random_move(&mut selector))
        else {
            break;
        };
        if board.is_mine(cell) {
            break;
        }
        let count = board.nearby_mines(cell);
        agent.record_clue(cell, count).unwrap();

        clues.add_clause(&[!mine(dims, cell)]);
        let neighbors: Vec<Lit> = dims.neighbors(cell).map(|n| mine(dims, n)).collect();
        at_most(&mut clues, &neighbors, count as isize);
        at_least(&mut clues, &neighbors, count as isize);
    }

    (agent, clues)
}

#[test]
fn test_deductions_are_entailed() {
    let dims = Dimensions::new(6, 6);
    for seed in 0..30 {
        let (agent, clues) = play(dims, 7, seed);
        assert!(satisfiable(&clues, &CnfFormula::new()));

        for &cell in agent.safes() {
            let mut extra = CnfFormula::new();
            extra.add_clause(&[mine(dims, cell)]);
            assert!(!satisfiable(&clues, &extra), "seed {seed}: {cell} may be a mine");
        }
        for &cell in agent.mines() {
            let mut extra = CnfFormula::new();
            extra.add_clause(&[!mine(dims, cell)]);
            assert!(!satisfiable(&clues, &extra), "seed {seed}: {cell} may be safe");
        }
    }
}

#[test]
fn test_sentences_are_entailed() {
    let dims = Dimensions::new(5, 7);
    for seed in 0..30 {
        let (agent, clues) = play(dims, 6, seed);

        for sentence in agent.knowledge() {
            let lits: Vec<Lit> = sentence.cells().iter().map(|&cell| mine(dims, cell)).collect();

            let mut fewer = CnfFormula::new();
            at_most(&mut fewer, &lits, sentence.count() - 1);
            assert!(!satisfiable(&clues, &fewer), "seed {seed}: {sentence} may hold fewer");

            let mut more = CnfFormula::new();
            at_least(&mut more, &lits, sentence.count() + 1);
            assert!(!satisfiable(&clues, &more), "seed {seed}: {sentence} may hold more");
        }
    }
}

#[test]
fn test_subset_resolution_is_sound() {
    // {A, B, C} = 1 from (1,1) and {A, B} = 1 from (1,0); the derived C = 0
    // must follow from the two clues alone
    let dims = Dimensions::new(2, 3);
    let mut agent = KnowledgeAgent::new(dims);
    agent.mark_safe(Cell::new(1, 0)).unwrap();
    agent.mark_safe(Cell::new(1, 2)).unwrap();
    agent.record_clue(Cell::new(1, 1), 1).unwrap();
    agent.record_clue(Cell::new(1, 0), 1).unwrap();
    assert!(agent.safes().contains(&Cell::new(0, 2)));

    let top = [Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)].map(|c| mine(dims, c));
    let mut clues = CnfFormula::new();
    at_most(&mut clues, &top, 1);
    at_least(&mut clues, &top, 1);
    at_most(&mut clues, &top[..2], 1);
    at_least(&mut clues, &top[..2], 1);

    let mut c_is_mine = CnfFormula::new();
    c_is_mine.add_clause(&[top[2]]);
    assert!(!satisfiable(&clues, &c_is_mine));
    assert_eq!(agent.make_safe_move(&mut FirstCandidate), Some(Cell::new(0, 2)));
}
