use anyhow::Context;
use tracing::info;

use crate::{Board, Cell, KnowledgeAgent, MoveSelector};

/// Represents the current state of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// What a single turn did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Revealed a cell the agent had deduced to be safe.
    Safe(Cell),
    /// Revealed an undetermined cell and survived.
    Guess(Cell),
    /// Revealed a mine.
    Exploded(Cell),
    /// No cell was left to play.
    Stuck,
}

/// Drives an agent against a board: the agent picks a cell, the board
/// answers with a clue, and the agent's known mines are flagged.
pub struct Game {
    board: Board,
    agent: KnowledgeAgent,
    state: GameState,
    moves: usize,
}

impl Game {
    pub fn new(board: Board) -> Self {
        let agent = KnowledgeAgent::new(board.dimensions());
        Game {
            board,
            agent,
            state: GameState::Playing,
            moves: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn agent(&self) -> &KnowledgeAgent {
        &self.agent
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Number of cells revealed so far, including a fatal one.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Plays one move: a known safe cell if there is one, a guess otherwise.
    pub fn step<S>(&mut self, selector: &mut S) -> anyhow::Result<Step>
    where
        S: MoveSelector + ?Sized,
    {
        if self.state != GameState::Playing {
            anyhow::bail!("game_ended");
        }

        let (cell, guessed) = match self.agent.make_safe_move(selector) {
            Some(cell) => (cell, false),
            None => match self.agent.make_random_move(selector) {
                Some(cell) => (cell, true),
                None => return Ok(Step::Stuck),
            },
        };

        self.moves += 1;
        if self.board.is_mine(cell) {
            info!(%cell, "hit a mine");
            self.state = GameState::Lost;
            return Ok(Step::Exploded(cell));
        }

        let count = self.board.nearby_mines(cell);
        info!(%cell, count, guessed, "revealed");
        self.agent
            .record_clue(cell, count)
            .with_context(|| format!("recording clue {count} for {cell}"))?;

        for &mine in self.agent.mines() {
            self.board.flag(mine)?;
        }

        if self.board.won() || self.all_safe_cells_revealed() {
            info!(moves = self.agent.moves_made().len(), "all mines found");
            self.state = GameState::Won;
        }

        Ok(if guessed {
            Step::Guess(cell)
        } else {
            Step::Safe(cell)
        })
    }

    /// Steps until the game is decided or no move is left.
    pub fn play<S>(&mut self, selector: &mut S) -> anyhow::Result<GameState>
    where
        S: MoveSelector + ?Sized,
    {
        while self.state == GameState::Playing {
            if self.step(selector)? == Step::Stuck {
                break;
            }
        }
        Ok(self.state)
    }

    fn all_safe_cells_revealed(&self) -> bool {
        self.agent.moves_made().len() == self.board.dimensions().len() - self.board.mine_count()
    }
}
