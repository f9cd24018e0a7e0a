use thiserror::Error;

use crate::Cell;

/// Reasons the agent refuses a state update. A rejected update leaves the
/// agent exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("cell {0} is outside the board")]
    OutOfBounds(Cell),

    #[error("invalid clue {count} for cell {cell}: {reason}")]
    InvalidClue {
        cell: Cell,
        count: u8,
        reason: &'static str,
    },

    #[error("cell {0} is already known to be the opposite")]
    ConflictingMark(Cell),

    #[error("knowledge became contradictory: {0}")]
    Contradiction(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("{mines} mines do not fit on a board of {cells} cells")]
    TooManyMines { mines: usize, cells: usize },

    #[error("cell {0} is outside the board")]
    OutOfBounds(Cell),

    #[error("a {height}x{width} board has too many cells")]
    TooLarge { height: usize, width: usize },
}
