//! Status values returned by the solver and the session driver.

use std::fmt;

/// Result of a single `MazeSolver::next_move` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    /// A turn (possibly none) and one forward move were executed.
    Moved,
    /// The finish detector fired; no motor command was issued.
    Finished,
}

/// How a `MazeSolvingSession::run` ended.
///
/// `moves` counts forward moves only. The `next_move` call that observes
/// the finish issues no motion and is not counted, so a run of four calls
/// ending in a finish reports three moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Finish reached after `moves` forward moves.
    Finished { moves: u32 },
    /// Move budget spent without reaching the finish.
    Exhausted { moves: u32 },
    /// Stop flag observed between moves.
    Cancelled { moves: u32 },
}

impl SessionOutcome {
    pub fn moves(&self) -> u32 {
        match *self {
            SessionOutcome::Finished { moves }
            | SessionOutcome::Exhausted { moves }
            | SessionOutcome::Cancelled { moves } => moves,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, SessionOutcome::Finished { .. })
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Finished { moves } => write!(f, "finished after {moves} moves"),
            SessionOutcome::Exhausted { moves } => write!(f, "gave up after {moves} moves"),
            SessionOutcome::Cancelled { moves } => write!(f, "cancelled after {moves} moves"),
        }
    }
}
