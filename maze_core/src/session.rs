//! Bounded driver loop around `MazeSolver`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use maze_traits::NotificationLevel;

use crate::config::SessionCfg;
use crate::error::Result;
use crate::solver::MazeSolver;
use crate::status::{MoveStatus, SessionOutcome};
use crate::strategy::ExplorationStrategy;

/// Calls `next_move` until the finish is reached, the move budget is spent
/// or the stop flag is raised.
#[derive(Debug)]
pub struct MazeSolvingSession<S> {
    solver: MazeSolver<S>,
    cfg: SessionCfg,
    stop: Option<Arc<AtomicBool>>,
}

impl<S: ExplorationStrategy> MazeSolvingSession<S> {
    pub fn new(solver: MazeSolver<S>, cfg: SessionCfg) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            solver,
            cfg,
            stop: None,
        })
    }

    /// Cooperative stop flag, checked before every move.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|s| s.load(Ordering::Relaxed))
    }

    /// Drive the solver. Exhausting the budget is reported through an
    /// ERROR notification and returned as `SessionOutcome::Exhausted`;
    /// only collaborator failures are returned as `Err`.
    pub fn run(&mut self) -> Result<SessionOutcome> {
        let max_moves = self.cfg.max_moves;
        tracing::info!(max_moves, "maze solving started");

        for _ in 0..max_moves {
            if self.stop_requested() {
                let moves = self.solver.moves();
                tracing::info!(moves, "maze solving cancelled");
                return Ok(SessionOutcome::Cancelled { moves });
            }
            if self.solver.next_move()? == MoveStatus::Finished {
                return Ok(SessionOutcome::Finished {
                    moves: self.solver.moves(),
                });
            }
        }

        tracing::error!(max_moves, "move budget exhausted without reaching the finish");
        self.solver.notify(
            NotificationLevel::Error,
            &format!("Maze not solved: gave up after {max_moves} moves"),
        );
        Ok(SessionOutcome::Exhausted {
            moves: self.solver.moves(),
        })
    }

    pub fn solver(&self) -> &MazeSolver<S> {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut MazeSolver<S> {
        &mut self.solver
    }

    pub fn into_solver(self) -> MazeSolver<S> {
        self.solver
    }
}
