//! The decision engine: one `next_move` is one complete transition.

use eyre::WrapErr;
use maze_traits::{FinishDetector, Motors, NotificationLevel, Outputs, WallDetector};
use rand::rngs::StdRng;

use crate::builder::MazeSolverBuilder;
use crate::direction::{Openings, Turn};
use crate::error::Result;
use crate::hw_error::hw;
use crate::status::MoveStatus;
use crate::strategy::ExplorationStrategy;

pub struct MazeSolver<S> {
    pub(crate) motors: Box<dyn Motors>,
    pub(crate) walls: Box<dyn WallDetector>,
    pub(crate) finish: Box<dyn FinishDetector>,
    pub(crate) outputs: Box<dyn Outputs>,
    pub(crate) strategy: S,
    pub(crate) rng: StdRng,
    pub(crate) moves: u32,
}

impl<S> core::fmt::Debug for MazeSolver<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MazeSolver")
            .field("moves", &self.moves)
            .finish_non_exhaustive()
    }
}

impl<S: ExplorationStrategy> MazeSolver<S> {
    /// Start building a solver around `strategy`.
    pub fn builder(strategy: S) -> MazeSolverBuilder<S> {
        MazeSolverBuilder::new(strategy)
    }

    /// Finish check, wall queries, turn, forward move.
    ///
    /// All three walls are queried before the strategy decides. Exactly one
    /// turn command (possibly `no_turn`) and one `move_forward` are issued
    /// unless the finish detector fires first.
    pub fn next_move(&mut self) -> Result<MoveStatus> {
        if self.finish.is_finish() {
            tracing::info!(moves = self.moves, "finish reached");
            self.outputs.notify(
                NotificationLevel::Info,
                &format!("Finish reached after {} moves", self.moves),
            );
            return Ok(MoveStatus::Finished);
        }

        let openings = Openings::from_blocked(
            self.walls.is_left_blocked(),
            self.walls.is_front_blocked(),
            self.walls.is_right_blocked(),
        );
        let turn = self.strategy.decide(openings, &mut self.rng);
        tracing::debug!(?openings, ?turn, "decided");

        self.execute_turn(turn)?;
        self.strategy.on_turn(turn);

        self.motors
            .move_forward()
            .map_err(hw)
            .wrap_err("move forward")?;
        self.strategy.on_move_forward();
        self.moves = self.moves.saturating_add(1);

        Ok(MoveStatus::Moved)
    }

    fn execute_turn(&mut self, turn: Turn) -> Result<()> {
        let res = match turn {
            Turn::None => self.motors.no_turn(),
            Turn::Left => self.motors.turn_left(),
            Turn::Right => self.motors.turn_right(),
            Turn::Back => self.motors.turn_back(),
        };
        res.map_err(hw).wrap_err_with(|| format!("turn {turn:?}"))
    }

    /// Forward moves completed since construction or the last reset.
    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn strategy_mut(&mut self) -> &mut S {
        &mut self.strategy
    }

    /// Send an operator notification through the configured outputs.
    pub fn notify(&mut self, level: NotificationLevel, message: &str) {
        self.outputs.notify(level, message);
    }

    /// Clear exploration memory and the move counter. The robot is assumed
    /// to have been placed back on the start cell.
    pub fn reset_to_start_and_forget_everything(&mut self) {
        self.strategy.reset();
        self.moves = 0;
    }
}
