//! Builder for `MazeSolver`.
//!
//! All four collaborators are required; `try_build()` reports the first
//! missing one as a typed `BuildError`. The random source is seedable so
//! tie-breaking can be replayed in tests.

use maze_traits::{FinishDetector, Motors, Outputs, WallDetector};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{BuildError, Result};
use crate::solver::MazeSolver;
use crate::strategy::ExplorationStrategy;

pub struct MazeSolverBuilder<S> {
    strategy: S,
    motors: Option<Box<dyn Motors>>,
    walls: Option<Box<dyn WallDetector>>,
    finish: Option<Box<dyn FinishDetector>>,
    outputs: Option<Box<dyn Outputs>>,
    seed: Option<u64>,
}

impl<S: ExplorationStrategy> MazeSolverBuilder<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            motors: None,
            walls: None,
            finish: None,
            outputs: None,
            seed: None,
        }
    }

    pub fn with_motors(mut self, motors: impl Motors + 'static) -> Self {
        self.motors = Some(Box::new(motors));
        self
    }

    pub fn with_wall_detector(mut self, walls: impl WallDetector + 'static) -> Self {
        self.walls = Some(Box::new(walls));
        self
    }

    pub fn with_finish_detector(mut self, finish: impl FinishDetector + 'static) -> Self {
        self.finish = Some(Box::new(finish));
        self
    }

    pub fn with_outputs(mut self, outputs: impl Outputs + 'static) -> Self {
        self.outputs = Some(Box::new(outputs));
        self
    }

    /// Deterministic tie-breaking. Without a seed the rng is seeded from entropy.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn try_build(self) -> Result<MazeSolver<S>> {
        let motors = self
            .motors
            .ok_or_else(|| eyre::Report::new(BuildError::MissingMotors))?;
        let walls = self
            .walls
            .ok_or_else(|| eyre::Report::new(BuildError::MissingWallDetector))?;
        let finish = self
            .finish
            .ok_or_else(|| eyre::Report::new(BuildError::MissingFinishDetector))?;
        let outputs = self
            .outputs
            .ok_or_else(|| eyre::Report::new(BuildError::MissingOutputs))?;
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(MazeSolver {
            motors,
            walls,
            finish,
            outputs,
            strategy: self.strategy,
            rng,
            moves: 0,
        })
    }
}
