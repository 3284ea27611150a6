//! Grid simulator for the maze solver.
//!
//! A `SimulatedRobot` stands in for the real robot at the cell level; a
//! `SimulatedDrive` stands in for the wheels and sensors when the correction
//! path itself needs exercising.

pub mod drive;
pub mod error;
pub mod maze;
pub mod robot;
pub mod run;

pub use drive::SimulatedDrive;
pub use error::SimError;
pub use maze::{BUILTIN_NAMES, Maze, MazeSquare};
pub use robot::{MotionTimes, SimFinish, SimMotors, SimOutputs, SimWalls, SimulatedRobot};
pub use run::{SimulationOptions, SolveReport, SolveStats, simulate, simulate_many};

use eyre::WrapErr;

/// The maze named by the `[simulation]` section: a CSV layout when
/// `maze_file` is set, otherwise a built-in.
pub fn maze_from_config(sim: &maze_config::Simulation) -> eyre::Result<Maze> {
    match &sim.maze_file {
        Some(path) => {
            let rows = maze_config::load_maze_csv(path)?;
            let name = path
                .file_stem()
                .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
            Maze::from_rows(name, &rows)
                .wrap_err_with(|| format!("building maze from {}", path.display()))
        }
        None => Ok(Maze::builtin(&sim.maze)?),
    }
}
