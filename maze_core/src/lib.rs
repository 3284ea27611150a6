#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core maze-solving logic (hardware-agnostic).
//!
//! This crate provides the decision engine and the position-correction loop.
//! All hardware interactions go through the `maze_traits` collaborator traits.
//!
//! ## Architecture
//!
//! - **Algebra**: compass/relative directions and grid cells (`direction`, `grid`)
//! - **Configuration**: runtime config structs with defaults (`config`)
//! - **Decision**: `MazeSolver` with pluggable `ExplorationStrategy` (`solver`, `strategy`)
//! - **Driver**: bounded `MazeSolvingSession` with cooperative cancellation (`session`)
//! - **Correction**: `PositionCorrector` and the `CorrectingMotors` adapter (`correction`, `motors`)
//! - **Sensing**: background `Sampler`s and `DistanceWallDetector` (`sampler`, `walls`)
//!
//! ## Units
//!
//! Distances are centimeters unless suffixed `_mm`. Gyro angles are degrees,
//! clockwise positive. Motor travel is in wheel rotations.

pub mod builder;
pub mod config;
pub mod conversions;
pub mod correction;
pub mod direction;
pub mod error;
pub mod grid;
pub mod hw_error;
pub mod mocks;
pub mod motors;
pub mod sampler;
pub mod session;
pub mod solver;
pub mod status;
pub mod strategy;
pub mod util;
pub mod walls;

pub use builder::MazeSolverBuilder;
pub use config::{
    CorrectionCfg, ExplorationCfg, MotionCfg, SamplingCfg, SessionCfg, WallDetectorCfg,
};
pub use correction::{Correction, CorrectionAction, PositionCorrector};
pub use direction::{Direction, Openings, Side, Turn};
pub use error::{BuildError, MazeError, Result};
pub use grid::{GridCoordinate, VisitedSquare, WalkedPath};
pub use motors::CorrectingMotors;
pub use sampler::{Sampler, SharedAngle, SharedDistances};
pub use session::MazeSolvingSession;
pub use solver::MazeSolver;
pub use status::{MoveStatus, SessionOutcome};
pub use strategy::{
    AnyStrategy, CuriousStrategy, ExplorationState, ExplorationStrategy, RandomStrategy,
    StrategyKind,
};
pub use walls::DistanceWallDetector;
