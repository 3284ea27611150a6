//! Solve a `Maze` end to end with the real solver and session driver.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use eyre::WrapErr;
use maze_core::{
    AnyStrategy, Direction, ExplorationCfg, ExplorationStrategy, MazeSolver, MazeSolvingSession,
    SessionCfg, SessionOutcome, StrategyKind,
};

use crate::maze::Maze;
use crate::robot::{MotionTimes, SimulatedRobot};

#[derive(Debug, Clone, Default)]
pub struct SimulationOptions {
    pub strategy: StrategyKind,
    /// `start` is replaced by the maze's own start square.
    pub exploration: ExplorationCfg,
    pub session: SessionCfg,
    pub times: MotionTimes,
    pub seed: Option<u64>,
}

impl SimulationOptions {
    pub fn from_config(cfg: &maze_config::Config) -> Self {
        Self {
            strategy: cfg.exploration.strategy.into(),
            exploration: (&cfg.exploration).into(),
            session: (&cfg.session).into(),
            times: (&cfg.simulation).into(),
            seed: cfg.exploration.seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub maze: String,
    pub strategy: StrategyKind,
    pub seed: Option<u64>,
    pub outcome: SessionOutcome,
    pub moves: u32,
    pub motion_time_s: f64,
    pub finished: bool,
    /// Cells the strategy remembers; `None` for strategies without memory.
    pub visited: Option<usize>,
    pub dead_ends: Option<usize>,
}

/// Run one session on `maze`. Cancellation through `stop` is reported as an
/// unfinished run, not an error.
pub fn simulate(
    maze: &Maze,
    opts: &SimulationOptions,
    stop: Option<Arc<AtomicBool>>,
) -> eyre::Result<SolveReport> {
    let facing: Direction = opts.exploration.start_direction;
    let robot = SimulatedRobot::new(maze.clone(), facing, opts.times);

    let mut exploration = opts.exploration.clone();
    exploration.start = maze.start().coordinate();
    exploration.validate()?;
    let strategy = AnyStrategy::new(opts.strategy, exploration);

    let mut builder = MazeSolver::builder(strategy)
        .with_motors(robot.motors())
        .with_wall_detector(robot.wall_detector())
        .with_finish_detector(robot.finish_detector())
        .with_outputs(robot.outputs());
    if let Some(seed) = opts.seed {
        builder = builder.with_seed(seed);
    }
    let solver = builder.try_build()?;

    let mut session = MazeSolvingSession::new(solver, opts.session.clone())?;
    if let Some(stop) = stop {
        session = session.with_stop_flag(stop);
    }
    let outcome = session
        .run()
        .wrap_err_with(|| format!("simulating maze '{}'", maze.name()))?;

    let memory = session.solver().strategy().exploration();
    let report = SolveReport {
        maze: maze.name().to_string(),
        strategy: opts.strategy,
        seed: opts.seed,
        outcome,
        moves: outcome.moves(),
        motion_time_s: robot.motion_time_s(),
        finished: outcome.is_finished() && robot.at_finish(),
        visited: memory.map(|m| m.visited_count()),
        dead_ends: memory.map(|m| m.dead_end_count()),
    };
    tracing::debug!(
        maze = %report.maze,
        moves = report.moves,
        motion_time_s = report.motion_time_s,
        finished = report.finished,
        "simulation done"
    );
    Ok(report)
}

/// Aggregate over repeated simulations with consecutive seeds.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveStats {
    pub runs: u32,
    pub finished: u32,
    /// Move counts over finished runs only; zero when none finished.
    pub min_moves: u32,
    pub max_moves: u32,
    pub mean_moves: f64,
    pub mean_motion_time_s: f64,
}

impl SolveStats {
    pub fn success_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            f64::from(self.finished) / f64::from(self.runs)
        }
    }
}

/// Seeds are `base_seed`, `base_seed + 1`, ... so a stats run is replayable.
pub fn simulate_many(
    maze: &Maze,
    opts: &SimulationOptions,
    runs: u32,
    base_seed: u64,
    stop: Option<Arc<AtomicBool>>,
) -> eyre::Result<SolveStats> {
    let mut finished_moves = Vec::new();
    let mut time_total = 0.0;
    let mut completed = 0u32;
    for i in 0..runs {
        if stop
            .as_ref()
            .is_some_and(|s| s.load(std::sync::atomic::Ordering::Relaxed))
        {
            break;
        }
        let run_opts = opts.clone().with_seed(base_seed.wrapping_add(u64::from(i)));
        let report = simulate(maze, &run_opts, stop.clone())?;
        completed += 1;
        if report.finished {
            finished_moves.push(report.moves);
            time_total += report.motion_time_s;
        }
    }

    let finished = u32::try_from(finished_moves.len()).unwrap_or(u32::MAX);
    let (min_moves, max_moves, mean_moves, mean_motion_time_s) = if finished_moves.is_empty() {
        (0, 0, 0.0, 0.0)
    } else {
        let sum: u64 = finished_moves.iter().map(|&m| u64::from(m)).sum();
        let n = f64::from(finished);
        (
            finished_moves.iter().copied().min().unwrap_or(0),
            finished_moves.iter().copied().max().unwrap_or(0),
            sum as f64 / n,
            time_total / n,
        )
    };
    Ok(SolveStats {
        runs: completed,
        finished,
        min_moves,
        max_moves,
        mean_moves,
        mean_motion_time_s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{maze_6x6, simple_2x2};

    #[test]
    fn options_follow_config() {
        let mut cfg = maze_config::Config::default();
        cfg.exploration.strategy = maze_config::Strategy::Random;
        cfg.exploration.seed = Some(9);
        cfg.session.max_moves = 50;
        cfg.simulation.forward_s = 2.0;
        let opts = SimulationOptions::from_config(&cfg);
        assert_eq!(opts.strategy, StrategyKind::Random);
        assert_eq!(opts.seed, Some(9));
        assert_eq!(opts.session.max_moves, 50);
        assert!((opts.times.forward_s - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn same_seed_same_report() {
        let opts = SimulationOptions::default().with_seed(42);
        let a = simulate(&maze_6x6(), &opts, None).expect("sim");
        let b = simulate(&maze_6x6(), &opts, None).expect("sim");
        assert_eq!(a, b);
    }

    #[test]
    fn stats_count_every_run() {
        let opts = SimulationOptions::default();
        let stats = simulate_many(&simple_2x2(), &opts, 5, 100, None).expect("stats");
        assert_eq!(stats.runs, 5);
        assert_eq!(stats.finished, 5);
        assert!(stats.min_moves >= 2);
        assert!(stats.min_moves <= stats.max_moves);
        assert!((stats.success_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_with_no_runs_are_empty() {
        let stats =
            simulate_many(&simple_2x2(), &SimulationOptions::default(), 0, 0, None).expect("stats");
        assert_eq!(stats.runs, 0);
        assert_eq!(stats.success_rate(), 0.0);
    }
}
