//! Subcommand bodies: config mapping, simulator assembly and result printing.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use eyre::WrapErr;
use maze_core::error::MazeError;
use maze_core::{
    CorrectingMotors, CorrectionCfg, DistanceWallDetector, MotionCfg, PositionCorrector, Sampler,
    SamplingCfg, SessionOutcome, WallDetectorCfg,
};
use maze_sim::{Maze, SimulatedDrive, SimulationOptions, SolveReport, SolveStats};
use maze_traits::{DistanceSensors, DistanceSnapshot, Gyro, MonotonicClock, Motors, WallDetector};
use serde_json::json;

use crate::cli::RunOverrides;

fn timestamp_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

/// Apply CLI overrides on top of the file config and pick the maze.
fn prepare(
    cfg: &maze_config::Config,
    overrides: &RunOverrides,
) -> eyre::Result<(Maze, SimulationOptions)> {
    let mut sim = cfg.simulation.clone();
    if let Some(name) = &overrides.maze {
        sim.maze = name.clone();
        sim.maze_file = None;
    }
    if let Some(path) = &overrides.maze_file {
        sim.maze_file = Some(path.clone());
    }
    let maze = maze_sim::maze_from_config(&sim)?;

    let mut opts = SimulationOptions::from_config(cfg);
    if let Some(kind) = overrides.strategy {
        opts.strategy = kind;
    }
    if let Some(n) = overrides.max_moves {
        opts.session.max_moves = n;
    }
    Ok((maze, opts))
}

fn outcome_name(outcome: &SessionOutcome) -> &'static str {
    match outcome {
        SessionOutcome::Finished { .. } => "finished",
        SessionOutcome::Exhausted { .. } => "exhausted",
        SessionOutcome::Cancelled { .. } => "cancelled",
    }
}

fn print_report(report: &SolveReport, json_mode: bool) {
    if json_mode {
        let line = json!({
            "timestamp": timestamp_ms(),
            "maze": report.maze,
            "strategy": report.strategy.to_string(),
            "seed": report.seed,
            "outcome": outcome_name(&report.outcome),
            "moves": report.moves,
            "motion_time_s": report.motion_time_s,
            "visited": report.visited,
            "dead_ends": report.dead_ends,
        });
        println!("{line}");
    } else {
        println!(
            "{}: {} ({} strategy, {} moves, {:.1} s of motion)",
            report.maze,
            report.outcome,
            report.strategy,
            report.moves,
            report.motion_time_s
        );
    }
}

pub fn run_solve(
    cfg: &maze_config::Config,
    overrides: &RunOverrides,
    seed: Option<u64>,
    json_mode: bool,
    stop: Arc<AtomicBool>,
) -> eyre::Result<()> {
    let (maze, mut opts) = prepare(cfg, overrides)?;
    if seed.is_some() {
        opts.seed = seed;
    }
    tracing::info!(maze = maze.name(), strategy = %opts.strategy, seed = ?opts.seed, "solve start");
    let report = maze_sim::simulate(&maze, &opts, Some(stop))?;
    print_report(&report, json_mode);

    match report.outcome {
        SessionOutcome::Finished { .. } => Ok(()),
        SessionOutcome::Exhausted { .. } => Err(MazeError::Exhausted {
            max_moves: opts.session.max_moves,
        }
        .into()),
        SessionOutcome::Cancelled { .. } => Err(MazeError::Cancelled.into()),
    }
}

fn print_stats(maze: &Maze, opts: &SimulationOptions, stats: &SolveStats, json_mode: bool) {
    if json_mode {
        let line = json!({
            "timestamp": timestamp_ms(),
            "maze": maze.name(),
            "strategy": opts.strategy.to_string(),
            "runs": stats.runs,
            "finished": stats.finished,
            "success_rate": stats.success_rate(),
            "min_moves": stats.min_moves,
            "avg_moves": stats.mean_moves,
            "max_moves": stats.max_moves,
            "avg_motion_time_s": stats.mean_motion_time_s,
        });
        println!("{line}");
    } else {
        println!(
            "{} ({} strategy): {}/{} finished ({:.1}%)",
            maze.name(),
            opts.strategy,
            stats.finished,
            stats.runs,
            stats.success_rate() * 100.0
        );
        println!(
            "moves min/avg/max: {}/{:.1}/{}  avg motion time: {:.1} s",
            stats.min_moves, stats.mean_moves, stats.max_moves, stats.mean_motion_time_s
        );
    }
}

pub fn run_stats(
    cfg: &maze_config::Config,
    overrides: &RunOverrides,
    runs: u32,
    seed: u64,
    json_mode: bool,
    stop: Arc<AtomicBool>,
) -> eyre::Result<()> {
    let (maze, opts) = prepare(cfg, overrides)?;
    tracing::info!(maze = maze.name(), strategy = %opts.strategy, runs, seed, "stats start");
    let stats = maze_sim::simulate_many(&maze, &opts, runs, seed, Some(stop.clone()))?;
    print_stats(&maze, &opts, &stats, json_mode);
    if stats.runs < runs && stop.load(std::sync::atomic::Ordering::Relaxed) {
        return Err(MazeError::Cancelled.into());
    }
    Ok(())
}

/// Exercise everything a real run needs except the hardware itself.
pub fn run_self_check(cfg: &maze_config::Config, json_mode: bool) -> eyre::Result<()> {
    for name in maze_sim::BUILTIN_NAMES {
        Maze::builtin(name)?;
    }
    let maze = maze_sim::maze_from_config(&cfg.simulation)?;

    // Sampled distances drive the wall detector.
    let correction: CorrectionCfg = (&cfg.correction).into();
    let sampling: SamplingCfg = (&cfg.sampling).into();
    let walls_cfg: WallDetectorCfg = (&cfg.walls).into();
    let drive = SimulatedDrive::new(&correction);
    let expected = DistanceSnapshot::new(3.0, 20.0, 3.0);
    drive.set_distances(expected);
    let period = Duration::from_millis(sampling.period_ms);
    let (distance_sampler, distances) =
        Sampler::spawn_distances(drive.clone(), period, MonotonicClock::new());
    let (gyro_sampler, gyro) = Sampler::spawn_gyro(drive.clone(), period, MonotonicClock::new());
    let deadline = std::time::Instant::now() + period * 20;
    while distances.distances() != expected && std::time::Instant::now() < deadline {
        std::thread::sleep(period);
    }
    if distances.distances() != expected {
        eyre::bail!("distance sampler published no readings within {:?}", period * 20);
    }
    let mut walls = DistanceWallDetector::new(distances.clone(), &walls_cfg)?;
    let sensed = (
        walls.is_left_blocked(),
        walls.is_front_blocked(),
        walls.is_right_blocked(),
    );
    tracing::debug!(?sensed, heading = gyro.orientation(), "sampled walls");
    drop(distance_sampler);
    drop(gyro_sampler);

    // One corrected square and a slipping turn on the simulated drive.
    let motion: MotionCfg = (&cfg.motion).into();
    let corrector = PositionCorrector::new(correction)?;
    let slipping = SimulatedDrive::new(corrector.config()).with_spin_gain(0.9);
    let mut motors = CorrectingMotors::new(
        slipping.clone(),
        slipping.clone(),
        slipping.clone(),
        corrector,
        MotionCfg {
            settle_ms: 0,
            ..motion
        },
        Arc::new(MonotonicClock::new()),
    )?
    .with_seed(0);
    motors
        .move_forward()
        .map_err(|e| eyre::eyre!("simulated forward move failed: {e}"))?;
    motors
        .turn_right()
        .map_err(|e| eyre::eyre!("simulated right turn failed: {e}"))?;
    let heading = slipping.heading_deg();
    let tolerance = cfg.correction.turn_angle_tolerance_deg;
    if (heading - cfg.correction.ideal_side_turn_angle_deg).abs() > tolerance {
        eyre::bail!("corrected right turn ended at {heading:.1} deg");
    }

    if json_mode {
        println!(
            "{}",
            json!({
                "status": "ok",
                "maze": maze.name(),
                "walls": { "left": sensed.0, "front": sensed.1, "right": sensed.2 },
                "corrected_heading_deg": heading,
            })
        );
    } else {
        println!("self-check ok (maze '{}', corrected turn {heading:.1} deg)", maze.name());
    }
    Ok(())
}

/// Read, parse and validate the config; defaults when no path is given.
pub fn load_config(path: Option<&std::path::Path>) -> eyre::Result<maze_config::Config> {
    let cfg = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .wrap_err_with(|| format!("reading config {}", p.display()))?;
            maze_config::load_toml(&text)
                .wrap_err_with(|| format!("parsing config {}", p.display()))?
        }
        None => maze_config::Config::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}
