//! CLI argument definitions and shared statics.

use clap::{ArgAction, Args, Parser, Subcommand};
use maze_core::StrategyKind;
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "mazebot", version, about = "Autonomous maze robot (grid simulator)")]
pub struct Cli {
    /// Path to config TOML (typed); built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log as JSON lines instead of pretty, and print results as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); falls back to
    /// `[logging].level`, then `info`. `RUST_LOG` overrides both.
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Overrides shared by `solve` and `stats`; each takes precedence over the config.
#[derive(Args, Debug, Clone, Default)]
pub struct RunOverrides {
    /// Built-in maze (simple_2x2 | simple_3x3 | maze_6x6)
    #[arg(long, value_name = "NAME", conflicts_with = "maze_file")]
    pub maze: Option<String>,

    /// Maze layout CSV (x,y,x_plus,x_minus,y_plus,y_minus,is_start,is_finish)
    #[arg(long, value_name = "FILE")]
    pub maze_file: Option<PathBuf>,

    /// Exploration strategy (random | curious)
    #[arg(long, value_name = "NAME")]
    pub strategy: Option<StrategyKind>,

    /// Give up after this many forward moves
    #[arg(long, value_name = "N")]
    pub max_moves: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve one maze in the grid simulator
    Solve {
        #[command(flatten)]
        overrides: RunOverrides,
        /// Seed for tie-breaking (replayable runs)
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,
    },
    /// Repeat simulated solves and report move statistics
    Stats {
        #[command(flatten)]
        overrides: RunOverrides,
        /// Number of runs
        #[arg(long, value_name = "N", default_value_t = 100)]
        runs: u32,
        /// First seed; run i uses seed + i
        #[arg(long, value_name = "SEED", default_value_t = 0)]
        seed: u64,
    },
    /// Check config, mazes, sampling and the correction path without hardware
    SelfCheck,
}
