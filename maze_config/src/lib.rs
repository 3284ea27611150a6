#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and maze layout parsing for the maze robot.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//!   Every section is optional and falls back to documented defaults.
//! - The maze layout CSV loader enforces headers and checks the layout is
//!   usable (one start, at least one finish, no duplicate cells).
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Position-correction tunables. See `maze_core::config::CorrectionCfg`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Correction {
    pub wheel_diameter_mm: f64,
    pub wheelbase_width_mm: f64,
    pub ideal_distance_cm: f64,
    pub max_reliable_distance_cm: f64,
    pub distance_tolerance_cm: f64,
    pub move_forward_bad_angle_threshold_deg: f64,
    pub ideal_side_turn_angle_deg: f64,
    pub ideal_back_turn_angle_deg: f64,
    pub turn_angle_tolerance_deg: f64,
    pub min_angle_correction_deg: f64,
    pub side_nudge_deg: f64,
    pub correction_speed_rpm: f64,
    pub wall_hit_back_off_mm: f64,
    pub wall_hit_back_off_growth: f64,
    pub wall_hit_creep_mm: f64,
    pub wall_hit_creep_decay: f64,
    pub max_wall_hit_retries: u32,
}

impl Default for Correction {
    fn default() -> Self {
        Self {
            wheel_diameter_mm: 56.0,
            wheelbase_width_mm: 130.2,
            ideal_distance_cm: 3.0,
            max_reliable_distance_cm: 15.0,
            distance_tolerance_cm: 0.2,
            move_forward_bad_angle_threshold_deg: 15.0,
            ideal_side_turn_angle_deg: 90.0,
            ideal_back_turn_angle_deg: 180.0,
            turn_angle_tolerance_deg: 5.0,
            min_angle_correction_deg: 2.0,
            side_nudge_deg: 3.0,
            correction_speed_rpm: 20.0,
            wall_hit_back_off_mm: 20.0,
            wall_hit_back_off_growth: 1.1,
            wall_hit_creep_mm: 20.0,
            wall_hit_creep_decay: 0.9,
            max_wall_hit_retries: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Random,
    #[default]
    Curious,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    #[default]
    North,
    East,
    South,
    West,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Exploration {
    pub strategy: Strategy,
    pub prefer_non_dead_end_weight: f64,
    pub prefer_unvisited_weight: f64,
    pub prefer_closer_to_center_weight: f64,
    pub prefer_no_turns_weight: f64,
    /// Axis values spanning the goal region: `[8, 9]` means cells (8..=9, 8..=9).
    pub center_coordinates: Vec<i32>,
    /// Start cell `[x, y]`.
    pub start: [i32; 2],
    pub start_direction: Heading,
    /// Seed for tie-breaking; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for Exploration {
    fn default() -> Self {
        Self {
            strategy: Strategy::Curious,
            prefer_non_dead_end_weight: 10.0,
            prefer_unvisited_weight: 2.0,
            prefer_closer_to_center_weight: 3.0,
            prefer_no_turns_weight: 1.0,
            center_coordinates: vec![8, 9],
            start: [1, 1],
            start_direction: Heading::North,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Session {
    pub max_moves: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self { max_moves: 9999 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Motion {
    pub square_length_mm: f64,
    pub move_speed_rpm: f64,
    pub turn_speed_rpm: f64,
    pub settle_ms: u64,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            square_length_mm: 180.0,
            move_speed_rpm: 35.0,
            turn_speed_rpm: 50.0,
            settle_ms: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Walls {
    pub blocked_threshold_cm: f64,
}

impl Default for Walls {
    fn default() -> Self {
        Self {
            blocked_threshold_cm: 8.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Sampling {
    /// Sensor polling period. Also accepts alias "period".
    #[serde(alias = "period")]
    pub period_ms: u64,
}

impl Default for Sampling {
    fn default() -> Self {
        Self { period_ms: 100 }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Grid simulator settings used by `mazebot solve`/`stats`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Simulation {
    /// Built-in layout name, ignored when `maze_file` is set.
    pub maze: String,
    /// CSV layout file; see [`load_maze_csv`].
    pub maze_file: Option<PathBuf>,
    pub forward_s: f64,
    pub side_turn_s: f64,
    pub back_turn_s: f64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            maze: "maze_6x6".to_string(),
            maze_file: None,
            forward_s: 1.1,
            side_turn_s: 0.9,
            back_turn_s: 1.7,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Config {
    pub correction: Correction,
    pub exploration: Exploration,
    pub session: Session,
    pub motion: Motion,
    pub walls: Walls,
    pub sampling: Sampling,
    pub logging: Logging,
    pub simulation: Simulation,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Correction
        let c = &self.correction;
        if !positive(c.wheel_diameter_mm) {
            eyre::bail!("correction.wheel_diameter_mm must be > 0");
        }
        if !positive(c.wheelbase_width_mm) {
            eyre::bail!("correction.wheelbase_width_mm must be > 0");
        }
        if c.ideal_distance_cm < 0.0 {
            eyre::bail!("correction.ideal_distance_cm must be >= 0");
        }
        if !positive(c.max_reliable_distance_cm) {
            eyre::bail!("correction.max_reliable_distance_cm must be > 0");
        }
        if c.ideal_distance_cm >= c.max_reliable_distance_cm {
            eyre::bail!("correction.ideal_distance_cm must be below max_reliable_distance_cm");
        }
        if !positive(c.move_forward_bad_angle_threshold_deg) {
            eyre::bail!("correction.move_forward_bad_angle_threshold_deg must be > 0");
        }
        if !positive(c.ideal_side_turn_angle_deg) || !positive(c.ideal_back_turn_angle_deg) {
            eyre::bail!("correction ideal turn angles must be > 0");
        }
        if c.turn_angle_tolerance_deg < 0.0 || c.min_angle_correction_deg < 0.0 {
            eyre::bail!("correction angle tolerances must be >= 0");
        }
        if !positive(c.correction_speed_rpm) {
            eyre::bail!("correction.correction_speed_rpm must be > 0");
        }
        if !positive(c.wall_hit_back_off_mm) || !positive(c.wall_hit_creep_mm) {
            eyre::bail!("correction wall-hit distances must be > 0");
        }
        if c.max_wall_hit_retries > 20 {
            eyre::bail!("correction.max_wall_hit_retries is unreasonably large (>20)");
        }

        // Exploration
        if self.exploration.center_coordinates.is_empty() {
            eyre::bail!("exploration.center_coordinates must not be empty");
        }

        // Session
        if self.session.max_moves == 0 {
            eyre::bail!("session.max_moves must be >= 1");
        }

        // Motion
        if !positive(self.motion.square_length_mm) {
            eyre::bail!("motion.square_length_mm must be > 0");
        }
        if !positive(self.motion.move_speed_rpm) || !positive(self.motion.turn_speed_rpm) {
            eyre::bail!("motion speeds must be > 0");
        }

        // Walls
        if !positive(self.walls.blocked_threshold_cm) {
            eyre::bail!("walls.blocked_threshold_cm must be > 0");
        }

        // Sampling
        if self.sampling.period_ms == 0 {
            eyre::bail!("sampling.period_ms must be >= 1");
        }

        // Simulation
        let s = &self.simulation;
        if s.forward_s < 0.0 || s.side_turn_s < 0.0 || s.back_turn_s < 0.0 {
            eyre::bail!("simulation motion times must be >= 0");
        }

        Ok(())
    }
}

/// Maze layout CSV schema: one row per cell, `true` where that side is open.
///
/// Expected headers:
/// x,y,x_plus,x_minus,y_plus,y_minus,is_start,is_finish
///
/// Example:
/// x,y,x_plus,x_minus,y_plus,y_minus,is_start,is_finish
/// 1,1,false,false,true,false,true,false
/// 1,2,false,false,false,true,false,true
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MazeSquareRow {
    pub x: i32,
    pub y: i32,
    pub x_plus: bool,
    pub x_minus: bool,
    pub y_plus: bool,
    pub y_minus: bool,
    pub is_start: bool,
    pub is_finish: bool,
}

const MAZE_HEADERS: [&str; 8] = [
    "x", "y", "x_plus", "x_minus", "y_plus", "y_minus", "is_start", "is_finish",
];

/// Parse a maze layout from any reader. `origin` is only used in messages.
pub fn read_maze_csv<R: std::io::Read>(reader: R, origin: &str) -> eyre::Result<Vec<MazeSquareRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {}: {}", origin, e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != MAZE_HEADERS {
        eyre::bail!(
            "maze CSV must have headers '{}', got: {}",
            MAZE_HEADERS.join(","),
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<MazeSquareRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }

    validate_maze_rows(&rows)?;
    Ok(rows)
}

pub fn load_maze_csv(path: &Path) -> eyre::Result<Vec<MazeSquareRow>> {
    let file = std::fs::File::open(path)
        .map_err(|e| eyre::eyre!("open maze CSV {:?}: {}", path, e))?;
    read_maze_csv(file, &path.display().to_string())
}

fn validate_maze_rows(rows: &[MazeSquareRow]) -> eyre::Result<()> {
    if rows.is_empty() {
        eyre::bail!("maze layout has no squares");
    }
    let mut seen = HashSet::new();
    for r in rows {
        if !seen.insert((r.x, r.y)) {
            eyre::bail!("maze layout lists square ({}, {}) twice", r.x, r.y);
        }
    }
    let starts = rows.iter().filter(|r| r.is_start).count();
    if starts != 1 {
        eyre::bail!("maze layout must have exactly one start square, got {starts}");
    }
    if !rows.iter().any(|r| r.is_finish) {
        eyre::bail!("maze layout has no finish square");
    }
    Ok(())
}
