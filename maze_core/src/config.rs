//! Configuration types for the maze-solving engine.
//!
//! These are the runtime configuration structs consumed by the corrector,
//! the solver and the session driver. They are separate from the
//! TOML-deserialized config in `maze_config`; see `conversions`.

use crate::direction::Direction;
use crate::error::{Result, invalid};
use crate::grid::GridCoordinate;

/// Tunables for `PositionCorrector`.
///
/// Angles are degrees, distances centimeters unless the name says `_mm`.
#[derive(Debug, Clone)]
pub struct CorrectionCfg {
    /// Drive wheel diameter. Must be > 0.
    pub wheel_diameter_mm: f64,
    /// Distance between the two drive wheels. Must be > 0.
    pub wheelbase_width_mm: f64,
    /// Target distance to a wall the robot is facing or running alongside.
    pub ideal_distance_cm: f64,
    /// Readings above this are treated as "no wall in range" and never corrected against.
    pub max_reliable_distance_cm: f64,
    /// Front offsets closer than this to the ideal distance are left alone.
    pub distance_tolerance_cm: f64,
    /// Gyro change during a straight move above which a wall hit is assumed.
    pub move_forward_bad_angle_threshold_deg: f64,
    pub ideal_side_turn_angle_deg: f64,
    pub ideal_back_turn_angle_deg: f64,
    /// Accepted deviation from the ideal turn angle.
    pub turn_angle_tolerance_deg: f64,
    /// Smallest rotation issued when finishing an under-rotated turn.
    pub min_angle_correction_deg: f64,
    /// Fixed rotation applied when the robot drifts toward a side wall.
    pub side_nudge_deg: f64,
    /// Wheel speed used for every compensating micro-move.
    pub correction_speed_rpm: f64,
    /// Distance backed away from a wall on the first recovery attempt.
    pub wall_hit_back_off_mm: f64,
    /// Per-retry multiplier for the back-off distance (>= 1 grows it).
    pub wall_hit_back_off_growth: f64,
    /// Distance crept forward again after re-aligning.
    pub wall_hit_creep_mm: f64,
    /// Per-retry multiplier for the creep distance (<= 1 shrinks it).
    pub wall_hit_creep_decay: f64,
    /// Extra recovery maneuvers allowed after the first one.
    pub max_wall_hit_retries: u32,
}

impl Default for CorrectionCfg {
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

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

impl CorrectionCfg {
    pub fn validate(&self) -> Result<()> {
        if !positive(self.wheel_diameter_mm) {
            return Err(invalid("wheel_diameter_mm must be > 0"));
        }
        if !positive(self.wheelbase_width_mm) {
            return Err(invalid("wheelbase_width_mm must be > 0"));
        }
        if !non_negative(self.ideal_distance_cm) {
            return Err(invalid("ideal_distance_cm must be >= 0"));
        }
        if !positive(self.max_reliable_distance_cm) {
            return Err(invalid("max_reliable_distance_cm must be > 0"));
        }
        if !non_negative(self.distance_tolerance_cm) {
            return Err(invalid("distance_tolerance_cm must be >= 0"));
        }
        if !positive(self.move_forward_bad_angle_threshold_deg) {
            return Err(invalid("move_forward_bad_angle_threshold_deg must be > 0"));
        }
        if !positive(self.ideal_side_turn_angle_deg) || !positive(self.ideal_back_turn_angle_deg) {
            return Err(invalid("ideal turn angles must be > 0"));
        }
        if !non_negative(self.turn_angle_tolerance_deg) {
            return Err(invalid("turn_angle_tolerance_deg must be >= 0"));
        }
        if !non_negative(self.min_angle_correction_deg) || !non_negative(self.side_nudge_deg) {
            return Err(invalid("correction angles must be >= 0"));
        }
        if !positive(self.correction_speed_rpm) {
            return Err(invalid("correction_speed_rpm must be > 0"));
        }
        if !positive(self.wall_hit_back_off_mm) || !positive(self.wall_hit_creep_mm) {
            return Err(invalid("wall-hit distances must be > 0"));
        }
        if !positive(self.wall_hit_back_off_growth) || !positive(self.wall_hit_creep_decay) {
            return Err(invalid("wall-hit scaling factors must be > 0"));
        }
        Ok(())
    }
}

/// Weights and goal region for the curious exploration strategy.
#[derive(Debug, Clone)]
pub struct ExplorationCfg {
    pub prefer_non_dead_end_weight: f64,
    pub prefer_unvisited_weight: f64,
    pub prefer_closer_to_center_weight: f64,
    pub prefer_no_turns_weight: f64,
    /// Cells forming the assumed goal region; proximity is the Chebyshev
    /// distance to the nearest one.
    pub center_cells: Vec<GridCoordinate>,
    pub start: GridCoordinate,
    pub start_direction: Direction,
}

/// Goal region spanned by every pair of the given axis values, e.g. `[8, 9]`
/// yields the four cells (8,8), (8,9), (9,8), (9,9).
pub fn center_square(axis_values: &[i32]) -> Vec<GridCoordinate> {
    axis_values
        .iter()
        .flat_map(|x| axis_values.iter().map(move |y| GridCoordinate::new(*x, *y)))
        .collect()
}

impl Default for ExplorationCfg {
    fn default() -> Self {
        Self {
            prefer_non_dead_end_weight: 10.0,
            prefer_unvisited_weight: 2.0,
            prefer_closer_to_center_weight: 3.0,
            prefer_no_turns_weight: 1.0,
            center_cells: center_square(&[8, 9]),
            start: GridCoordinate::new(1, 1),
            start_direction: Direction::North,
        }
    }
}

impl ExplorationCfg {
    pub fn validate(&self) -> Result<()> {
        let weights = [
            self.prefer_non_dead_end_weight,
            self.prefer_unvisited_weight,
            self.prefer_closer_to_center_weight,
            self.prefer_no_turns_weight,
        ];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(invalid("exploration weights must be finite"));
        }
        if self.center_cells.is_empty() {
            return Err(invalid("center_cells must not be empty"));
        }
        Ok(())
    }
}

/// Bounded-execution settings for `MazeSolvingSession`.
#[derive(Debug, Clone)]
pub struct SessionCfg {
    pub max_moves: u32,
}

impl Default for SessionCfg {
    fn default() -> Self {
        Self { max_moves: 9999 }
    }
}

impl SessionCfg {
    pub fn validate(&self) -> Result<()> {
        if self.max_moves == 0 {
            return Err(invalid("max_moves must be >= 1"));
        }
        Ok(())
    }
}

/// Primary, cell-sized motions issued by `CorrectingMotors`.
#[derive(Debug, Clone)]
pub struct MotionCfg {
    pub square_length_mm: f64,
    pub move_speed_rpm: f64,
    pub turn_speed_rpm: f64,
    /// Pause after a motion before the "after" snapshot is taken, so the
    /// samplers have published at least one post-motion reading.
    pub settle_ms: u64,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            square_length_mm: 180.0,
            move_speed_rpm: 35.0,
            turn_speed_rpm: 50.0,
            settle_ms: 100,
        }
    }
}

impl MotionCfg {
    pub fn validate(&self) -> Result<()> {
        if !positive(self.square_length_mm) {
            return Err(invalid("square_length_mm must be > 0"));
        }
        if !positive(self.move_speed_rpm) || !positive(self.turn_speed_rpm) {
            return Err(invalid("motion speeds must be > 0"));
        }
        Ok(())
    }
}

/// Threshold-based wall detection.
#[derive(Debug, Clone)]
pub struct WallDetectorCfg {
    /// A side is blocked when its distance reading is below this.
    pub blocked_threshold_cm: f64,
}

impl Default for WallDetectorCfg {
    fn default() -> Self {
        Self {
            blocked_threshold_cm: 8.0,
        }
    }
}

impl WallDetectorCfg {
    pub fn validate(&self) -> Result<()> {
        if !positive(self.blocked_threshold_cm) {
            return Err(invalid("blocked_threshold_cm must be > 0"));
        }
        Ok(())
    }
}

/// Background sensor sampling.
#[derive(Debug, Clone)]
pub struct SamplingCfg {
    pub period_ms: u64,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self { period_ms: 100 }
    }
}

impl SamplingCfg {
    pub fn validate(&self) -> Result<()> {
        if self.period_ms == 0 {
            return Err(invalid("period_ms must be >= 1"));
        }
        Ok(())
    }
}
