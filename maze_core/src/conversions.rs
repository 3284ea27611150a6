//! `From` implementations bridging `maze_config` types to `maze_core` types.

use crate::config::{
    CorrectionCfg, ExplorationCfg, MotionCfg, SamplingCfg, SessionCfg, WallDetectorCfg,
    center_square,
};
use crate::direction::Direction;
use crate::grid::GridCoordinate;
use crate::strategy::StrategyKind;

// ── CorrectionCfg ────────────────────────────────────────────────────────────

impl From<&maze_config::Correction> for CorrectionCfg {
    fn from(c: &maze_config::Correction) -> Self {
        Self {
            wheel_diameter_mm: c.wheel_diameter_mm,
            wheelbase_width_mm: c.wheelbase_width_mm,
            ideal_distance_cm: c.ideal_distance_cm,
            max_reliable_distance_cm: c.max_reliable_distance_cm,
            distance_tolerance_cm: c.distance_tolerance_cm,
            move_forward_bad_angle_threshold_deg: c.move_forward_bad_angle_threshold_deg,
            ideal_side_turn_angle_deg: c.ideal_side_turn_angle_deg,
            ideal_back_turn_angle_deg: c.ideal_back_turn_angle_deg,
            turn_angle_tolerance_deg: c.turn_angle_tolerance_deg,
            min_angle_correction_deg: c.min_angle_correction_deg,
            side_nudge_deg: c.side_nudge_deg,
            correction_speed_rpm: c.correction_speed_rpm,
            wall_hit_back_off_mm: c.wall_hit_back_off_mm,
            wall_hit_back_off_growth: c.wall_hit_back_off_growth,
            wall_hit_creep_mm: c.wall_hit_creep_mm,
            wall_hit_creep_decay: c.wall_hit_creep_decay,
            max_wall_hit_retries: c.max_wall_hit_retries,
        }
    }
}

// ── ExplorationCfg ───────────────────────────────────────────────────────────

impl From<maze_config::Heading> for Direction {
    fn from(h: maze_config::Heading) -> Self {
        match h {
            maze_config::Heading::North => Direction::North,
            maze_config::Heading::East => Direction::East,
            maze_config::Heading::South => Direction::South,
            maze_config::Heading::West => Direction::West,
        }
    }
}

impl From<maze_config::Strategy> for StrategyKind {
    fn from(s: maze_config::Strategy) -> Self {
        match s {
            maze_config::Strategy::Random => StrategyKind::Random,
            maze_config::Strategy::Curious => StrategyKind::Curious,
        }
    }
}

impl From<&maze_config::Exploration> for ExplorationCfg {
    fn from(c: &maze_config::Exploration) -> Self {
        Self {
            prefer_non_dead_end_weight: c.prefer_non_dead_end_weight,
            prefer_unvisited_weight: c.prefer_unvisited_weight,
            prefer_closer_to_center_weight: c.prefer_closer_to_center_weight,
            prefer_no_turns_weight: c.prefer_no_turns_weight,
            center_cells: center_square(&c.center_coordinates),
            start: GridCoordinate::new(c.start[0], c.start[1]),
            start_direction: c.start_direction.into(),
        }
    }
}

// ── Remaining sections ───────────────────────────────────────────────────────

impl From<&maze_config::Session> for SessionCfg {
    fn from(c: &maze_config::Session) -> Self {
        Self {
            max_moves: c.max_moves,
        }
    }
}

impl From<&maze_config::Motion> for MotionCfg {
    fn from(c: &maze_config::Motion) -> Self {
        Self {
            square_length_mm: c.square_length_mm,
            move_speed_rpm: c.move_speed_rpm,
            turn_speed_rpm: c.turn_speed_rpm,
            settle_ms: c.settle_ms,
        }
    }
}

impl From<&maze_config::Walls> for WallDetectorCfg {
    fn from(c: &maze_config::Walls) -> Self {
        Self {
            blocked_threshold_cm: c.blocked_threshold_cm,
        }
    }
}

impl From<&maze_config::Sampling> for SamplingCfg {
    fn from(c: &maze_config::Sampling) -> Self {
        Self {
            period_ms: c.period_ms,
        }
    }
}
