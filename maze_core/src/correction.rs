//! Post-motion position correction.
//!
//! After every primary motion the motion layer hands the corrector two
//! sensor snapshots (before/after) and the matching gyro readings. The
//! corrector compares them against `CorrectionCfg` and issues small
//! compensating commands on the same `MotorPair` that executed the motion.
//!
//! Gyro angles are clockwise positive: a positive drift means the robot
//! ended up rotated to the right of where it started.

use std::sync::Arc;
use std::time::Duration;

use maze_traits::{Clock, DistanceSnapshot, Gyro, MotorPair, Spin};

use crate::config::CorrectionCfg;
use crate::error::Result;
use crate::hw_error::hw;
use crate::util::{rotations_for_distance_mm, rotations_for_spin_deg};

const MM_PER_CM: f64 = 10.0;

/// One compensating command issued by the corrector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CorrectionAction {
    /// Straight travel; negative rotations back up.
    Drive { rotations: f64 },
    Spin { spin: Spin, degrees: f64 },
}

/// Summary of what a correction call did.
#[derive(Debug, Clone, PartialEq)]
pub enum Correction {
    /// Everything within tolerance.
    None,
    Adjusted(Vec<CorrectionAction>),
    /// Collision inferred during a forward move.
    WallHit {
        /// Back-off/re-align/creep maneuvers performed.
        maneuvers: u32,
        /// Whether the gyro drift was back under the threshold at the end.
        recovered: bool,
    },
    /// A back turn missed its ideal angle; logged only.
    TurnBackMissed { turned_deg: f64 },
}

/// Which side turn is being corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideTurn {
    Left,
    Right,
}

impl SideTurn {
    fn spin(self) -> Spin {
        match self {
            SideTurn::Left => Spin::Left,
            SideTurn::Right => Spin::Right,
        }
    }
}

/// Stateless correction algorithm over a validated `CorrectionCfg`.
pub struct PositionCorrector {
    cfg: CorrectionCfg,
    /// Pause before re-reading the gyro during wall-hit recovery.
    settle: Option<(Arc<dyn Clock + Send + Sync>, Duration)>,
}

impl std::fmt::Debug for PositionCorrector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionCorrector")
            .field("cfg", &self.cfg)
            .field("settle", &self.settle.as_ref().map(|(_, d)| *d))
            .finish()
    }
}

impl PositionCorrector {
    /// Fails fast on geometry that would divide by zero later.
    pub fn new(cfg: CorrectionCfg) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { cfg, settle: None })
    }

    /// Wait `settle` on `clock` before every gyro re-check so a background
    /// sampler has published a post-maneuver angle.
    pub fn with_settle(mut self, clock: Arc<dyn Clock + Send + Sync>, settle: Duration) -> Self {
        self.settle = Some((clock, settle));
        self
    }

    pub fn config(&self) -> &CorrectionCfg {
        &self.cfg
    }

    fn drive_rotations(&self, distance_mm: f64) -> f64 {
        rotations_for_distance_mm(distance_mm, self.cfg.wheel_diameter_mm)
    }

    fn spin_rotations(&self, degrees: f64) -> f64 {
        rotations_for_spin_deg(
            degrees,
            self.cfg.wheelbase_width_mm,
            self.cfg.wheel_diameter_mm,
        )
    }

    fn drive(&self, pair: &mut dyn MotorPair, distance_mm: f64) -> Result<CorrectionAction> {
        let rotations = self.drive_rotations(distance_mm);
        pair.on_for_rotations(self.cfg.correction_speed_rpm, rotations)
            .map_err(hw)?;
        Ok(CorrectionAction::Drive { rotations })
    }

    fn spin(&self, pair: &mut dyn MotorPair, spin: Spin, degrees: f64) -> Result<CorrectionAction> {
        pair.spin_for_rotations(spin, self.cfg.correction_speed_rpm, self.spin_rotations(degrees))
            .map_err(hw)?;
        Ok(CorrectionAction::Spin { spin, degrees })
    }

    fn in_range(&self, distance_cm: f64) -> bool {
        distance_cm.is_finite() && distance_cm <= self.cfg.max_reliable_distance_cm
    }

    pub fn correct_after_move_forward(
        &self,
        pair: &mut dyn MotorPair,
        gyro: &dyn Gyro,
        _distances_before: DistanceSnapshot,
        angle_before: f64,
        distances_after: DistanceSnapshot,
        angle_after: f64,
    ) -> Result<Correction> {
        let drift = angle_after - angle_before;
        if drift.abs() > self.cfg.move_forward_bad_angle_threshold_deg {
            tracing::info!(drift, "gyro drift on forward move, assuming wall hit");
            return self.recover_from_wall_hit(pair, gyro, angle_before, drift);
        }

        let mut actions = Vec::new();

        let front = distances_after.front;
        let front_offset_cm = front - self.cfg.ideal_distance_cm;
        if self.in_range(front) && front_offset_cm.abs() > self.cfg.distance_tolerance_cm {
            tracing::debug!(front, front_offset_cm, "correcting front distance");
            actions.push(self.drive(pair, front_offset_cm * MM_PER_CM)?);
        }

        let (left, right) = (distances_after.left, distances_after.right);
        if self.in_range(left) && self.in_range(right) {
            let ideal = self.cfg.ideal_distance_cm;
            let nudge = if left < ideal && left < right {
                Some(Spin::Right)
            } else if right < ideal && right < left {
                Some(Spin::Left)
            } else {
                None
            };
            if let Some(spin) = nudge {
                tracing::debug!(left, right, ?spin, "too close to a side wall, nudging away");
                actions.push(self.spin(pair, spin, self.cfg.side_nudge_deg)?);
            }
        }

        Ok(if actions.is_empty() {
            Correction::None
        } else {
            Correction::Adjusted(actions)
        })
    }

    /// Bounded back-off / re-align / creep loop. Performs at most
    /// `1 + max_wall_hit_retries` maneuvers and never fails on exhaustion.
    fn recover_from_wall_hit(
        &self,
        pair: &mut dyn MotorPair,
        gyro: &dyn Gyro,
        angle_before: f64,
        initial_drift: f64,
    ) -> Result<Correction> {
        let cfg = &self.cfg;
        let max_maneuvers = cfg.max_wall_hit_retries.saturating_add(1);
        let mut drift = initial_drift;
        let mut maneuvers = 0u32;

        while drift.abs() > cfg.move_forward_bad_angle_threshold_deg {
            if maneuvers >= max_maneuvers {
                tracing::warn!(
                    maneuvers,
                    drift,
                    "wall-hit recovery exhausted, continuing from best-effort position"
                );
                return Ok(Correction::WallHit {
                    maneuvers,
                    recovered: false,
                });
            }

            let exp = i32::try_from(maneuvers).unwrap_or(i32::MAX);
            let back_off_mm = cfg.wall_hit_back_off_mm * cfg.wall_hit_back_off_growth.powi(exp);
            let creep_mm = cfg.wall_hit_creep_mm * cfg.wall_hit_creep_decay.powi(exp);
            let spin = if drift > 0.0 { Spin::Left } else { Spin::Right };

            tracing::debug!(
                attempt = maneuvers + 1,
                back_off_mm,
                creep_mm,
                drift,
                "wall-hit maneuver"
            );
            self.drive(pair, -back_off_mm)?;
            self.spin(pair, spin, drift.abs())?;
            self.drive(pair, creep_mm)?;
            maneuvers += 1;

            if let Some((clock, settle)) = &self.settle {
                clock.sleep(*settle);
            }
            drift = gyro.orientation() - angle_before;
        }

        tracing::info!(maneuvers, "recovered from wall hit");
        Ok(Correction::WallHit {
            maneuvers,
            recovered: true,
        })
    }

    fn correct_side_turn(
        &self,
        pair: &mut dyn MotorPair,
        turn: SideTurn,
        angle_before: f64,
        angle_after: f64,
    ) -> Result<Correction> {
        let cfg = &self.cfg;
        let turned = (angle_after - angle_before).abs();
        let ideal = cfg.ideal_side_turn_angle_deg;

        let action = if turned < ideal - cfg.turn_angle_tolerance_deg {
            let degrees = (ideal - turned).max(cfg.min_angle_correction_deg);
            tracing::debug!(?turn, turned, degrees, "side turn undershot");
            self.spin(pair, turn.spin(), degrees)?
        } else if turned > ideal + cfg.turn_angle_tolerance_deg {
            let degrees = turned - ideal;
            tracing::debug!(?turn, turned, degrees, "side turn overshot");
            self.spin(pair, turn.spin().opposite(), degrees)?
        } else {
            return Ok(Correction::None);
        };
        Ok(Correction::Adjusted(vec![action]))
    }

    pub fn correct_after_turn_left(
        &self,
        pair: &mut dyn MotorPair,
        _distances_before: DistanceSnapshot,
        angle_before: f64,
        _distances_after: DistanceSnapshot,
        angle_after: f64,
    ) -> Result<Correction> {
        self.correct_side_turn(pair, SideTurn::Left, angle_before, angle_after)
    }

    pub fn correct_after_turn_right(
        &self,
        pair: &mut dyn MotorPair,
        _distances_before: DistanceSnapshot,
        angle_before: f64,
        _distances_after: DistanceSnapshot,
        angle_after: f64,
    ) -> Result<Correction> {
        self.correct_side_turn(pair, SideTurn::Right, angle_before, angle_after)
    }

    /// Detects a missed back turn but issues no corrective command.
    pub fn correct_after_turn_back(
        &self,
        _distances_before: DistanceSnapshot,
        angle_before: f64,
        _distances_after: DistanceSnapshot,
        angle_after: f64,
    ) -> Correction {
        let turned = (angle_after - angle_before).abs();
        let ideal = self.cfg.ideal_back_turn_angle_deg;
        if (turned - ideal).abs() > self.cfg.turn_angle_tolerance_deg {
            tracing::warn!(turned, ideal, "back turn missed its target angle");
            Correction::TurnBackMissed { turned_deg: turned }
        } else {
            Correction::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{Call, CallLog, RecordingMotorPair, ScriptedGyro};
    use std::f64::consts::PI;

    const D: f64 = 10.0;

    fn corrector() -> PositionCorrector {
        PositionCorrector::new(CorrectionCfg {
            wheel_diameter_mm: D,
            ..CorrectionCfg::default()
        })
        .expect("valid cfg")
    }

    fn snap(left: f64, front: f64, right: f64) -> DistanceSnapshot {
        DistanceSnapshot::new(left, front, right)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn aligned_move_needs_nothing() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        let c = corrector()
            .correct_after_move_forward(
                &mut pair,
                &ScriptedGyro::fixed(0.0),
                snap(3.0, 21.0, 3.0),
                0.0,
                snap(3.0, 3.0, 3.0),
                0.0,
            )
            .expect("ok");
        assert_eq!(c, Correction::None);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn far_front_wall_drives_forward() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        corrector()
            .correct_after_move_forward(
                &mut pair,
                &ScriptedGyro::fixed(0.0),
                snap(3.0, 21.0, 3.0),
                0.0,
                snap(3.0, 5.0, 3.0),
                0.0,
            )
            .expect("ok");
        match log.calls().as_slice() {
            [Call::Drive { rotations, .. }] => assert!(approx(*rotations, 20.0 / (PI * D))),
            other => panic!("unexpected calls: {other:?}"),
        }
    }

    #[test]
    fn close_front_wall_backs_up() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        corrector()
            .correct_after_move_forward(
                &mut pair,
                &ScriptedGyro::fixed(0.0),
                snap(3.0, 19.0, 3.0),
                0.0,
                snap(3.0, 1.0, 3.0),
                0.0,
            )
            .expect("ok");
        match log.calls().as_slice() {
            [Call::Drive { rotations, .. }] => assert!(approx(*rotations, -20.0 / (PI * D))),
            other => panic!("unexpected calls: {other:?}"),
        }
    }

    #[test]
    fn unreliable_front_reading_is_ignored() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        corrector()
            .correct_after_move_forward(
                &mut pair,
                &ScriptedGyro::fixed(0.0),
                snap(3.0, 255.0, 3.0),
                0.0,
                snap(3.0, 255.0, 3.0),
                0.0,
            )
            .expect("ok");
        assert!(log.calls().is_empty());
    }

    #[test]
    fn hugging_left_wall_nudges_right() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        let c = corrector()
            .correct_after_move_forward(
                &mut pair,
                &ScriptedGyro::fixed(0.0),
                snap(3.0, 21.0, 3.0),
                0.0,
                snap(1.5, 3.0, 4.5),
                0.0,
            )
            .expect("ok");
        assert_eq!(
            c,
            Correction::Adjusted(vec![CorrectionAction::Spin {
                spin: Spin::Right,
                degrees: 3.0
            }])
        );
    }

    #[test]
    fn balanced_side_walls_need_no_nudge() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        corrector()
            .correct_after_move_forward(
                &mut pair,
                &ScriptedGyro::fixed(0.0),
                snap(2.0, 21.0, 2.0),
                0.0,
                snap(2.0, 3.0, 2.0),
                0.0,
            )
            .expect("ok");
        assert!(log.calls().is_empty());
    }

    #[test]
    fn wall_hit_backs_off_realigns_and_creeps() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        let cfg = CorrectionCfg {
            wheel_diameter_mm: D,
            ..CorrectionCfg::default()
        };
        let c = corrector()
            .correct_after_move_forward(
                &mut pair,
                &ScriptedGyro::fixed(0.0),
                snap(3.0, 21.0, 3.0),
                0.0,
                snap(3.0, 3.0, 3.0),
                45.0,
            )
            .expect("ok");
        assert_eq!(
            c,
            Correction::WallHit {
                maneuvers: 1,
                recovered: true
            }
        );
        match log.calls().as_slice() {
            [
                Call::Drive { rotations: back, .. },
                Call::Spin { spin: Spin::Left, rotations: turn, .. },
                Call::Drive { rotations: creep, .. },
            ] => {
                assert!(approx(*back, -cfg.wall_hit_back_off_mm / (PI * D)));
                assert!(approx(*turn, cfg.wheelbase_width_mm * 45.0 / (D * 360.0)));
                assert!(approx(*creep, cfg.wall_hit_creep_mm / (PI * D)));
            }
            other => panic!("unexpected calls: {other:?}"),
        }
    }

    #[test]
    fn wall_hit_recovery_gives_up_after_retry_budget() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        let c = corrector()
            .correct_after_move_forward(
                &mut pair,
                &ScriptedGyro::fixed(-40.0),
                snap(3.0, 21.0, 3.0),
                0.0,
                snap(3.0, 3.0, 3.0),
                -40.0,
            )
            .expect("ok");
        assert_eq!(
            c,
            Correction::WallHit {
                maneuvers: 4,
                recovered: false
            }
        );
        let calls = log.pair_calls();
        assert_eq!(calls.len(), 12);
        // Negative drift is cancelled by spinning right.
        assert!(matches!(calls[1], Call::Spin { spin: Spin::Right, .. }));
        // Back-off grows, creep shrinks.
        let drive = |c: &Call| match c {
            Call::Drive { rotations, .. } => *rotations,
            _ => f64::NAN,
        };
        assert!(drive(&calls[3]).abs() > drive(&calls[0]).abs());
        assert!(drive(&calls[5]) < drive(&calls[2]));
    }

    #[test]
    fn undershot_left_turn_keeps_turning_left() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        let c = corrector()
            .correct_after_turn_left(&mut pair, snap(3.0, 3.0, 3.0), 0.0, snap(3.0, 3.0, 3.0), -70.0)
            .expect("ok");
        assert_eq!(
            c,
            Correction::Adjusted(vec![CorrectionAction::Spin {
                spin: Spin::Left,
                degrees: 20.0
            }])
        );
    }

    #[test]
    fn overshot_left_turn_spins_back_right() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        corrector()
            .correct_after_turn_left(&mut pair, snap(3.0, 3.0, 3.0), 0.0, snap(3.0, 3.0, 3.0), -100.0)
            .expect("ok");
        let cfg = CorrectionCfg::default();
        match log.calls().as_slice() {
            [Call::Spin { spin: Spin::Right, rotations, .. }] => {
                assert!(approx(*rotations, cfg.wheelbase_width_mm * 10.0 / (D * 360.0)));
            }
            other => panic!("unexpected calls: {other:?}"),
        }
    }

    #[test]
    fn right_turn_within_tolerance_is_left_alone() {
        let log = CallLog::new();
        let mut pair = RecordingMotorPair::new(log.clone());
        let c = corrector()
            .correct_after_turn_right(&mut pair, snap(3.0, 3.0, 3.0), 10.0, snap(3.0, 3.0, 3.0), 97.0)
            .expect("ok");
        assert_eq!(c, Correction::None);
        assert!(log.calls().is_empty());
    }

    #[test]
    fn missed_back_turn_is_only_reported() {
        let c = corrector().correct_after_turn_back(
            snap(3.0, 3.0, 3.0),
            0.0,
            snap(3.0, 3.0, 3.0),
            150.0,
        );
        assert_eq!(c, Correction::TurnBackMissed { turned_deg: 150.0 });
    }

    #[test]
    fn zero_wheel_diameter_is_rejected_at_construction() {
        let err = PositionCorrector::new(CorrectionCfg {
            wheel_diameter_mm: 0.0,
            ..CorrectionCfg::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("wheel_diameter_mm"));
    }
}
