//! `Motors` on top of a differential drive, with post-motion correction.

use std::sync::Arc;
use std::time::Duration;

use maze_traits::{Clock, DistanceSensors, DistanceSnapshot, Gyro, HwError, MotorPair, Motors, Spin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::MotionCfg;
use crate::correction::{Correction, PositionCorrector};
use crate::error::Result;
use crate::util::{rotations_for_distance_mm, rotations_for_spin_deg};

/// Executes cell-sized motions on a `MotorPair` and brackets each one with
/// distance/gyro snapshots fed to a `PositionCorrector`.
pub struct CorrectingMotors<P, D, G> {
    pair: P,
    distances: D,
    gyro: G,
    corrector: PositionCorrector,
    motion: MotionCfg,
    clock: Arc<dyn Clock + Send + Sync>,
    rng: StdRng,
    last_correction: Option<Correction>,
}

impl<P, D, G> core::fmt::Debug for CorrectingMotors<P, D, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CorrectingMotors")
            .field("motion", &self.motion)
            .field("last_correction", &self.last_correction)
            .finish_non_exhaustive()
    }
}

impl<P: MotorPair, D: DistanceSensors, G: Gyro> CorrectingMotors<P, D, G> {
    pub fn new(
        pair: P,
        distances: D,
        gyro: G,
        corrector: PositionCorrector,
        motion: MotionCfg,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Result<Self> {
        motion.validate()?;
        // Recovery re-reads the gyro after each maneuver; with a sampled gyro
        // that read needs the same settle as the primary motions.
        let corrector = if motion.settle_ms > 0 {
            corrector.with_settle(clock.clone(), Duration::from_millis(motion.settle_ms))
        } else {
            corrector
        };
        Ok(Self {
            pair,
            distances,
            gyro,
            corrector,
            motion,
            clock,
            rng: StdRng::from_entropy(),
            last_correction: None,
        })
    }

    /// Seed the left/right choice for back turns.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// What the corrector did after the most recent motion.
    pub fn last_correction(&self) -> Option<&Correction> {
        self.last_correction.as_ref()
    }

    pub fn pair(&self) -> &P {
        &self.pair
    }

    pub fn gyro_mut(&mut self) -> &mut G {
        &mut self.gyro
    }

    fn snapshot(&self) -> (DistanceSnapshot, f64) {
        (self.distances.distances(), self.gyro.orientation())
    }

    fn settle(&self) {
        self.clock.sleep(Duration::from_millis(self.motion.settle_ms));
    }

    fn spin_rotations(&self, degrees: f64) -> f64 {
        let cfg = self.corrector.config();
        rotations_for_spin_deg(degrees, cfg.wheelbase_width_mm, cfg.wheel_diameter_mm)
    }

    fn side_turn(&mut self, spin: Spin) -> std::result::Result<(), HwError> {
        let (before, angle_before) = self.snapshot();
        let rotations = self.spin_rotations(self.corrector.config().ideal_side_turn_angle_deg);
        self.pair
            .spin_for_rotations(spin, self.motion.turn_speed_rpm, rotations)?;
        self.settle();
        let (after, angle_after) = self.snapshot();
        let correction = match spin {
            Spin::Left => self.corrector.correct_after_turn_left(
                &mut self.pair,
                before,
                angle_before,
                after,
                angle_after,
            )?,
            Spin::Right => self.corrector.correct_after_turn_right(
                &mut self.pair,
                before,
                angle_before,
                after,
                angle_after,
            )?,
        };
        self.last_correction = Some(correction);
        Ok(())
    }
}

impl<P: MotorPair, D: DistanceSensors, G: Gyro> Motors for CorrectingMotors<P, D, G> {
    fn move_forward(&mut self) -> std::result::Result<(), HwError> {
        let (before, angle_before) = self.snapshot();
        let rotations = rotations_for_distance_mm(
            self.motion.square_length_mm,
            self.corrector.config().wheel_diameter_mm,
        );
        self.pair
            .on_for_rotations(self.motion.move_speed_rpm, rotations)?;
        self.settle();
        let (after, angle_after) = self.snapshot();
        let correction = self.corrector.correct_after_move_forward(
            &mut self.pair,
            &self.gyro,
            before,
            angle_before,
            after,
            angle_after,
        )?;
        self.last_correction = Some(correction);
        Ok(())
    }

    fn turn_left(&mut self) -> std::result::Result<(), HwError> {
        self.side_turn(Spin::Left)
    }

    fn turn_right(&mut self) -> std::result::Result<(), HwError> {
        self.side_turn(Spin::Right)
    }

    /// Spins a random way; a back turn next to a wall may only clear it one way.
    fn turn_back(&mut self) -> std::result::Result<(), HwError> {
        let (before, angle_before) = self.snapshot();
        let spin = if self.rng.gen_bool(0.5) {
            Spin::Left
        } else {
            Spin::Right
        };
        let rotations = self.spin_rotations(self.corrector.config().ideal_back_turn_angle_deg);
        self.pair
            .spin_for_rotations(spin, self.motion.turn_speed_rpm, rotations)?;
        self.settle();
        let (after, angle_after) = self.snapshot();
        self.last_correction = Some(self.corrector.correct_after_turn_back(
            before,
            angle_before,
            after,
            angle_after,
        ));
        Ok(())
    }

    fn no_turn(&mut self) -> std::result::Result<(), HwError> {
        self.last_correction = None;
        Ok(())
    }
}
