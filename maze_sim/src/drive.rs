//! Simulated differential drive with a gyro and distance sensors.
//!
//! Lets `CorrectingMotors` run without hardware: spins move the heading by
//! the angle the commanded wheel rotations imply, scaled by `spin_gain` to
//! model wheel slip. A one-shot `kick` adds heading drift to the next forward
//! drive, as a wall strike would.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use maze_traits::{
    AngleProbe, DistanceProbe, DistanceSensors, DistanceSnapshot, Gyro, HwError, MotorPair, Spin,
};
use maze_core::CorrectionCfg;

#[derive(Debug, Clone)]
struct DriveState {
    wheel_diameter_mm: f64,
    wheelbase_width_mm: f64,
    spin_gain: f64,
    heading_deg: f64,
    pending_kick_deg: f64,
    distances: DistanceSnapshot,
    travelled_mm: f64,
    drives: u32,
    spins: u32,
}

#[derive(Debug, Clone)]
pub struct SimulatedDrive {
    state: Arc<Mutex<DriveState>>,
}

impl SimulatedDrive {
    /// Uses the wheel geometry from `cfg` so commanded rotations map back to
    /// the intended millimetres and degrees.
    pub fn new(cfg: &CorrectionCfg) -> Self {
        Self {
            state: Arc::new(Mutex::new(DriveState {
                wheel_diameter_mm: cfg.wheel_diameter_mm,
                wheelbase_width_mm: cfg.wheelbase_width_mm,
                spin_gain: 1.0,
                heading_deg: 0.0,
                pending_kick_deg: 0.0,
                distances: DistanceSnapshot::new(
                    maze_core::sampler::NO_READING_CM,
                    maze_core::sampler::NO_READING_CM,
                    maze_core::sampler::NO_READING_CM,
                ),
                travelled_mm: 0.0,
                drives: 0,
                spins: 0,
            })),
        }
    }

    /// Fraction of each commanded spin that actually happens.
    pub fn with_spin_gain(self, gain: f64) -> Self {
        self.lock().spin_gain = gain;
        self
    }

    pub fn set_distances(&self, distances: DistanceSnapshot) {
        self.lock().distances = distances;
    }

    /// Drift added to the heading on the next forward drive only.
    pub fn kick_next_forward(&self, degrees: f64) {
        self.lock().pending_kick_deg = degrees;
    }

    pub fn heading_deg(&self) -> f64 {
        self.lock().heading_deg
    }

    /// Signed straight-line travel so far.
    pub fn travelled_mm(&self) -> f64 {
        self.lock().travelled_mm
    }

    pub fn drives(&self) -> u32 {
        self.lock().drives
    }

    pub fn spins(&self) -> u32 {
        self.lock().spins
    }

    fn lock(&self) -> MutexGuard<'_, DriveState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MotorPair for SimulatedDrive {
    fn on_for_rotations(&mut self, _speed_rpm: f64, rotations: f64) -> Result<(), HwError> {
        let s = &mut *self.lock();
        s.travelled_mm += rotations * std::f64::consts::PI * s.wheel_diameter_mm;
        s.drives += 1;
        if rotations > 0.0 {
            s.heading_deg += std::mem::take(&mut s.pending_kick_deg);
        }
        Ok(())
    }

    fn spin_for_rotations(
        &mut self,
        spin: Spin,
        _speed_rpm: f64,
        rotations: f64,
    ) -> Result<(), HwError> {
        let s = &mut *self.lock();
        let degrees = rotations * s.wheel_diameter_mm * 360.0 / s.wheelbase_width_mm * s.spin_gain;
        match spin {
            Spin::Right => s.heading_deg += degrees,
            Spin::Left => s.heading_deg -= degrees,
        }
        s.spins += 1;
        Ok(())
    }
}

impl DistanceSensors for SimulatedDrive {
    fn distances(&self) -> DistanceSnapshot {
        self.lock().distances
    }
}

impl Gyro for SimulatedDrive {
    fn orientation(&self) -> f64 {
        self.heading_deg()
    }

    fn reset(&mut self) {
        self.lock().heading_deg = 0.0;
    }
}

impl DistanceProbe for SimulatedDrive {
    fn read_distances(&mut self) -> Result<DistanceSnapshot, HwError> {
        Ok(self.lock().distances)
    }
}

impl AngleProbe for SimulatedDrive {
    fn read_angle(&mut self) -> Result<f64, HwError> {
        Ok(self.heading_deg())
    }

    fn reset(&mut self) -> Result<(), HwError> {
        Gyro::reset(self);
        Ok(())
    }
}
