//! Threshold wall detection over sampled distances.

use maze_traits::{DistanceSensors, WallDetector};

use crate::config::WallDetectorCfg;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct DistanceWallDetector<D> {
    sensors: D,
    threshold_cm: f64,
}

impl<D: DistanceSensors> DistanceWallDetector<D> {
    pub fn new(sensors: D, cfg: &WallDetectorCfg) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            sensors,
            threshold_cm: cfg.blocked_threshold_cm,
        })
    }

    fn blocked(&self, distance_cm: f64) -> bool {
        distance_cm < self.threshold_cm
    }
}

impl<D: DistanceSensors> WallDetector for DistanceWallDetector<D> {
    fn is_left_blocked(&mut self) -> bool {
        self.blocked(self.sensors.distances().left)
    }

    fn is_front_blocked(&mut self) -> bool {
        self.blocked(self.sensors.distances().front)
    }

    fn is_right_blocked(&mut self) -> bool {
        self.blocked(self.sensors.distances().right)
    }
}
