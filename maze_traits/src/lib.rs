//! Collaborator seams between the maze-solving core and a platform.
//!
//! Everything the core consumes from the outside world is expressed here:
//! motor actuation, wall and finish detection, operator notifications and
//! the raw sensor channels that background samplers poll. Implementations
//! live in platform adapters (simulator, test doubles, real hardware).
//!
//! Conventions:
//! - distances are centimeters, `f64`
//! - gyro angles are degrees, clockwise positive (a right turn increases the angle)
//! - wheel travel is expressed in rotations; positive rotations drive forward
pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Error type crossing the actuation/probe boundary.
pub type HwError = Box<dyn std::error::Error + Send + Sync>;

/// Read-only triple of the last known wall distances around the robot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistanceSnapshot {
    pub left: f64,
    pub front: f64,
    pub right: f64,
}

impl DistanceSnapshot {
    pub const fn new(left: f64, front: f64, right: f64) -> Self {
        Self { left, front, right }
    }
}

/// Notification severity for [`Outputs::notify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// High-level, cell-sized motions. Every call blocks until the motion is
/// physically complete. Implementations are expected to bracket the motion
/// with sensor snapshots and run position correction before returning.
pub trait Motors {
    fn move_forward(&mut self) -> Result<(), HwError>;
    fn turn_left(&mut self) -> Result<(), HwError>;
    fn turn_right(&mut self) -> Result<(), HwError>;
    fn turn_back(&mut self) -> Result<(), HwError>;
    fn no_turn(&mut self) -> Result<(), HwError>;
}

/// Direction of an in-place rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Left,
    Right,
}

impl Spin {
    pub fn opposite(self) -> Self {
        match self {
            Spin::Left => Spin::Right,
            Spin::Right => Spin::Left,
        }
    }
}

/// Low-level differential-drive primitive used for both primary motions
/// and compensating micro-moves.
pub trait MotorPair {
    /// Turn both wheels by the same signed number of rotations.
    /// Negative rotations back the robot up.
    fn on_for_rotations(&mut self, speed_rpm: f64, rotations: f64) -> Result<(), HwError>;

    /// Rotate in place: the wheels turn in opposite directions by `rotations` each.
    fn spin_for_rotations(
        &mut self,
        spin: Spin,
        speed_rpm: f64,
        rotations: f64,
    ) -> Result<(), HwError>;
}

/// Wall presence around the robot's current cell.
pub trait WallDetector {
    fn is_left_blocked(&mut self) -> bool;
    fn is_front_blocked(&mut self) -> bool;
    fn is_right_blocked(&mut self) -> bool;
}

pub trait FinishDetector {
    fn is_finish(&mut self) -> bool;
}

/// Fire-and-forget operator notifications.
pub trait Outputs {
    fn notify(&mut self, level: NotificationLevel, message: &str);
}

/// Non-blocking access to the most recently sampled distances.
pub trait DistanceSensors {
    fn distances(&self) -> DistanceSnapshot;
}

/// Non-blocking access to the most recently sampled heading.
pub trait Gyro {
    fn orientation(&self) -> f64;
    fn reset(&mut self);
}

/// Raw distance hardware, polled by a background sampler.
pub trait DistanceProbe {
    fn read_distances(&mut self) -> Result<DistanceSnapshot, HwError>;
}

/// Raw gyro hardware, polled by a background sampler.
pub trait AngleProbe {
    fn read_angle(&mut self) -> Result<f64, HwError>;
    fn reset(&mut self) -> Result<(), HwError>;
}
