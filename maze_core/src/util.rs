//! Period and differential-drive geometry helpers.

use std::f64::consts::PI;
use std::time::Duration;

/// Number of milliseconds in one second.
pub const MILLIS_PER_SEC: u64 = 1_000;

/// Sampling period for a given rate in Hz.
/// - Clamps `hz` to at least 1 to avoid division by zero.
/// - Ensures result is at least 1 millisecond.
#[inline]
pub fn period_from_hz(hz: u32) -> Duration {
    Duration::from_millis((MILLIS_PER_SEC / u64::from(hz.max(1))).max(1))
}

/// Wheel rotations needed to travel `distance_mm` in a straight line.
/// Sign is preserved: negative distances yield negative rotations.
#[inline]
pub fn rotations_for_distance_mm(distance_mm: f64, wheel_diameter_mm: f64) -> f64 {
    distance_mm / (PI * wheel_diameter_mm)
}

/// Wheel rotations (per wheel, opposite directions) for an in-place turn of `angle_deg`.
///
/// Each wheel travels an arc of `π * wheelbase * angle / 360`; dividing by the
/// wheel circumference `π * diameter` gives `wheelbase * angle / (diameter * 360)`.
#[inline]
pub fn rotations_for_spin_deg(angle_deg: f64, wheelbase_width_mm: f64, wheel_diameter_mm: f64) -> f64 {
    wheelbase_width_mm * angle_deg / (wheel_diameter_mm * 360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_clamps_zero_hz() {
        assert_eq!(period_from_hz(0), Duration::from_secs(1));
        assert_eq!(period_from_hz(10), Duration::from_millis(100));
        assert_eq!(period_from_hz(5000), Duration::from_millis(1));
    }

    #[test]
    fn distance_rotations_follow_circumference() {
        let r = rotations_for_distance_mm(20.0, 10.0);
        assert!((r - 2.0 / PI).abs() < 1e-12);
        assert!(rotations_for_distance_mm(-20.0, 10.0) < 0.0);
    }

    #[test]
    fn spin_rotations_for_quarter_turn() {
        // wheelbase equal to diameter: a full turn is one rotation per wheel
        let r = rotations_for_spin_deg(90.0, 56.0, 56.0);
        assert!((r - 0.25).abs() < 1e-12);
    }
}
