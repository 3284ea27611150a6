//! Correction driven by a background-sampled gyro, as on the robot.

use std::sync::Arc;
use std::time::Duration;

use maze_core::{CorrectingMotors, Correction, CorrectionCfg, MotionCfg, PositionCorrector, Sampler};
use maze_sim::SimulatedDrive;
use maze_traits::{MonotonicClock, Motors};

#[test]
fn wall_hit_recovery_cancels_drift_once_with_sampled_gyro() {
    let cfg = CorrectionCfg::default();
    let drive = SimulatedDrive::new(&cfg);
    let period = Duration::from_millis(10);
    let (sampler, gyro) = Sampler::spawn_gyro(drive.clone(), period, MonotonicClock::new());

    let mut motors = CorrectingMotors::new(
        drive.clone(),
        drive.clone(),
        gyro,
        PositionCorrector::new(cfg).expect("cfg"),
        MotionCfg {
            settle_ms: 40,
            ..MotionCfg::default()
        },
        Arc::new(MonotonicClock::new()),
    )
    .expect("motion cfg")
    .with_seed(5);

    drive.kick_next_forward(20.0);
    motors.move_forward().expect("move");
    drop(sampler);

    assert!(
        matches!(
            motors.last_correction(),
            Some(Correction::WallHit {
                maneuvers: 1,
                recovered: true
            })
        ),
        "correction was {:?}",
        motors.last_correction()
    );
    assert_eq!(drive.spins(), 1);
    assert!(drive.heading_deg().abs() < 1e-9, "heading {}", drive.heading_deg());
}
