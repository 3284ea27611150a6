use std::error::Error;

use maze_core::error::MazeError;
use maze_core::hw_error::map_hw_error;
use maze_core::mocks::{CallLog, FixedFinish, RecordingOutputs, ScriptedWallDetector};
use maze_core::{MazeSolver, RandomStrategy};
use maze_traits::{HwError, Motors};

/// Motors whose turns work but whose forward move stalls.
struct StalledMotors;
impl Motors for StalledMotors {
    fn move_forward(&mut self) -> Result<(), HwError> {
        Err("left wheel stalled".into())
    }
    fn turn_left(&mut self) -> Result<(), HwError> {
        Ok(())
    }
    fn turn_right(&mut self) -> Result<(), HwError> {
        Ok(())
    }
    fn turn_back(&mut self) -> Result<(), HwError> {
        Ok(())
    }
    fn no_turn(&mut self) -> Result<(), HwError> {
        Ok(())
    }
}

#[test]
fn hardware_errors_map_to_mazeerror_hardware() {
    let log = CallLog::new();
    let mut solver = MazeSolver::builder(RandomStrategy)
        .with_motors(StalledMotors)
        .with_wall_detector(ScriptedWallDetector::fixed(log.clone(), true, false, true))
        .with_finish_detector(FixedFinish::never(log.clone()))
        .with_outputs(RecordingOutputs::new(log))
        .try_build()
        .expect("build");

    let err = solver.next_move().expect_err("forward move fails");
    match err.downcast_ref::<MazeError>() {
        Some(MazeError::Hardware(msg)) => assert!(msg.contains("stalled")),
        other => panic!("expected Hardware, got: {other:?}"),
    }
    // Context names the failed motion.
    assert!(format!("{err:#}").contains("move forward"));
}

#[test]
fn boxed_string_errors_map_by_message() {
    let e: Box<dyn Error + Send + Sync> = "gyro read timed out".into();
    assert!(matches!(map_hw_error(e.as_ref()), MazeError::Timeout));
}

#[test]
fn exhausted_message_names_the_budget() {
    let e = MazeError::Exhausted { max_moves: 3 };
    assert!(e.to_string().contains('3'));
}
