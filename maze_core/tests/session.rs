use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use maze_core::error::BuildError;
use maze_core::mocks::{
    Call, CallLog, FixedFinish, RecordingMotors, RecordingOutputs, ScriptedWallDetector,
};
use maze_core::{
    CuriousStrategy, ExplorationCfg, MazeSolver, MazeSolvingSession, RandomStrategy,
    SessionCfg, SessionOutcome,
};
use maze_traits::NotificationLevel;

fn solver(log: &CallLog, finish: FixedFinish) -> MazeSolver<RandomStrategy> {
    MazeSolver::builder(RandomStrategy)
        .with_motors(RecordingMotors::new(log.clone()))
        .with_wall_detector(ScriptedWallDetector::fixed(log.clone(), true, false, true))
        .with_finish_detector(finish)
        .with_outputs(RecordingOutputs::new(log.clone()))
        .with_seed(1)
        .try_build()
        .expect("build")
}

#[test]
fn exhausted_budget_stops_after_exactly_max_moves() {
    let log = CallLog::new();
    let mut session = MazeSolvingSession::new(
        solver(&log, FixedFinish::never(log.clone())),
        SessionCfg { max_moves: 3 },
    )
    .expect("session");

    let outcome = session.run().expect("run");
    assert_eq!(outcome, SessionOutcome::Exhausted { moves: 3 });
    assert_eq!(log.count(&Call::IsFinish), 3);
    assert_eq!(log.count(&Call::MoveForward), 3);

    let errors: Vec<String> = log
        .notifications()
        .into_iter()
        .filter(|(level, _)| *level == NotificationLevel::Error)
        .map(|(_, msg)| msg)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains('3'));
}

#[test]
fn finish_ends_session_without_error() {
    let log = CallLog::new();
    let mut session = MazeSolvingSession::new(
        solver(&log, FixedFinish::on_query(log.clone(), 4)),
        SessionCfg::default(),
    )
    .expect("session");

    let outcome = session.run().expect("run");
    assert_eq!(outcome, SessionOutcome::Finished { moves: 3 });
    assert!(outcome.is_finished());
    // four transitions, the last one only saw the finish
    assert_eq!(log.count(&Call::IsFinish), 4);
    assert_eq!(log.count(&Call::MoveForward), 3);
    let notes = log.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].0, NotificationLevel::Info);
}

#[test]
fn raised_stop_flag_cancels_before_first_move() {
    let log = CallLog::new();
    let stop = Arc::new(AtomicBool::new(true));
    let mut session = MazeSolvingSession::new(
        solver(&log, FixedFinish::never(log.clone())),
        SessionCfg::default(),
    )
    .expect("session")
    .with_stop_flag(stop);

    assert_eq!(session.run().expect("run"), SessionOutcome::Cancelled { moves: 0 });
    assert!(log.calls().is_empty());
}

#[test]
fn zero_budget_is_rejected() {
    let log = CallLog::new();
    let err = MazeSolvingSession::new(
        solver(&log, FixedFinish::never(log.clone())),
        SessionCfg { max_moves: 0 },
    )
    .expect_err("invalid budget");
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::InvalidConfig(_))
    ));
}

#[test]
fn session_hands_back_solver_memory() {
    let log = CallLog::new();
    let solver = MazeSolver::builder(CuriousStrategy::new(ExplorationCfg::default()))
        .with_motors(RecordingMotors::new(log.clone()))
        .with_wall_detector(ScriptedWallDetector::fixed(log.clone(), true, false, true))
        .with_finish_detector(FixedFinish::on_query(log.clone(), 3))
        .with_outputs(RecordingOutputs::new(log.clone()))
        .try_build()
        .expect("build");
    let mut session = MazeSolvingSession::new(solver, SessionCfg::default()).expect("session");
    session.run().expect("run");
    let solver = session.into_solver();
    let state = solver.strategy().state();
    assert_eq!(state.visited_count(), 2);
    assert_eq!(state.path().len(), 2);
}
