//! Test doubles for the collaborator traits.
//!
//! Every recording double pushes into a shared [`CallLog`] so tests can
//! assert on the interleaving of motor, wall and notification calls after
//! the doubles have been moved into a solver.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use maze_traits::{
    DistanceSensors, DistanceSnapshot, FinishDetector, Gyro, HwError, MotorPair, Motors,
    NotificationLevel, Outputs, Spin, WallDetector,
};

/// One observable collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    IsFinish,
    IsLeftBlocked,
    IsFrontBlocked,
    IsRightBlocked,
    MoveForward,
    TurnLeft,
    TurnRight,
    TurnBack,
    NoTurn,
    Drive { speed_rpm: f64, rotations: f64 },
    Spin { spin: Spin, speed_rpm: f64, rotations: f64 },
    Notify { level: NotificationLevel, message: String },
}

/// Shared, cloneable call recorder.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        if let Ok(mut calls) = self.0.lock() {
            calls.push(call);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Motion calls only (turns, no-turn and forward moves).
    pub fn motions(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::MoveForward | Call::TurnLeft | Call::TurnRight | Call::TurnBack | Call::NoTurn
                )
            })
            .collect()
    }

    /// Low-level motor pair calls only.
    pub fn pair_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Drive { .. } | Call::Spin { .. }))
            .collect()
    }

    pub fn notifications(&self) -> Vec<(NotificationLevel, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Notify { level, message } => Some((level, message)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut calls) = self.0.lock() {
            calls.clear();
        }
    }
}

/// `Motors` double that records every motion and never fails.
#[derive(Debug, Clone)]
pub struct RecordingMotors {
    log: CallLog,
}

impl RecordingMotors {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl Motors for RecordingMotors {
    fn move_forward(&mut self) -> Result<(), HwError> {
        self.log.push(Call::MoveForward);
        Ok(())
    }
    fn turn_left(&mut self) -> Result<(), HwError> {
        self.log.push(Call::TurnLeft);
        Ok(())
    }
    fn turn_right(&mut self) -> Result<(), HwError> {
        self.log.push(Call::TurnRight);
        Ok(())
    }
    fn turn_back(&mut self) -> Result<(), HwError> {
        self.log.push(Call::TurnBack);
        Ok(())
    }
    fn no_turn(&mut self) -> Result<(), HwError> {
        self.log.push(Call::NoTurn);
        Ok(())
    }
}

/// `Motors` double whose forward moves always fail with the given message.
#[derive(Debug, Clone)]
pub struct FailingMotors {
    message: String,
}

impl FailingMotors {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Motors for FailingMotors {
    fn move_forward(&mut self) -> Result<(), HwError> {
        Err(Box::new(std::io::Error::other(self.message.clone())))
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

/// `MotorPair` double that records drive and spin commands.
#[derive(Debug, Clone)]
pub struct RecordingMotorPair {
    log: CallLog,
}

impl RecordingMotorPair {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl MotorPair for RecordingMotorPair {
    fn on_for_rotations(&mut self, speed_rpm: f64, rotations: f64) -> Result<(), HwError> {
        self.log.push(Call::Drive {
            speed_rpm,
            rotations,
        });
        Ok(())
    }

    fn spin_for_rotations(&mut self, spin: Spin, speed_rpm: f64, rotations: f64) -> Result<(), HwError> {
        self.log.push(Call::Spin {
            spin,
            speed_rpm,
            rotations,
        });
        Ok(())
    }
}

/// Wall detector fed from a queue of `(left, front, right)` blocked triples.
/// The last triple repeats once the queue runs dry.
#[derive(Debug, Clone)]
pub struct ScriptedWallDetector {
    log: CallLog,
    script: VecDeque<(bool, bool, bool)>,
    current: (bool, bool, bool),
}

impl ScriptedWallDetector {
    pub fn new(log: CallLog, script: impl IntoIterator<Item = (bool, bool, bool)>) -> Self {
        Self {
            log,
            script: script.into_iter().collect(),
            current: (false, false, false),
        }
    }

    /// Same blocked triple for every query.
    pub fn fixed(log: CallLog, left: bool, front: bool, right: bool) -> Self {
        Self::new(log, [(left, front, right)])
    }
}

impl WallDetector for ScriptedWallDetector {
    // The left query opens a new decision, so it advances the script.
    fn is_left_blocked(&mut self) -> bool {
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        self.log.push(Call::IsLeftBlocked);
        self.current.0
    }
    fn is_front_blocked(&mut self) -> bool {
        self.log.push(Call::IsFrontBlocked);
        self.current.1
    }
    fn is_right_blocked(&mut self) -> bool {
        self.log.push(Call::IsRightBlocked);
        self.current.2
    }
}

/// Finish detector that reports `true` on the `finish_on`-th query (1-based),
/// or never when `None`.
#[derive(Debug, Clone)]
pub struct FixedFinish {
    log: CallLog,
    finish_on: Option<u32>,
    queries: u32,
}

impl FixedFinish {
    pub fn never(log: CallLog) -> Self {
        Self {
            log,
            finish_on: None,
            queries: 0,
        }
    }

    pub fn on_query(log: CallLog, n: u32) -> Self {
        Self {
            log,
            finish_on: Some(n),
            queries: 0,
        }
    }
}

impl FinishDetector for FixedFinish {
    fn is_finish(&mut self) -> bool {
        self.log.push(Call::IsFinish);
        self.queries = self.queries.saturating_add(1);
        self.finish_on.is_some_and(|n| self.queries >= n)
    }
}

#[derive(Debug, Clone)]
pub struct RecordingOutputs {
    log: CallLog,
}

impl RecordingOutputs {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl Outputs for RecordingOutputs {
    fn notify(&mut self, level: NotificationLevel, message: &str) {
        self.log.push(Call::Notify {
            level,
            message: message.to_owned(),
        });
    }
}

/// Distance sensors reporting whatever the test last stored.
#[derive(Debug, Clone, Default)]
pub struct StaticDistances(Arc<Mutex<DistanceSnapshot>>);

impl StaticDistances {
    pub fn new(initial: DistanceSnapshot) -> Self {
        Self(Arc::new(Mutex::new(initial)))
    }

    pub fn set(&self, snapshot: DistanceSnapshot) {
        if let Ok(mut s) = self.0.lock() {
            *s = snapshot;
        }
    }
}

impl DistanceSensors for StaticDistances {
    fn distances(&self) -> DistanceSnapshot {
        self.0.lock().map(|s| *s).unwrap_or_default()
    }
}

/// Gyro that yields queued readings in order, then repeats the last one.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGyro {
    readings: Arc<Mutex<VecDeque<f64>>>,
    last: Arc<Mutex<f64>>,
}

impl ScriptedGyro {
    pub fn new(readings: impl IntoIterator<Item = f64>) -> Self {
        Self {
            readings: Arc::new(Mutex::new(readings.into_iter().collect())),
            last: Arc::new(Mutex::new(0.0)),
        }
    }

    pub fn fixed(angle: f64) -> Self {
        Self::new([angle])
    }

    /// Append readings served after the current queue.
    pub fn push(&self, angle: f64) {
        if let Ok(mut q) = self.readings.lock() {
            q.push_back(angle);
        }
    }
}

impl Gyro for ScriptedGyro {
    fn orientation(&self) -> f64 {
        let next = self.readings.lock().ok().and_then(|mut q| q.pop_front());
        match (next, self.last.lock()) {
            (Some(v), Ok(mut last)) => {
                *last = v;
                v
            }
            (None, Ok(last)) => *last,
            (Some(v), Err(_)) => v,
            (None, Err(_)) => 0.0,
        }
    }

    fn reset(&mut self) {
        if let Ok(mut q) = self.readings.lock() {
            q.clear();
        }
        if let Ok(mut last) = self.last.lock() {
            *last = 0.0;
        }
    }
}
