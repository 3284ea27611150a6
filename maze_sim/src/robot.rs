//! A robot that moves on a `Maze` grid instead of real wheels.
//!
//! `SimulatedRobot` owns the pose; the handles it hands out implement the
//! solver's collaborator traits and share that pose, so the solver drives the
//! robot exactly as it would drive hardware.

use std::cell::RefCell;
use std::rc::Rc;

use maze_traits::{FinishDetector, HwError, Motors, NotificationLevel, Outputs, WallDetector};
use maze_core::{Direction, GridCoordinate};

use crate::error::SimError;
use crate::maze::{Maze, MazeSquare};

/// Pretend durations of each motion, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTimes {
    pub forward_s: f64,
    pub side_turn_s: f64,
    pub back_turn_s: f64,
}

impl Default for MotionTimes {
    fn default() -> Self {
        Self {
            forward_s: 1.1,
            side_turn_s: 0.9,
            back_turn_s: 1.7,
        }
    }
}

impl From<&maze_config::Simulation> for MotionTimes {
    fn from(c: &maze_config::Simulation) -> Self {
        Self {
            forward_s: c.forward_s,
            side_turn_s: c.side_turn_s,
            back_turn_s: c.back_turn_s,
        }
    }
}

#[derive(Debug)]
struct Pose {
    maze: Maze,
    at: GridCoordinate,
    facing: Direction,
    times: MotionTimes,
    motion_time_s: f64,
    forward_moves: u32,
    notifications: Vec<(NotificationLevel, String)>,
}

impl Pose {
    fn square(&self) -> Result<&MazeSquare, SimError> {
        self.maze.square(self.at).ok_or(SimError::MissingSquare {
            x: self.at.x,
            y: self.at.y,
        })
    }

    fn blocked(&self, dir: Direction) -> bool {
        self.square().map_or(true, |sq| !sq.is_open(dir))
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedRobot {
    pose: Rc<RefCell<Pose>>,
}

impl SimulatedRobot {
    /// Places the robot on the maze's start square.
    pub fn new(maze: Maze, facing: Direction, times: MotionTimes) -> Self {
        let at = maze.start().coordinate();
        Self {
            pose: Rc::new(RefCell::new(Pose {
                maze,
                at,
                facing,
                times,
                motion_time_s: 0.0,
                forward_moves: 0,
                notifications: Vec::new(),
            })),
        }
    }

    pub fn position(&self) -> GridCoordinate {
        self.pose.borrow().at
    }

    pub fn facing(&self) -> Direction {
        self.pose.borrow().facing
    }

    /// Accumulated pretend motion time.
    pub fn motion_time_s(&self) -> f64 {
        self.pose.borrow().motion_time_s
    }

    pub fn forward_moves(&self) -> u32 {
        self.pose.borrow().forward_moves
    }

    pub fn at_finish(&self) -> bool {
        self.pose.borrow().square().is_ok_and(|sq| sq.is_finish)
    }

    pub fn notifications(&self) -> Vec<(NotificationLevel, String)> {
        self.pose.borrow().notifications.clone()
    }

    pub fn motors(&self) -> SimMotors {
        SimMotors(self.clone())
    }

    pub fn wall_detector(&self) -> SimWalls {
        SimWalls(self.clone())
    }

    pub fn finish_detector(&self) -> SimFinish {
        SimFinish(self.clone())
    }

    pub fn outputs(&self) -> SimOutputs {
        SimOutputs(self.clone())
    }

    fn turn(&self, to: impl FnOnce(Direction) -> Direction, seconds: impl FnOnce(&MotionTimes) -> f64) {
        let pose = &mut *self.pose.borrow_mut();
        pose.facing = to(pose.facing);
        pose.motion_time_s += seconds(&pose.times);
    }

    fn blocked_toward(&self, dir: impl FnOnce(Direction) -> Direction) -> bool {
        let pose = self.pose.borrow();
        pose.blocked(dir(pose.facing))
    }
}

#[derive(Debug, Clone)]
pub struct SimMotors(SimulatedRobot);

impl Motors for SimMotors {
    fn move_forward(&mut self) -> Result<(), HwError> {
        let pose = &mut *self.0.pose.borrow_mut();
        let facing = pose.facing;
        if pose.blocked(facing) {
            return Err(Box::new(SimError::WalkedIntoWall {
                x: pose.at.x,
                y: pose.at.y,
                heading: facing.to_string(),
            }));
        }
        let next = pose.at.step(facing);
        if pose.maze.square(next).is_none() {
            return Err(Box::new(SimError::MissingSquare {
                x: next.x,
                y: next.y,
            }));
        }
        pose.at = next;
        pose.motion_time_s += pose.times.forward_s;
        pose.forward_moves += 1;
        tracing::trace!(x = next.x, y = next.y, heading = %facing, "sim move");
        Ok(())
    }

    fn turn_left(&mut self) -> Result<(), HwError> {
        self.0.turn(Direction::left, |t| t.side_turn_s);
        Ok(())
    }

    fn turn_right(&mut self) -> Result<(), HwError> {
        self.0.turn(Direction::right, |t| t.side_turn_s);
        Ok(())
    }

    fn turn_back(&mut self) -> Result<(), HwError> {
        self.0.turn(Direction::back, |t| t.back_turn_s);
        Ok(())
    }

    fn no_turn(&mut self) -> Result<(), HwError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SimWalls(SimulatedRobot);

impl WallDetector for SimWalls {
    fn is_left_blocked(&mut self) -> bool {
        self.0.blocked_toward(Direction::left)
    }

    fn is_front_blocked(&mut self) -> bool {
        self.0.blocked_toward(|d| d)
    }

    fn is_right_blocked(&mut self) -> bool {
        self.0.blocked_toward(Direction::right)
    }
}

#[derive(Debug, Clone)]
pub struct SimFinish(SimulatedRobot);

impl FinishDetector for SimFinish {
    fn is_finish(&mut self) -> bool {
        self.0.at_finish()
    }
}

/// Keeps notifications for the report instead of beeping.
#[derive(Debug, Clone)]
pub struct SimOutputs(SimulatedRobot);

impl Outputs for SimOutputs {
    fn notify(&mut self, level: NotificationLevel, message: &str) {
        self.0
            .pose
            .borrow_mut()
            .notifications
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::simple_2x2;

    fn robot() -> SimulatedRobot {
        SimulatedRobot::new(simple_2x2(), Direction::North, MotionTimes::default())
    }

    #[test]
    fn starts_on_start_square_facing_north() {
        let r = robot();
        assert_eq!(r.position(), GridCoordinate::new(1, 1));
        assert_eq!(r.facing(), Direction::North);
        assert_eq!(r.motion_time_s(), 0.0);
    }

    #[test]
    fn turns_change_heading_and_cost_time() {
        let r = robot();
        let mut m = r.motors();
        m.turn_right().expect("turn");
        assert_eq!(r.facing(), Direction::East);
        m.turn_left().expect("turn");
        m.turn_left().expect("turn");
        assert_eq!(r.facing(), Direction::West);
        m.turn_back().expect("turn");
        assert_eq!(r.facing(), Direction::East);
        m.no_turn().expect("turn");
        assert!((r.motion_time_s() - (3.0 * 0.9 + 1.7)).abs() < 1e-9);
    }

    #[test]
    fn moving_north_steps_y_plus() {
        let r = robot();
        r.motors().move_forward().expect("open");
        assert_eq!(r.position(), GridCoordinate::new(1, 2));
        assert_eq!(r.forward_moves(), 1);
        assert!((r.motion_time_s() - 1.1).abs() < 1e-9);
    }

    #[test]
    fn walls_are_relative_to_heading() {
        let r = robot();
        let mut w = r.wall_detector();
        assert!(w.is_left_blocked());
        assert!(!w.is_front_blocked());
        assert!(!w.is_right_blocked());
        r.motors().turn_right().expect("turn");
        assert!(!w.is_left_blocked());
        assert!(!w.is_front_blocked());
        assert!(w.is_right_blocked());
    }

    #[test]
    fn driving_into_a_wall_is_an_error_and_keeps_pose() {
        let r = robot();
        let mut m = r.motors();
        m.turn_left().expect("turn");
        let err = m.move_forward().unwrap_err();
        assert!(err.to_string().contains("wall"));
        assert_eq!(r.position(), GridCoordinate::new(1, 1));
    }

    #[test]
    fn finish_and_outputs() {
        let r = robot();
        let mut f = r.finish_detector();
        assert!(!f.is_finish());
        let mut m = r.motors();
        m.turn_right().expect("turn");
        m.move_forward().expect("east");
        m.turn_left().expect("turn");
        m.move_forward().expect("north");
        assert!(f.is_finish());

        r.outputs().notify(NotificationLevel::Info, "done");
        assert_eq!(
            r.notifications(),
            vec![(NotificationLevel::Info, "done".to_string())]
        );
    }
}
