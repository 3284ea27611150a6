//! Compass and robot-relative direction algebra.

use std::fmt;

/// Absolute compass heading on the maze grid. North is +y, east is +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Heading after a 90° counter-clockwise turn.
    #[inline]
    pub const fn left(self) -> Self {
        match self {
            Direction::North => Direction::West,
            Direction::East => Direction::North,
            Direction::South => Direction::East,
            Direction::West => Direction::South,
        }
    }

    /// Heading after a 90° clockwise turn.
    #[inline]
    pub const fn right(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    #[inline]
    pub const fn back(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit step `(dx, dy)` for one cell in this heading.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    /// Heading reached by executing `turn` while facing `self`.
    #[inline]
    pub const fn after(self, turn: Turn) -> Self {
        match turn {
            Turn::None => self,
            Turn::Left => self.left(),
            Turn::Right => self.right(),
            Turn::Back => self.back(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "NORTH",
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
        };
        f.write_str(s)
    }
}

/// One of the three sides the wall sensors look at, relative to the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Front,
    Right,
}

impl Side {
    /// Absolute heading of this side while facing `facing`.
    #[inline]
    pub const fn toward(self, facing: Direction) -> Direction {
        match self {
            Side::Left => facing.left(),
            Side::Front => facing,
            Side::Right => facing.right(),
        }
    }

    /// Turn that makes this side the new front.
    #[inline]
    pub const fn turn(self) -> Turn {
        match self {
            Side::Left => Turn::Left,
            Side::Front => Turn::None,
            Side::Right => Turn::Right,
        }
    }
}

/// Turn executed before every forward move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    /// Keep the current heading (`Motors::no_turn`).
    None,
    Left,
    Right,
    Back,
}

/// Which of the three sensed sides are open (not wall-blocked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Openings {
    pub left: bool,
    pub front: bool,
    pub right: bool,
}

impl Openings {
    pub const fn from_blocked(left_blocked: bool, front_blocked: bool, right_blocked: bool) -> Self {
        Self {
            left: !left_blocked,
            front: !front_blocked,
            right: !right_blocked,
        }
    }

    pub const fn is_open(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left,
            Side::Front => self.front,
            Side::Right => self.right,
        }
    }

    /// Open sides in a stable left, front, right order.
    pub fn open_sides(&self) -> Vec<Side> {
        [Side::Left, Side::Front, Side::Right]
            .into_iter()
            .filter(|s| self.is_open(*s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop::sample::select(Direction::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn rotation_table_is_consistent(d in any_direction()) {
            prop_assert_eq!(d.left().right(), d);
            prop_assert_eq!(d.right().left(), d);
            prop_assert_eq!(d.back().back(), d);
            prop_assert_eq!(d.left().left(), d.back());
            prop_assert_eq!(d.right().right(), d.back());
        }

        #[test]
        fn back_delta_is_negated(d in any_direction()) {
            let (dx, dy) = d.delta();
            prop_assert_eq!(d.back().delta(), (-dx, -dy));
        }
    }

    #[test]
    fn north_is_positive_y() {
        assert_eq!(Direction::North.delta(), (0, 1));
        assert_eq!(Direction::East.delta(), (1, 0));
        assert_eq!(Direction::North.left(), Direction::West);
        assert_eq!(Direction::North.right(), Direction::East);
    }

    #[test]
    fn sides_resolve_against_heading() {
        assert_eq!(Side::Left.toward(Direction::South), Direction::East);
        assert_eq!(Side::Right.toward(Direction::West), Direction::North);
        assert_eq!(Side::Front.toward(Direction::East), Direction::East);
        assert_eq!(Direction::East.after(Side::Left.turn()), Direction::North);
    }

    #[test]
    fn openings_list_sides_in_order() {
        let o = Openings::from_blocked(false, true, false);
        assert_eq!(o.open_sides(), vec![Side::Left, Side::Right]);
        assert!(Openings::from_blocked(true, true, true).open_sides().is_empty());
    }
}
