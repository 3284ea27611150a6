//! Grid maze model and the built-in layouts.

use std::collections::HashMap;

use maze_config::MazeSquareRow;
use maze_core::{Direction, GridCoordinate};

use crate::error::{Result, SimError};

/// One cell of a simulated maze. The `x_plus`/`x_minus`/`y_plus`/`y_minus`
/// flags are true when the robot can leave the cell that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MazeSquare {
    pub x: i32,
    pub y: i32,
    pub x_plus: bool,
    pub x_minus: bool,
    pub y_plus: bool,
    pub y_minus: bool,
    pub is_start: bool,
    pub is_finish: bool,
}

impl MazeSquare {
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            x_plus: false,
            x_minus: false,
            y_plus: false,
            y_minus: false,
            is_start: false,
            is_finish: false,
        }
    }

    /// Same square with the given sides opened.
    pub fn open(mut self, dirs: &[Direction]) -> Self {
        for dir in dirs {
            match dir {
                Direction::North => self.y_plus = true,
                Direction::East => self.x_plus = true,
                Direction::South => self.y_minus = true,
                Direction::West => self.x_minus = true,
            }
        }
        self
    }

    pub const fn start(mut self) -> Self {
        self.is_start = true;
        self
    }

    pub const fn finish(mut self) -> Self {
        self.is_finish = true;
        self
    }

    pub const fn coordinate(&self) -> GridCoordinate {
        GridCoordinate::new(self.x, self.y)
    }

    pub const fn is_open(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.y_plus,
            Direction::East => self.x_plus,
            Direction::South => self.y_minus,
            Direction::West => self.x_minus,
        }
    }
}

impl From<&MazeSquareRow> for MazeSquare {
    fn from(r: &MazeSquareRow) -> Self {
        Self {
            x: r.x,
            y: r.y,
            x_plus: r.x_plus,
            x_minus: r.x_minus,
            y_plus: r.y_plus,
            y_minus: r.y_minus,
            is_start: r.is_start,
            is_finish: r.is_finish,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Maze {
    name: String,
    squares: Vec<MazeSquare>,
    index: HashMap<GridCoordinate, usize>,
    start: usize,
}

impl Maze {
    /// Later duplicates of a coordinate replace earlier ones; the first
    /// square flagged as start is where the robot is placed.
    pub fn new(name: impl Into<String>, squares: Vec<MazeSquare>) -> Result<Self> {
        let mut index = HashMap::with_capacity(squares.len());
        for (i, sq) in squares.iter().enumerate() {
            index.insert(sq.coordinate(), i);
        }
        let start = squares
            .iter()
            .position(|sq| sq.is_start)
            .ok_or(SimError::NoStart)?;
        Ok(Self {
            name: name.into(),
            squares,
            index,
            start,
        })
    }

    pub fn from_rows(name: impl Into<String>, rows: &[MazeSquareRow]) -> Result<Self> {
        Self::new(name, rows.iter().map(MazeSquare::from).collect())
    }

    /// Look up one of the built-in layouts by name.
    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            "simple_2x2" => Ok(simple_2x2()),
            "simple_3x3" => Ok(simple_3x3()),
            "maze_6x6" => Ok(maze_6x6()),
            other => Err(SimError::UnknownMaze(other.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> &MazeSquare {
        &self.squares[self.start]
    }

    pub fn square(&self, at: GridCoordinate) -> Option<&MazeSquare> {
        self.index.get(&at).map(|&i| &self.squares[i])
    }

    pub fn squares(&self) -> &[MazeSquare] {
        &self.squares
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

pub const BUILTIN_NAMES: [&str; 3] = ["simple_2x2", "simple_3x3", "maze_6x6"];

use Direction::{East as E, North as N, South as S, West as W};

fn sq(x: i32, y: i32, open: &[Direction]) -> MazeSquare {
    MazeSquare::new(x, y).open(open)
}

fn built(name: &str, squares: Vec<MazeSquare>) -> Maze {
    // Built-in layouts always carry a start square.
    let start = squares.iter().position(|s| s.is_start).unwrap_or(0);
    let index = squares
        .iter()
        .enumerate()
        .map(|(i, s)| (s.coordinate(), i))
        .collect();
    Maze {
        name: name.to_string(),
        squares,
        index,
        start,
    }
}

pub fn simple_2x2() -> Maze {
    built(
        "simple_2x2",
        vec![
            sq(1, 1, &[E, N]).start(),
            sq(1, 2, &[S]),
            sq(2, 1, &[N, W]),
            sq(2, 2, &[S]).finish(),
        ],
    )
}

pub fn simple_3x3() -> Maze {
    built(
        "simple_3x3",
        vec![
            sq(1, 1, &[E]).start(),
            sq(1, 2, &[N]),
            sq(1, 3, &[E, S]),
            sq(2, 1, &[N, W]),
            sq(2, 2, &[E, N, S]),
            sq(2, 3, &[W, S]),
            sq(3, 1, &[N]),
            sq(3, 2, &[N, W, S]),
            sq(3, 3, &[S]).finish(),
        ],
    )
}

pub fn maze_6x6() -> Maze {
    built(
        "maze_6x6",
        vec![
            sq(1, 1, &[E, N]).start(),
            sq(1, 2, &[N, S]),
            sq(1, 3, &[E, S]),
            sq(1, 4, &[E]),
            sq(1, 5, &[N]),
            sq(1, 6, &[E, S]),
            sq(2, 1, &[E, N, W]),
            sq(2, 2, &[N, S]),
            sq(2, 3, &[W, S]),
            sq(2, 4, &[E, N, W]),
            sq(2, 5, &[S]),
            sq(2, 6, &[E, W]),
            sq(3, 1, &[E, W]),
            sq(3, 2, &[E, N]),
            sq(3, 3, &[N, S]),
            sq(3, 4, &[N, W, S]),
            sq(3, 5, &[N, S]),
            sq(3, 6, &[E, W, S]),
            sq(4, 1, &[N, W]),
            sq(4, 2, &[W, S]),
            sq(4, 3, &[E, N]),
            sq(4, 4, &[S]).finish(),
            sq(4, 5, &[N]),
            sq(4, 6, &[E, W, S]),
            sq(5, 1, &[N]),
            sq(5, 2, &[N, S]),
            sq(5, 3, &[E, W, S]),
            sq(5, 4, &[E, N]),
            sq(5, 5, &[N, S]),
            sq(5, 6, &[W, S]),
            sq(6, 1, &[N]),
            sq(6, 2, &[N, S]),
            sq(6, 3, &[N, W, S]),
            sq(6, 4, &[N, W, S]),
            sq(6, 5, &[N, S]),
            sq(6, 6, &[S]),
        ],
    )
}
