use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("unknown built-in maze '{0}' (expected simple_2x2, simple_3x3 or maze_6x6)")]
    UnknownMaze(String),
    #[error("maze has no start square")]
    NoStart,
    #[error("no square at ({x}, {y})")]
    MissingSquare { x: i32, y: i32 },
    #[error("drove into a wall at ({x}, {y}) heading {heading}")]
    WalkedIntoWall { x: i32, y: i32, heading: String },
}

pub type Result<T> = std::result::Result<T, SimError>;
