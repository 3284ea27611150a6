use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum MazeError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("timeout waiting for hardware")]
    Timeout,
    #[error("move budget exhausted after {max_moves} moves without reaching the finish")]
    Exhausted { max_moves: u32 },
    #[error("maze solving cancelled")]
    Cancelled,
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing motors")]
    MissingMotors,
    #[error("missing wall detector")]
    MissingWallDetector,
    #[error("missing finish detector")]
    MissingFinishDetector,
    #[error("missing outputs")]
    MissingOutputs,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

/// Shorthand for a construction-time validation failure.
pub(crate) fn invalid(msg: &'static str) -> Report {
    Report::new(BuildError::InvalidConfig(msg))
}
