//! Human-readable error descriptions and structured JSON error formatting.

use maze_core::error::{BuildError, MazeError};
use maze_sim::SimError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingMotors
            | BuildError::MissingWallDetector
            | BuildError::MissingFinishDetector
            | BuildError::MissingOutputs => format!(
                "What happened: The solver could not be assembled ({be}).\nLikely causes: A collaborator failed to initialize or was not passed to the builder.\nHow to fix: Ensure motors, wall detector, finish detector and outputs are all wired into MazeSolver::builder(...)."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(me) = err.downcast_ref::<MazeError>() {
        return match me {
            MazeError::Exhausted { max_moves } => format!(
                "What happened: Maze not solved: gave up after {max_moves} moves.\nLikely causes: The finish is unreachable, or the move budget is too small for the maze.\nHow to fix: Check the maze layout, or raise session.max_moves (or pass --max-moves)."
            ),
            MazeError::Cancelled => "What happened: Solving was cancelled.\nLikely causes: Ctrl-C was pressed.\nHow to fix: Rerun the command to start a new attempt.".to_string(),
            MazeError::Timeout => "What happened: A motor or sensor timed out.\nLikely causes: Hardware not responding or unplugged.\nHow to fix: Check cables and power, then rerun.".to_string(),
            MazeError::Hardware(msg) if msg.contains("wall") => format!(
                "What happened: The robot drove into a wall ({msg}).\nLikely causes: The maze layout has a wall that is open from one side only.\nHow to fix: Make every opening in the maze CSV two-sided."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    if let Some(SimError::UnknownMaze(name)) = err.downcast_ref::<SimError>() {
        return format!(
            "What happened: Unknown maze '{name}'.\nLikely causes: Typo in --maze or simulation.maze.\nHow to fix: Use one of {}, or pass --maze-file.",
            maze_sim::BUILTIN_NAMES.join(", ")
        );
    }

    // String-based heuristics for errors coming from config or layout files
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("maze csv must have headers") {
        return "Invalid headers in maze CSV. Expected 'x,y,x_plus,x_minus,y_plus,y_minus,is_start,is_finish'.".to_string();
    }

    if lower.contains("maze layout") {
        return format!(
            "What happened: The maze layout is unusable ({msg}).\nLikely causes: Missing start/finish flags or duplicated squares.\nHow to fix: Edit the maze CSV and try again."
        );
    }

    if lower.contains("must be") || lower.contains("must not") || lower.contains("parsing config")
    {
        let cause = err
            .chain()
            .skip(1)
            .map(ToString::to_string)
            .next()
            .unwrap_or_default();
        return format!(
            "What happened: Configuration is invalid or unreadable ({msg}{}).\nLikely causes: Out-of-range values or a TOML syntax error.\nHow to fix: Edit the TOML config and try again.",
            if cause.is_empty() {
                String::new()
            } else {
                format!(": {cause}")
            }
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes for run outcomes; anything else returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<MazeError>() {
        Some(MazeError::Exhausted { .. }) => 3,
        Some(MazeError::Cancelled) => 4,
        Some(MazeError::Hardware(_)) => 5,
        Some(MazeError::Timeout) => 6,
        _ => 1,
    }
}

pub fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<MazeError>() {
        Some(MazeError::Exhausted { .. }) => "Exhausted",
        Some(MazeError::Cancelled) => "Cancelled",
        Some(MazeError::Hardware(_)) => "Hardware",
        Some(MazeError::Timeout) => "Timeout",
        None if err.downcast_ref::<BuildError>().is_some() => "Build",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = reason_name(err);
    let msg = humanize(err);
    match err.downcast_ref::<MazeError>() {
        Some(MazeError::Exhausted { max_moves }) => json!({
            "reason": reason,
            "details": { "max_moves": max_moves },
            "message": msg,
        }),
        _ => json!({ "reason": reason, "message": msg }),
    }
    .to_string()
}
