//! Maps `Box<dyn Error>` from trait boundaries to typed `MazeError`.
//!
//! The traits in `maze_traits` use `Box<dyn Error + Send + Sync>` so that any
//! platform adapter can plug in; the core only needs to tell timeouts apart
//! from other actuation faults.

use crate::error::MazeError;

/// Map a trait-boundary error to a typed `MazeError`.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> MazeError {
    if let Some(typed) = e.downcast_ref::<MazeError>() {
        return typed.clone();
    }
    let s = e.to_string();
    if s.to_lowercase().contains("timeout") || s.to_lowercase().contains("timed out") {
        MazeError::Timeout
    } else {
        MazeError::Hardware(s)
    }
}

/// Convert a boxed boundary error into an `eyre::Report` carrying a typed `MazeError`.
pub(crate) fn hw(e: maze_traits::HwError) -> eyre::Report {
    eyre::Report::new(map_hw_error(e.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_are_recognised_by_message() {
        let e = std::io::Error::other("motor A: Timeout while waiting for stop");
        assert!(matches!(map_hw_error(&e), MazeError::Timeout));
    }

    #[test]
    fn other_faults_keep_their_message() {
        let e = std::io::Error::other("tacho stalled");
        match map_hw_error(&e) {
            MazeError::Hardware(msg) => assert_eq!(msg, "tacho stalled"),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn typed_errors_pass_through() {
        let boxed: maze_traits::HwError = Box::new(MazeError::Cancelled);
        assert!(matches!(map_hw_error(boxed.as_ref()), MazeError::Cancelled));
    }
}
