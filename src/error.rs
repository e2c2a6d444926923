//! Error types for puzzle commands.

use thiserror::Error;

use crate::shape::ShapeState;

/// Result alias used across the crate.
pub type PuzzleResult<T> = Result<T, PuzzleError>;

/// Errors a command can be rejected with.
///
/// Rejection always happens before any state is touched, so a caller can
/// absorb any of these without the puzzle being left half-updated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    #[error("unknown move: {0:?}")]
    UnknownMove(String),

    #[error("move '{0}' has no adjacent slice to grip with")]
    NoAdjacentSlice(char),

    #[error("slice '{letter}' is not present in the {shape} shape")]
    IllegalInShape { letter: char, shape: ShapeState },

    #[error("no transition from {from} to {to}")]
    UnsupportedShapeTransition { from: ShapeState, to: ShapeState },

    #[error("unknown pattern: {0:?}")]
    UnknownPattern(String),

    #[error("unknown shape: {0:?}")]
    UnknownShape(String),

    #[error("unknown command: {0:?}")]
    UnknownCommand(String),
}
