//! Puzzle State Library
//!
//! Tracks the pieces of a 3x3x3 twisty puzzle (reducible to a 2x2x2 and
//! morphable into a pyramorphix) as a slot -> piece permutation, and turns
//! symbolic commands into committed state changes plus the animations that
//! display them.

pub mod catalog;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod moves;
pub mod shape;
pub mod slots;
pub mod state;

pub use command::Command;
pub use config::EngineConfig;
pub use engine::{Animation, Effect, Ignored, MoveEngine};
pub use error::{PuzzleError, PuzzleResult};
pub use moves::MoveToken;
pub use shape::ShapeState;
pub use state::{PieceId, PieceState};

/// The presentation collaborator that displays what the engine commits.
///
/// Implementors play animations and must report each one finished through
/// [`MoveEngine::complete`]; pose and timing are entirely theirs, addressed by
/// piece identity.
pub trait Presenter {
    fn play(&mut self, animation: &Animation);
    fn set_visibility(&mut self, pieces: &[PieceId], hidden: bool);
    /// Drops all accumulated poses; every piece goes home.
    fn reset(&mut self);
}

/// Hands the visible part of a command's effect to a presenter.
///
/// Returns `true` if an animation was started.
pub fn present(presenter: &mut impl Presenter, effect: &Effect) -> bool {
    match effect {
        Effect::Animate(animation) => {
            presenter.play(animation);
            true
        }
        Effect::Visibility { pieces, hidden } => {
            presenter.set_visibility(pieces, *hidden);
            false
        }
        Effect::Reset => {
            presenter.reset();
            false
        }
        Effect::Queued(_) | Effect::HideNext(_) | Effect::Ignored(_) => false,
    }
}
