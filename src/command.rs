//! Inbound commands, one per user action.

use std::str::FromStr;

use crate::error::{PuzzleError, PuzzleResult};
use crate::moves::MoveToken;
use crate::shape::ShapeState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(MoveToken),
    Undo,
    Shuffle,
    Reset,
    SetShape(ShapeState),
    ToggleHideNext,
}

impl FromStr for Command {
    type Err = PuzzleError;

    /// Parses `undo`, `shuffle`, `reset`, `hide`, `shape=<name>` (or
    /// `shape <name>`), or a move token.
    fn from_str(text: &str) -> PuzzleResult<Self> {
        let text = text.trim();
        if let Some(shape) = text
            .strip_prefix("shape")
            .and_then(|rest| rest.strip_prefix(['=', ' ', ':']))
        {
            return shape.parse().map(Command::SetShape);
        }
        match text {
            "undo" => Ok(Command::Undo),
            "shuffle" => Ok(Command::Shuffle),
            "reset" => Ok(Command::Reset),
            "hide" => Ok(Command::ToggleHideNext),
            _ => text
                .parse()
                .map(Command::Move)
                .map_err(|_| PuzzleError::UnknownCommand(text.to_string())),
        }
    }
}
